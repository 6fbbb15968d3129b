// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! kestrel CLI - inspect path expansion and module resolution
//!
//! The CLI has no script evaluator, so script modules are located and
//! registered but only reported, never run. Native modules are installed
//! for real.

use clap::{Parser, Subcommand};
use kestrel_loader::module_system::require_resolve;
use kestrel_loader::{
    ArtifactKind, Evaluator, LoaderConfig, ModuleLoader, ModuleName, PathStyle, Require, VERSION,
};
use owo_colors::OwoColorize;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "kestrel",
    about = "Inspect path expansion and module resolution for Kestrel runtimes",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Override a configuration value (repeatable), e.g. `--set entry-point=init`
    #[arg(long = "set", value_name = "KEY=VALUE", global = true, value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand ~, ~user and relative paths to an absolute path
    Expand { path: String },

    /// Collapse . and .. segments without touching the file system
    Canonical { path: String },

    /// Print the last component of a path
    Base { path: String },

    /// Print everything before the last component of a path
    Dir { path: String },

    /// Join a directory and a name
    Join { dir: String, name: String },

    /// Check whether a file exists
    Exists { path: String },

    /// Resolve modules by name and load native ones
    Require {
        /// Module names
        #[arg(required = true)]
        names: Vec<String>,

        /// Search directory (repeatable; replaces the configured path)
        #[arg(short = 'L', long = "lib-path")]
        lib_paths: Vec<String>,

        /// Only show which file would be loaded
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Reports scripts instead of running them
struct ReportingEvaluator;

impl Evaluator for ReportingEvaluator {
    type Unit = ();
    type Value = ();

    fn compile_file(&mut self, path: &Path) -> kestrel_loader::Result<Option<()>> {
        println!("  {} {}", "script".yellow(), path.display());
        Ok(None)
    }

    fn call(&mut self, _unit: ()) -> kestrel_loader::Result<()> {
        Ok(())
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "kestrel=debug,kestrel_loader=debug"
    } else {
        "kestrel=warn,kestrel_loader=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let style = PathStyle::host();

    match cli.command {
        Command::Expand { path } => match style.expand(&path) {
            Some(expanded) => println!("{}", expanded),
            None => {
                eprintln!("{}: cannot expand '{}'", "Error".red().bold(), path);
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Canonical { path } => println!("{}", style.canonicalize(&path)),
        Command::Base { path } => println!("{}", style.base_name(&path).unwrap_or(&path)),
        Command::Dir { path } => println!("{}", style.dir_name(&path)),
        Command::Join { dir, name } => println!("{}", style.join(&dir, &name)),
        Command::Exists { path } => {
            let exists = kestrel_loader::file_exists(&path);
            println!("{}", exists);
            if !exists {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Require {
            names,
            lib_paths,
            dry_run,
        } => {
            let mut config = load_config(&cli.overrides)?;
            if !lib_paths.is_empty() {
                config.search_paths = Some(lib_paths);
            }
            return Ok(run_require(&config, &names, dry_run));
        }
        Command::Config => {
            let config = load_config(&cli.overrides)?;
            print!("{}", toml::to_string(&config)?);
            println!("# effective search path: {:?}", config.search_paths());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Split a `KEY=VALUE` override
fn parse_override(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Load configuration from the default locations, then apply `--set` overrides
fn load_config(overrides: &[(String, String)]) -> anyhow::Result<LoaderConfig> {
    let mut config = LoaderConfig::load()?;
    for (key, value) in overrides {
        config.set(key, value)?;
    }
    Ok(config)
}

fn run_require(config: &LoaderConfig, names: &[String], dry_run: bool) -> ExitCode {
    tracing::debug!("Search path: {:?}", config.search_paths());
    let loader = ModuleLoader::from_config(config);
    let mut evaluator = ReportingEvaluator;
    let mut status = ExitCode::SUCCESS;

    for name in names {
        let name = ModuleName::new(name.as_str());

        if dry_run {
            match require_resolve(&loader, &name) {
                Some(found) => {
                    let kind = match found.kind {
                        ArtifactKind::NativeLibrary => "native",
                        ArtifactKind::ScriptSource => "script",
                    };
                    println!("{} {} {}", name.cyan(), kind.dimmed(), found.path.display());
                }
                None => {
                    eprintln!("{}: Cannot find module '{}'", "Error".red().bold(), name);
                    status = ExitCode::FAILURE;
                }
            }
            continue;
        }

        match loader.require_or_throw(&name, &mut evaluator) {
            Ok(Require::Resolved(name)) => {
                let path = loader
                    .artifact(&name)
                    .map(|a| a.path().display().to_string())
                    .unwrap_or_default();
                println!("{} {} {}", name.cyan(), "loaded".green(), path);
            }
            Ok(_) => println!("{} {}", name.cyan(), "already loaded".dimmed()),
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
