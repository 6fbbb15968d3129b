// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration

use crate::dylib::DEFAULT_ENTRY_POINT;
use crate::error::{LoaderError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Environment variable holding the module search path
pub const LIB_PATH_ENV: &str = "KESTREL_LIB";

/// Name of the configuration file
pub const CONFIG_FILE: &str = "kestrel.toml";

/// Default suffix of script modules
pub const DEFAULT_SCRIPT_EXTENSION: &str = ".kes";

/// Configuration for module loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directories searched for modules, in order. `None` searches the
    /// working directory, then the executable's directory.
    pub search_paths: Option<Vec<String>>,

    /// Directory of the running executable
    pub exe_dir: Option<String>,

    /// Suffix of script modules
    pub script_extension: String,

    /// Install function exported by native modules
    pub entry_point: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_paths: None,
            exe_dir: default_exe_dir(),
            script_extension: DEFAULT_SCRIPT_EXTENSION.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

/// A configuration file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    search_paths: Option<Vec<String>>,
    exe_dir: Option<String>,
    script_extension: Option<String>,
    entry_point: Option<String>,
}

impl LoaderConfig {
    /// Load configuration from default locations.
    ///
    /// Later sources override earlier ones: built-in defaults, the user
    /// config file, `./kestrel.toml`, then `KESTREL_LIB`.
    pub fn load() -> Result<Self> {
        let mut config = LoaderConfig::default();

        if let Some(user_config_path) = user_config_path() {
            if user_config_path.exists() {
                config.merge_from_file(&user_config_path)?;
            }
        }

        let project_config = PathBuf::from(CONFIG_FILE);
        if project_config.exists() {
            config.merge_from_file(&project_config)?;
        }

        config.load_from_env();

        Ok(config)
    }

    /// Parse a single TOML document over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config = LoaderConfig::default();
        config
            .merge_toml(content)
            .map_err(|e| LoaderError::Config(e.message().to_string()))?;
        Ok(config)
    }

    /// Merge configuration from a file.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.merge_toml(&content)
            .map_err(|e| LoaderError::Config(format!("{}: {}", path.display(), e.message())))
    }

    fn merge_toml(&mut self, content: &str) -> std::result::Result<(), toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;

        if let Some(search_paths) = file.search_paths {
            self.search_paths = Some(search_paths);
        }
        if let Some(exe_dir) = file.exe_dir {
            self.exe_dir = Some(exe_dir);
        }
        if let Some(script_extension) = file.script_extension {
            self.script_extension = script_extension;
        }
        if let Some(entry_point) = file.entry_point {
            self.entry_point = entry_point;
        }

        Ok(())
    }

    /// Load the search path from `KESTREL_LIB`, if set.
    pub fn load_from_env(&mut self) {
        if let Some(value) = std::env::var_os(LIB_PATH_ENV) {
            self.set_search_path_list(&value);
        }
    }

    /// Replace the search path with a platform path list (`a:b` on Unix,
    /// `a;b` on Windows). Entries that are not valid UTF-8 are skipped.
    pub fn set_search_path_list(&mut self, list: &OsStr) {
        let paths = std::env::split_paths(list)
            .filter_map(|p| match p.into_os_string().into_string() {
                Ok(s) => Some(s),
                Err(p) => {
                    tracing::warn!("Ignoring non UTF-8 search path {:?}", p);
                    None
                }
            })
            .collect();
        self.search_paths = Some(paths);
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "search-paths" | "search_paths" => self.set_search_path_list(OsStr::new(value)),
            "exe-dir" | "exe_dir" => self.exe_dir = Some(value.to_string()),
            "script-extension" | "script_extension" => self.script_extension = value.to_string(),
            "entry-point" | "entry_point" => self.entry_point = value.to_string(),
            _ => return Err(LoaderError::Config(format!("unknown key '{}'", key))),
        }
        Ok(())
    }

    /// The effective search path
    pub fn search_paths(&self) -> Vec<String> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }

        let mut paths = vec![".".to_string()];
        if let Some(exe_dir) = &self.exe_dir {
            paths.push(exe_dir.clone());
        }
        paths
    }
}

/// Get the user config path.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kestrel").join(CONFIG_FILE))
}

/// Directory containing the running executable
fn default_exe_dir() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.parent()?.to_str().map(String::from)
}
