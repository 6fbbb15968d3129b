// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # kestrel-loader
//!
//! Module resolution and path handling for embeddable script runtimes.
//!
//! A runtime asks for a module by name; the loader searches an ordered list
//! of directories for a native library or a script with that name, installs
//! or runs the first one it finds, and remembers it so later requests are
//! free:
//!
//! - Search path: `[".", <executable dir>]` unless configured
//! - Extension table: native library suffix first, then `.kes` scripts
//! - Native libraries export `kestrel_install`, called once on load
//! - Scripts are compiled and run by the host's [`Evaluator`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kestrel_loader::{LoaderConfig, ModuleLoader, ModuleName, Require};
//!
//! let config = LoaderConfig::load()?;
//! let loader = ModuleLoader::from_config(&config);
//!
//! match loader.require(&ModuleName::new("protocol"), &mut evaluator)? {
//!     Require::Resolved(name) => println!("loaded {name}"),
//!     Require::AlreadySatisfied => {}
//!     Require::NotFound => eprintln!("no protocol module"),
//! }
//! ```
//!
//! ## Paths
//!
//! ```rust
//! use kestrel_loader::PathStyle;
//!
//! let posix = PathStyle::POSIX;
//! assert_eq!(posix.canonicalize("/a/./b/../c"), "/a/c");
//! assert_eq!(posix.join("/usr", "bin"), "/usr/bin");
//! assert_eq!(posix.dir_name("bin"), ".");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dylib;
pub mod error;
pub mod home;
pub mod module_system;
pub mod natives;
pub mod path;
pub mod platform;
pub mod value;

// Re-exports
pub use config::LoaderConfig;
pub use dylib::{DynamicLibraryLoader, NativeHandle, PluginLoader};
pub use error::{DylibError, LoaderError, Result};
pub use module_system::{
    load_script, Artifact, ArtifactKind, Evaluator, ModuleLoader, ModuleName, ModuleResolver, Require,
};
pub use path::{base_name, canonicalize, dir_name, expand_path, file_exists, join_path, resolve_path};
pub use platform::PathStyle;
pub use value::Value;

/// Version of the loader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
