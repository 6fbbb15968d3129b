// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Native module installation
//!
//! A native module is a shared object exporting an install function:
//!
//! ```c
//! void kestrel_install(void);
//! ```
//!
//! The function is called once, right after the library is opened, and is
//! expected to register the module's natives with the host. The library
//! stays open for as long as its [`NativeHandle`] lives.

use crate::error::DylibError;
use libloading::Library;
use std::fmt;
use std::path::{Path, PathBuf};

/// Entry point looked up in native modules unless configured otherwise
pub const DEFAULT_ENTRY_POINT: &str = "kestrel_install";

/// Signature of a native module's install function
pub type InstallFn = unsafe extern "C" fn();

/// An installed native module
pub struct NativeHandle {
    path: PathBuf,
    library: Option<Library>,
}

impl NativeHandle {
    /// Wrap an opened library
    pub fn new(path: impl Into<PathBuf>, library: Library) -> Self {
        Self {
            path: path.into(),
            library: Some(library),
        }
    }

    /// A handle for a module installed without a shared object, such as
    /// one linked into the host binary
    pub fn unbacked(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            library: None,
        }
    }

    /// Path the module was installed from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying library, if any
    pub fn library(&self) -> Option<&Library> {
        self.library.as_ref()
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("path", &self.path)
            .field("backed", &self.library.is_some())
            .finish()
    }
}

/// Installs native modules found during resolution
pub trait PluginLoader: Send + Sync {
    /// Open the module at `path` and run its install function
    fn install(&self, path: &Path) -> Result<NativeHandle, DylibError>;
}

/// [`PluginLoader`] backed by the platform's dynamic linker
#[derive(Debug, Clone)]
pub struct DynamicLibraryLoader {
    entry_point: String,
}

impl DynamicLibraryLoader {
    /// Loader using [`DEFAULT_ENTRY_POINT`]
    pub fn new() -> Self {
        Self::with_entry_point(DEFAULT_ENTRY_POINT)
    }

    /// Loader looking up a different install function
    pub fn with_entry_point(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
        }
    }

    /// Name of the install function
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

impl Default for DynamicLibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginLoader for DynamicLibraryLoader {
    fn install(&self, path: &Path) -> Result<NativeHandle, DylibError> {
        // SAFETY: opening a library runs its initializers. Native modules
        // are trusted code.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            let message = e.to_string();
            tracing::error!("{}", message);
            DylibError::Open {
                path: path.to_path_buf(),
                message,
            }
        })?;

        // SAFETY: the entry point is declared with the `InstallFn` signature.
        let install = unsafe { library.get::<InstallFn>(self.entry_point.as_bytes()) }
            .map(|symbol| *symbol);

        let install = match install {
            Ok(install) => install,
            Err(e) => {
                tracing::debug!("{}: {}", path.display(), e);
                // Dropping the library closes it
                return Err(DylibError::MissingEntryPoint {
                    path: path.to_path_buf(),
                    symbol: self.entry_point.clone(),
                });
            }
        };

        tracing::debug!("Installing native module {}", path.display());
        // SAFETY: `library` is still open, so the function pointer is valid.
        unsafe { install() };

        Ok(NativeHandle::new(path, library))
    }
}
