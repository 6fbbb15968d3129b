// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves names and loads each module once

use crate::config::LoaderConfig;
use crate::dylib::{DynamicLibraryLoader, NativeHandle, PluginLoader};
use crate::error::{LoaderError, Result};
use crate::module_system::cache::{Artifact, ModuleCache};
use crate::module_system::name::ModuleName;
use crate::module_system::require::Require;
use crate::module_system::resolver::{ArtifactKind, ModuleResolver};
use std::path::Path;
use std::sync::Arc;

/// Compiles and runs script files on behalf of the loader.
///
/// Implemented by the language runtime embedding the loader.
pub trait Evaluator {
    /// A compiled, callable unit
    type Unit;
    /// Result of running a unit
    type Value;

    /// Compile a source file. `None` means the file compiled to nothing
    /// that can be run.
    fn compile_file(&mut self, path: &Path) -> Result<Option<Self::Unit>>;

    /// Run a compiled unit with no arguments
    fn call(&mut self, unit: Self::Unit) -> Result<Self::Value>;
}

/// Compile a script file without running it
pub fn compile_file<E: Evaluator + ?Sized>(path: &Path, evaluator: &mut E) -> Result<Option<E::Unit>> {
    evaluator.compile_file(path)
}

/// Compile a script file and run it with no arguments
pub fn load_script<E: Evaluator + ?Sized>(path: &Path, evaluator: &mut E) -> Result<Option<E::Value>> {
    match evaluator.compile_file(path)? {
        Some(unit) => evaluator.call(unit).map(Some),
        None => Ok(None),
    }
}

/// Module loader
///
/// Owns the search configuration and the registry of loaded modules, so
/// every runtime instance resolves independently.
pub struct ModuleLoader {
    /// Module resolver
    resolver: ModuleResolver,
    /// Loaded modules
    cache: ModuleCache,
    /// Installs native modules
    plugins: Box<dyn PluginLoader>,
}

impl ModuleLoader {
    /// Create a loader installing native modules with the dynamic linker
    pub fn new(resolver: ModuleResolver) -> Self {
        Self::with_plugin_loader(resolver, Box::new(DynamicLibraryLoader::new()))
    }

    /// Create a loader with a custom native module installer
    pub fn with_plugin_loader(resolver: ModuleResolver, plugins: Box<dyn PluginLoader>) -> Self {
        Self {
            resolver,
            cache: ModuleCache::new(),
            plugins,
        }
    }

    /// Create a loader from configuration
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::with_plugin_loader(
            ModuleResolver::from_config(config),
            Box::new(DynamicLibraryLoader::with_entry_point(config.entry_point.clone())),
        )
    }

    /// Load a module by name unless it is already loaded.
    ///
    /// The first existing candidate decides the outcome: a native library
    /// is installed and registered, a script is registered and then run.
    /// Failures while loading that candidate are returned as errors and no
    /// other candidate is tried.
    pub fn require<E: Evaluator + ?Sized>(&self, name: &ModuleName, evaluator: &mut E) -> Result<Require> {
        if self.cache.has(name) {
            tracing::debug!("Module '{}' already loaded", name);
            return Ok(Require::AlreadySatisfied);
        }

        let Some(found) = self.resolver.resolve(name) else {
            tracing::debug!("Module '{}' not found", name);
            return Ok(Require::NotFound);
        };

        match found.kind {
            ArtifactKind::NativeLibrary => {
                let handle = self.plugins.install(&found.path)?;
                self.cache.set(name.clone(), Artifact::Native(Arc::new(handle)));
            }
            ArtifactKind::ScriptSource => {
                // Registered first so the script may require itself
                self.cache.set(name.clone(), Artifact::Script(found.path.clone()));
                load_script(&found.path, evaluator)?;
            }
        }

        tracing::info!("Loaded module '{}' from {}", name, found.path.display());
        Ok(Require::Resolved(name.clone()))
    }

    /// Like [`require`](Self::require), but a module that cannot be found
    /// is an error. Never returns [`Require::NotFound`].
    pub fn require_or_throw<E: Evaluator + ?Sized>(&self, name: &ModuleName, evaluator: &mut E) -> Result<Require> {
        match self.require(name, evaluator)? {
            Require::NotFound => Err(LoaderError::module_not_found(name.as_str())),
            satisfied => Ok(satisfied),
        }
    }

    /// Install a native library directly, bypassing the search path
    pub fn load_lib(&self, path: &Path) -> Result<Arc<NativeHandle>> {
        Ok(Arc::new(self.plugins.install(path)?))
    }

    /// Get the module resolver
    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Get the registry of loaded modules
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Whether a module has been loaded
    pub fn is_loaded(&self, name: &ModuleName) -> bool {
        self.cache.has(name)
    }

    /// Artifact a module name is bound to
    pub fn artifact(&self, name: &ModuleName) -> Option<Artifact> {
        self.cache.get(name)
    }
}
