// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Registry of loaded modules

use crate::dylib::NativeHandle;
use crate::module_system::name::ModuleName;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a module name is bound to once loaded
#[derive(Debug, Clone)]
pub enum Artifact {
    /// An installed native library
    Native(Arc<NativeHandle>),
    /// A script file that was handed to the evaluator
    Script(PathBuf),
}

impl Artifact {
    /// File the artifact was loaded from
    pub fn path(&self) -> &Path {
        match self {
            Artifact::Native(handle) => handle.path(),
            Artifact::Script(path) => path,
        }
    }
}

/// Loaded modules by name.
///
/// Entries are only ever added; a module stays registered for the lifetime
/// of the cache.
pub struct ModuleCache {
    modules: DashMap<ModuleName, Artifact>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            modules: DashMap::new(),
        }
    }

    /// Get the artifact bound to a name
    pub fn get(&self, name: &ModuleName) -> Option<Artifact> {
        self.modules.get(name).map(|entry| entry.clone())
    }

    /// Check if a module is registered
    pub fn has(&self, name: &ModuleName) -> bool {
        self.modules.contains_key(name)
    }

    /// Bind a name to an artifact
    pub fn set(&self, name: ModuleName, artifact: Artifact) {
        self.modules.insert(name, artifact);
    }

    /// Get all registered names
    pub fn keys(&self) -> Vec<ModuleName> {
        self.modules.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get the number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new()
    }
}
