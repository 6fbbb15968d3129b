// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `require` outcomes and helpers

use crate::module_system::loader::ModuleLoader;
use crate::module_system::name::ModuleName;
use crate::module_system::resolver::ResolveResult;

/// Outcome of requiring a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Require {
    /// The module was loaded earlier; nothing was done
    AlreadySatisfied,
    /// The module was found and loaded now
    Resolved(ModuleName),
    /// No candidate file exists
    NotFound,
}

impl Require {
    /// Whether the module is loaded after this call
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, Require::NotFound)
    }
}

/// require.resolve() - the file a name would load, without loading it
pub fn require_resolve(loader: &ModuleLoader, name: &ModuleName) -> Option<ResolveResult> {
    loader.resolver().resolve(name)
}

/// Names of all loaded modules, sorted case-insensitively
pub fn loaded_modules(loader: &ModuleLoader) -> Vec<ModuleName> {
    let mut names = loader.cache().keys();
    names.sort_by_key(|name| name.as_str().to_ascii_lowercase());
    names
}
