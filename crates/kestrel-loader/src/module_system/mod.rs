// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module system
//!
//! Resolves module names to files on a search path and loads each module
//! at most once.
//!
//! - Native libraries are preferred over scripts within a directory
//! - Earlier search directories win over later ones
//! - Loaded modules are remembered per [`ModuleLoader`]

mod cache;
mod loader;
mod name;
mod require;
mod resolver;

pub use cache::{Artifact, ModuleCache};
pub use loader::{compile_file, load_script, Evaluator, ModuleLoader};
pub use name::ModuleName;
pub use require::{loaded_modules, require_resolve, Require};
pub use resolver::{ArtifactKind, ModuleResolver, ResolveResult};
