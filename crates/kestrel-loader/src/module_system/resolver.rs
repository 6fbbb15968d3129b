// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution
//!
//! A module name is looked up by trying every search directory in order,
//! and within each directory every extension in order. The first file that
//! exists wins.

use crate::config::LoaderConfig;
use crate::module_system::name::ModuleName;
use crate::path::file_exists;
use crate::platform::{PathStyle, DYLIB_SUFFIX};
use std::path::PathBuf;

/// How a module file is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Shared object installed through the plugin loader
    NativeLibrary,
    /// Source file compiled and run by the evaluator
    ScriptSource,
}

/// A module file found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    /// Path of the file, as built from the search directory
    pub path: PathBuf,
    /// How to load it
    pub kind: ArtifactKind,
}

/// Module resolver over a fixed search path and extension table
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// Directories to search, in order
    search_paths: Vec<String>,
    /// Extensions to try in each directory, in order
    extensions: Vec<(String, ArtifactKind)>,
    style: PathStyle,
}

impl ModuleResolver {
    /// Create a resolver with the default extension table
    pub fn new(search_paths: Vec<String>, script_extension: &str) -> Self {
        Self::with_extensions(
            search_paths,
            vec![
                (DYLIB_SUFFIX.to_string(), ArtifactKind::NativeLibrary),
                (script_extension.to_string(), ArtifactKind::ScriptSource),
            ],
        )
    }

    /// Create a resolver with an explicit extension table
    pub fn with_extensions(search_paths: Vec<String>, extensions: Vec<(String, ArtifactKind)>) -> Self {
        Self {
            search_paths,
            extensions,
            style: PathStyle::host(),
        }
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.search_paths(), &config.script_extension)
    }

    /// Directories searched, in order
    pub fn search_paths(&self) -> &[String] {
        &self.search_paths
    }

    /// Extensions tried in each directory, in order
    pub fn extensions(&self) -> &[(String, ArtifactKind)] {
        &self.extensions
    }

    /// Every candidate file for a name, in trial order, without probing
    pub fn candidates<'a>(&'a self, name: &'a ModuleName) -> impl Iterator<Item = ResolveResult> + 'a {
        self.search_paths.iter().flat_map(move |dir| {
            let base = self.style.join(dir, name.as_str());
            self.extensions.iter().map(move |(ext, kind)| {
                let mut candidate = String::with_capacity(base.len() + ext.len());
                candidate.push_str(&base);
                candidate.push_str(ext);
                ResolveResult {
                    path: PathBuf::from(candidate),
                    kind: *kind,
                }
            })
        })
    }

    /// Find the first existing candidate for a name
    pub fn resolve(&self, name: &ModuleName) -> Option<ResolveResult> {
        self.candidates(name).find(|candidate| {
            let exists = file_exists(&candidate.path);
            tracing::debug!("Probing {} ({})", candidate.path.display(), if exists { "found" } else { "absent" });
            exists
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dir_string(dir: &tempfile::TempDir) -> String {
        dir.path().to_str().unwrap().to_string()
    }

    #[test]
    fn test_candidate_order() {
        let resolver = ModuleResolver::with_extensions(
            vec!["a".to_string(), "b".to_string()],
            vec![
                (".so".to_string(), ArtifactKind::NativeLibrary),
                (".kes".to_string(), ArtifactKind::ScriptSource),
            ],
        );
        let name = ModuleName::new("net");
        let sep = PathStyle::host().separator;

        let paths: Vec<String> = resolver
            .candidates(&name)
            .map(|c| c.path.to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                format!("a{sep}net.so"),
                format!("a{sep}net.kes"),
                format!("b{sep}net.so"),
                format!("b{sep}net.kes"),
            ]
        );
    }

    #[test]
    fn test_resolve_prefers_native() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(format!("both{DYLIB_SUFFIX}")), b"").unwrap();
        fs::write(dir.path().join("both.kes"), b"").unwrap();

        let resolver = ModuleResolver::new(vec![dir_string(&dir)], ".kes");
        let found = resolver.resolve(&ModuleName::new("both")).unwrap();
        assert_eq!(found.kind, ArtifactKind::NativeLibrary);
    }

    #[test]
    fn test_resolve_second_directory() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("late.kes"), b"").unwrap();

        let resolver = ModuleResolver::new(vec![dir_string(&first), dir_string(&second)], ".kes");
        let found = resolver.resolve(&ModuleName::new("late")).unwrap();
        assert_eq!(found.kind, ArtifactKind::ScriptSource);
        assert_eq!(found.path, second.path().join("late.kes"));
    }

    #[test]
    fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ModuleResolver::new(vec![dir_string(&dir)], ".kes");
        assert_eq!(resolver.resolve(&ModuleName::new("ghost")), None);
    }
}
