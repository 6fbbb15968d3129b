// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while resolving or loading modules
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Argument was not of the required type
    #[error("TypeError: expected {expected}, got {value}")]
    ArgumentType {
        /// What the operation required
        expected: &'static str,
        /// Printed form of the offending value
        value: String,
    },

    /// Native library could not be installed
    #[error(transparent)]
    Dylib(#[from] DylibError),

    /// Module not found in any search directory
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// The evaluator failed to compile or run a script
    #[error("Error evaluating '{path}': {reason}")]
    Evaluation {
        /// Script path
        path: PathBuf,
        /// Reason reported by the evaluator
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    /// Create an argument type error for an offending value
    pub fn argument_type(expected: &'static str, value: impl ToString) -> Self {
        Self::ArgumentType {
            expected,
            value: value.to_string(),
        }
    }

    /// Create a module not found error
    pub fn module_not_found(module: impl Into<String>) -> Self {
        Self::ModuleNotFound(module.into())
    }

    /// Create an evaluation error
    pub fn evaluation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Evaluation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of the dynamic library loader.
///
/// Opening the file and finding its entry point fail independently, so
/// callers can tell a missing or corrupt library from a library that is
/// not a module at all.
#[derive(Debug, Error)]
pub enum DylibError {
    /// The shared object could not be opened
    #[error("Cannot open library '{path}': {message}")]
    Open {
        /// Library path
        path: PathBuf,
        /// Platform diagnostic
        message: String,
    },

    /// The library opened but does not export the install entry point
    #[error("Library '{path}' is not a module: missing entry point '{symbol}'")]
    MissingEntryPoint {
        /// Library path
        path: PathBuf,
        /// Entry point that was looked up
        symbol: String,
    },
}

impl DylibError {
    /// Path of the library that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::MissingEntryPoint { path, .. } => path,
        }
    }
}
