// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module names

use std::fmt;
use std::hash::{Hash, Hasher};

/// Name a module is requested and registered under.
///
/// Names compare ASCII case-insensitively, like symbols in the scripting
/// language, but keep the spelling they were created with. That spelling is
/// what candidate file names are built from.
#[derive(Debug, Clone, Eq)]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a module name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as spelled
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ModuleName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for ModuleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModuleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
