// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Separator and root policy for path strings

use std::path::MAIN_SEPARATOR;

/// How path strings are split and rooted on a platform.
///
/// Only the styles provided here exist: path scanning works on bytes, so
/// the separator is always a single ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStyle {
    pub(crate) separator: char,
    pub(crate) drive_letters: bool,
}

impl PathStyle {
    /// POSIX paths (`/`, no drive letters)
    pub const POSIX: PathStyle = PathStyle {
        separator: '/',
        drive_letters: false,
    };

    /// Windows paths (`\`, drive letters)
    pub const WINDOWS: PathStyle = PathStyle {
        separator: '\\',
        drive_letters: true,
    };

    /// The style of the host platform
    pub const fn host() -> PathStyle {
        PathStyle {
            separator: MAIN_SEPARATOR,
            drive_letters: cfg!(windows),
        }
    }

    /// Path segment separator
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Whether `X:` drive prefixes count as rooted
    pub const fn drive_letters(&self) -> bool {
        self.drive_letters
    }

    /// Whether a path string is already rooted
    pub fn is_rooted(&self, path: &str) -> bool {
        if path.starts_with(self.separator) {
            return true;
        }

        let bytes = path.as_bytes();
        self.drive_letters && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::host()
    }
}

/// Suffix of native shared objects on the host (`.so`, `.dylib`, `.dll`)
pub const DYLIB_SUFFIX: &str = std::env::consts::DLL_SUFFIX;
