// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Path string utilities
//!
//! Paths are handled as strings over a single separator character so the
//! results match what scripts see, independent of how the host would
//! interpret them. None of these functions touch the file system except
//! [`PathStyle::expand`] (working directory, account database) and
//! [`file_exists`].

use crate::home::resolve_home;
use crate::platform::PathStyle;
use std::path::Path;

impl PathStyle {
    /// Collapse `.` and `..` segments and strip one trailing separator.
    ///
    /// `sep .` followed by a separator or the end of the string is
    /// dropped. `sep .. sep` is dropped together with the component before
    /// it. When there is no such component (nothing before it, or only a
    /// `..` that was itself kept) the segment is left in place. A `..` at
    /// the very end, with no separator after it, is not collapsed.
    pub fn canonicalize(&self, path: &str) -> String {
        let sep = self.separator;
        // Separators are ASCII, so byte comparisons never split a char.
        let sep_byte = sep as u8;
        let bytes = path.as_bytes();
        let mut out = String::with_capacity(path.len());
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == sep_byte && bytes.get(i + 1) == Some(&b'.') {
                match bytes.get(i + 2) {
                    None => {
                        i += 2;
                        continue;
                    }
                    Some(&c) if c == sep_byte => {
                        i += 2;
                        continue;
                    }
                    Some(&b'.') if bytes.get(i + 3) == Some(&sep_byte) => {
                        if let Some(start) = removable_component(&out, sep) {
                            out.truncate(start);
                            i += 3;
                            continue;
                        }
                    }
                    _ => {}
                }
            }

            // Copy up to the next separator
            let next = path[i..]
                .char_indices()
                .skip(1)
                .find(|&(_, c)| c == sep)
                .map_or(bytes.len(), |(j, _)| i + j);
            out.push_str(&path[i..next]);
            i = next;
        }

        if out.len() > sep.len_utf8() && out.ends_with(sep) {
            out.pop();
        }

        if out.is_empty() && path.starts_with(sep) {
            out.push(sep);
        }

        out
    }

    /// `dir + separator + name` in a new string
    pub fn join(&self, dir: &str, name: &str) -> String {
        let mut path = String::with_capacity(dir.len() + self.separator.len_utf8() + name.len());
        path.push_str(dir);
        path.push(self.separator);
        path.push_str(name);
        path
    }

    /// Expand a path to an absolute, canonical path.
    ///
    /// Rooted paths are returned as they are. `~` and `~user` prefixes are
    /// replaced by the account's home directory; anything else is taken
    /// relative to the current working directory. Returns `None` when the
    /// home directory or the working directory cannot be determined.
    pub fn expand(&self, path: &str) -> Option<String> {
        if self.is_rooted(path) {
            return Some(path.to_string());
        }

        let (dir, remainder) = if path.starts_with('~') {
            let home = resolve_home(path, *self)?;
            if home.remainder.is_empty() {
                return Some(home.dir);
            }
            (home.dir, home.remainder)
        } else {
            (current_dir()?, path.to_string())
        };

        Some(self.canonicalize(&self.join(&dir, &remainder)))
    }

    /// Text after the last separator.
    ///
    /// The whole string when there is no separator, `None` when the
    /// separator is the last character (or the string is empty).
    pub fn base_name<'a>(&self, path: &'a str) -> Option<&'a str> {
        match path.rfind(self.separator) {
            _ if path.is_empty() => None,
            None => Some(path),
            Some(i) => {
                let base = &path[i + self.separator.len_utf8()..];
                (!base.is_empty()).then_some(base)
            }
        }
    }

    /// Text before the last separator, or `"."` when there is none.
    ///
    /// A separator at the start of the string is kept, so the directory of
    /// `/usr` is `/`. A trailing separator is stripped rather than treated
    /// as an empty last component: `/usr/bin/` gives `/usr/bin`, not `.`.
    pub fn dir_name<'a>(&self, path: &'a str) -> &'a str {
        match path.rfind(self.separator) {
            None => ".",
            Some(0) => &path[..self.separator.len_utf8()],
            Some(i) => &path[..i],
        }
    }
}

/// Start offset of the last component in `out`, if it may be deleted by a
/// following `..`.
fn removable_component(out: &str, sep: char) -> Option<usize> {
    if out.is_empty() {
        return None;
    }

    let start = out.rfind(sep).unwrap_or(0);
    let component = out[start..].trim_start_matches(sep);
    if component == ".." {
        return None;
    }

    Some(start)
}

fn current_dir() -> Option<String> {
    match std::env::current_dir() {
        Ok(dir) => dir.into_os_string().into_string().ok(),
        Err(e) => {
            tracing::debug!("Cannot query working directory: {}", e);
            None
        }
    }
}

/// Canonicalize a path with the host separator
pub fn canonicalize(path: &str) -> String {
    PathStyle::host().canonicalize(path)
}

/// Join a directory and a name with the host separator
pub fn join_path(dir: &str, name: &str) -> String {
    PathStyle::host().join(dir, name)
}

/// Expand a path to an absolute, canonical path on the host
pub fn expand_path(path: &str) -> Option<String> {
    PathStyle::host().expand(path)
}

/// Resolve a path the way scripts see it; same as [`expand_path`]
pub fn resolve_path(path: &str) -> Option<String> {
    expand_path(path)
}

/// Base name using the host separator
pub fn base_name(path: &str) -> Option<&str> {
    PathStyle::host().base_name(path)
}

/// Directory name using the host separator
pub fn dir_name(path: &str) -> &str {
    PathStyle::host().dir_name(path)
}

/// Whether a file exists at `path`
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}
