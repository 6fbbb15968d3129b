// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `~` and `~user` home directory lookup

use crate::platform::PathStyle;
use std::path::PathBuf;

/// A home directory split off the front of a `~` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir {
    /// Home directory of the account
    pub dir: String,
    /// Text after the login name, without its leading separator
    pub remainder: String,
}

/// Resolve the home directory named by a path starting with `~`.
///
/// `~` and `~/rest` use the invoking user's home directory, `~name` and
/// `~name/rest` look `name` up in the account database. Returns `None`
/// when the path does not start with `~` or the account is unknown.
pub fn resolve_home(path: &str, style: PathStyle) -> Option<HomeDir> {
    let rest = path.strip_prefix('~')?;

    let (login, remainder) = match rest.find(style.separator) {
        Some(i) => (&rest[..i], &rest[i + style.separator.len_utf8()..]),
        None => (rest, ""),
    };

    let dir = if login.is_empty() {
        current_user_home()
    } else {
        user_home(login)
    };

    let Some(dir) = dir else {
        tracing::debug!("No home directory for '{}'", path);
        return None;
    };

    Some(HomeDir {
        dir,
        remainder: remainder.to_string(),
    })
}

/// Home directory of the invoking user
pub fn current_user_home() -> Option<String> {
    dirs::home_dir().and_then(path_to_string)
}

/// Home directory of a named account
#[cfg(unix)]
pub fn user_home(login: &str) -> Option<String> {
    match nix::unistd::User::from_name(login) {
        Ok(Some(user)) => path_to_string(user.dir),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Account lookup for '{}' failed: {}", login, e);
            None
        }
    }
}

/// Home directory of a named account
#[cfg(not(unix))]
pub fn user_home(_login: &str) -> Option<String> {
    None
}

fn path_to_string(path: PathBuf) -> Option<String> {
    path.into_os_string().into_string().ok()
}
