// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Script-facing natives
//!
//! These are the functions a runtime binds as globals (`ExpandPath`,
//! `Require`, `Load`, ...). They take and return [`Value`]s and raise
//! [`LoaderError::ArgumentType`] when given the wrong kind of value.

use crate::error::{LoaderError, Result};
use crate::module_system::{self, Evaluator, ModuleLoader, ModuleName, Require};
use crate::path;
use crate::value::Value;
use std::path::Path;

fn expect_string(value: &Value) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| LoaderError::argument_type("string", value))
}

fn expect_text(value: &Value) -> Result<&str> {
    match value {
        Value::String(s) => Ok(s),
        Value::Symbol(s) => Ok(s.as_str()),
        other => Err(LoaderError::argument_type("string or symbol", other)),
    }
}

/// Module name from a symbol, or a string converted to one
pub fn module_name(value: &Value) -> Result<ModuleName> {
    match value {
        Value::Symbol(name) => Ok(name.clone()),
        Value::String(s) => Ok(ModuleName::new(s.as_str())),
        other => Err(LoaderError::argument_type("symbol", other)),
    }
}

/// ExpandPath(path) - absolute canonical path, or nil when `~user` is unknown
pub fn expand_path(path: &Value) -> Result<Value> {
    let path = expect_string(path)?;
    Ok(path::expand_path(path).map_or(Value::Nil, Value::String))
}

/// FileExists(path)
pub fn file_exists(path: &Value) -> Result<Value> {
    let path = expect_string(path)?;
    Ok(Value::Bool(path::file_exists(path)))
}

/// BaseName(path) - the path itself when it ends in a separator
pub fn base_name(path: &Value) -> Result<Value> {
    let s = expect_string(path)?;
    Ok(match path::base_name(s) {
        Some(base) => Value::from(base),
        None => path.clone(),
    })
}

/// DirName(path)
pub fn dir_name(path: &Value) -> Result<Value> {
    let path = expect_string(path)?;
    Ok(Value::from(path::dir_name(path)))
}

/// JoinPath(dir, name)
pub fn join_path(dir: &Value, name: &Value) -> Result<Value> {
    Ok(Value::String(path::join_path(expect_text(dir)?, expect_text(name)?)))
}

/// CompileFile(path) - compile without running
pub fn compile_file<E: Evaluator + ?Sized>(path: &Value, evaluator: &mut E) -> Result<Option<E::Unit>> {
    let path = expect_string(path)?;
    module_system::compile_file(Path::new(path), evaluator)
}

/// Load(path) - compile and run a script file
pub fn load<E: Evaluator + ?Sized>(path: &Value, evaluator: &mut E) -> Result<Option<E::Value>> {
    let path = expect_string(path)?;
    module_system::load_script(Path::new(path), evaluator)
}

/// LoadLib(path) - install a native library
pub fn load_lib(loader: &ModuleLoader, path: &Value) -> Result<Value> {
    let path = expect_string(path)?;
    Ok(Value::Native(loader.load_lib(Path::new(path))?))
}

/// Require0(name) - nil when already loaded, the symbol when loaded now,
/// unbound when not found
pub fn require0<E: Evaluator + ?Sized>(loader: &ModuleLoader, name: &Value, evaluator: &mut E) -> Result<Value> {
    let name = module_name(name)?;
    Ok(match loader.require(&name, evaluator)? {
        Require::AlreadySatisfied => Value::Nil,
        Require::Resolved(name) => Value::Symbol(name),
        Require::NotFound => Value::Unbound,
    })
}

/// Require(name) - like [`require0`], but a missing module is an error
pub fn require<E: Evaluator + ?Sized>(loader: &ModuleLoader, name: &Value, evaluator: &mut E) -> Result<Value> {
    let result = require0(loader, name, evaluator)?;
    if result.is_unbound() {
        return Err(LoaderError::module_not_found(module_name(name)?.as_str()));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_errors() {
        for result in [
            expand_path(&Value::Int(1)),
            file_exists(&Value::Nil),
            base_name(&Value::Symbol(ModuleName::new("a"))),
            dir_name(&Value::Bool(true)),
            join_path(&Value::from("/usr"), &Value::Int(3)),
        ] {
            assert!(matches!(result, Err(LoaderError::ArgumentType { .. })));
        }

        let err = module_name(&Value::Int(7)).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: expected symbol, got 7");
    }

    #[cfg(unix)]
    #[test]
    fn test_path_natives() {
        assert_eq!(join_path(&Value::from("/usr"), &Value::from("bin")).unwrap(), Value::from("/usr/bin"));
        assert_eq!(
            join_path(&Value::from("/lib"), &Value::Symbol(ModuleName::new("net"))).unwrap(),
            Value::from("/lib/net")
        );
        assert_eq!(base_name(&Value::from("/usr/bin")).unwrap(), Value::from("bin"));
        assert_eq!(base_name(&Value::from("/usr/bin/")).unwrap(), Value::from("/usr/bin/"));
        assert_eq!(dir_name(&Value::from("/usr/bin")).unwrap(), Value::from("/usr"));
        assert_eq!(dir_name(&Value::from("bin")).unwrap(), Value::from("."));
    }

    #[test]
    fn test_expand_unknown_user_is_nil() {
        assert_eq!(expand_path(&Value::from("~kestrel-no-such-user")).unwrap(), Value::Nil);
    }

    #[test]
    fn test_module_name_from_string() {
        assert_eq!(module_name(&Value::from("Net")).unwrap(), ModuleName::new("net"));
    }
}
