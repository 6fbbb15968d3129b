// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Values exchanged with scripts

use crate::dylib::NativeHandle;
use crate::module_system::ModuleName;
use std::fmt;
use std::sync::Arc;

/// A script-level value as seen by the loader natives.
#[derive(Debug, Clone)]
pub enum Value {
    /// The unbound sentinel; "nothing was found"
    Unbound,
    /// nil
    Nil,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// String
    String(String),
    /// Symbol
    Symbol(ModuleName),
    /// Installed native library
    Native(Arc<NativeHandle>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unbound, Value::Unbound) => true,
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns true if this value is the unbound sentinel.
    pub fn is_unbound(&self) -> bool {
        matches!(self, Value::Unbound)
    }

    /// The string contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unbound => write!(f, "#unbound"),
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, "'{}", s),
            Value::Native(h) => write!(f, "<native {}>", h.path().display()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
