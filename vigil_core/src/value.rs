// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding values and their comparison rule.

use alloc::string::String;
use core::fmt;

/// A value produced by a binding expression.
///
/// Bindings commit only when the new value differs from the previously
/// recorded one. Comparison is by value, except that `NaN` is considered
/// equal to itself so that a binding evaluating to `NaN` on every pass is
/// stable.
#[derive(Clone, Debug, Default)]
pub enum BindingValue {
    /// No value. Renders as the empty string.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
}

impl PartialEq for BindingValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for BindingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for BindingValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for BindingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for BindingValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<usize> for BindingValue {
    fn from(v: usize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for BindingValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for BindingValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for BindingValue {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for BindingValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for BindingValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl<T: Into<Self>> From<Option<T>> for BindingValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
