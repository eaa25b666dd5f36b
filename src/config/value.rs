//! Scalar configuration values and typed extraction.

use std::fmt;

/// A scalar configuration value.
///
/// Access is by pattern match: [`ConfigScalar::from_value`] only accepts the
/// variant that corresponds to the requested Rust type, so an `Int` is never
/// silently widened into an `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Int(i64),
    Real(f64),
    Str(String),
    Bool(bool),
}

impl ConfigValue {
    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Int(_) => "int",
            ConfigValue::Real(_) => "real",
            ConfigValue::Str(_) => "string",
            ConfigValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Int(v) => write!(f, "{v}"),
            // Debug keeps a decimal point or exponent so the value re-parses as real
            ConfigValue::Real(v) => write!(f, "{v:?}"),
            ConfigValue::Str(v) => write!(f, "\"{}\"", escape(v)),
            ConfigValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Real(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

/// Rust types that can be read out of a [`ConfigValue`].
///
/// Returning `None` makes [`Config::get`](super::Config::get) fall back to the
/// caller's default.
pub trait ConfigScalar: Sized {
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

impl ConfigScalar for i64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConfigScalar for i32 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl ConfigScalar for u64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl ConfigScalar for usize {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl ConfigScalar for f64 {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Real(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConfigScalar for bool {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConfigScalar for String {
    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}
