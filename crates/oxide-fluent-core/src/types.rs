//! Value types shared by the expression model: column types, referential
//! rules, constraint kinds and column defaults.

use serde::{Deserialize, Serialize};

/// Provider-agnostic column types.
///
/// Each provider maps these onto its own DDL type names when the queued
/// expressions are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    // String types
    /// Variable-length non-Unicode string.
    AnsiString,
    /// Fixed-length non-Unicode string.
    AnsiStringFixedLength,
    /// Variable-length Unicode string.
    String,
    /// Fixed-length Unicode string.
    StringFixedLength,
    /// XML document.
    Xml,

    // Numeric types
    /// Boolean.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Single-precision float.
    Single,
    /// Double-precision float.
    Double,
    /// Exact decimal with size and precision.
    Decimal,
    /// Monetary value.
    Currency,

    // Date/time types
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Time only.
    Time,

    // Other
    /// Binary data.
    Binary,
    /// Globally unique identifier.
    Guid,
}

/// Referential action applied to dependent rows when a referenced row is
/// deleted or updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// No action.
    #[default]
    None,
    /// Cascade the operation.
    Cascade,
    /// Set the dependent column to NULL.
    SetNull,
    /// Set the dependent column to its default value.
    SetDefault,
    /// Refuse the operation.
    Restrict,
}

/// Kind of an index or table constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    /// Primary key.
    PrimaryKey,
    /// Unique values.
    Unique,
    /// No uniqueness guarantee.
    #[default]
    NonUnique,
}

/// Sort direction of an index column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

/// Database-side functions usable as column defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemMethod {
    /// A new random GUID.
    NewGuid,
    /// A new sequential GUID.
    NewSequentialId,
    /// The current local date and time.
    CurrentDateTime,
    /// The current UTC date and time.
    CurrentUtcDateTime,
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Computed by a database function.
    Method(SystemMethod),
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
}

impl From<SystemMethod> for DefaultValue {
    fn from(method: SystemMethod) -> Self {
        Self::Method(method)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for DefaultValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_conversions() {
        assert_eq!(DefaultValue::from(true), DefaultValue::Boolean(true));
        assert_eq!(DefaultValue::from(7), DefaultValue::Integer(7));
        assert_eq!(DefaultValue::from(7_i64), DefaultValue::Integer(7));
        assert_eq!(DefaultValue::from(1.5), DefaultValue::Float(1.5));
        assert_eq!(
            DefaultValue::from("draft"),
            DefaultValue::String("draft".to_string())
        );
        assert_eq!(
            DefaultValue::from(SystemMethod::NewGuid),
            DefaultValue::Method(SystemMethod::NewGuid)
        );
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert_eq!(DefaultValue::from(None::<i64>), DefaultValue::Null);
        assert_eq!(DefaultValue::from(Some(3_i64)), DefaultValue::Integer(3));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Rule::default(), Rule::None);
        assert_eq!(ConstraintType::default(), ConstraintType::NonUnique);
        assert_eq!(Direction::default(), Direction::Ascending);
    }
}
