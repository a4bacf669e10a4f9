//! Tagged value model shared by fields, converters and statements.
//!
//! # Responsibility
//! - Define the storage-native scalar universe (`SqlType`/`SqlValue`).
//! - Define the semantic scalar universe fields declare (`FieldType`/`FieldValue`).
//! - Provide lossless hops between the two where the backend stores a value natively.
//!
//! # Invariants
//! - `SqlValue` holds only values a SQL backend can bind directly.
//! - Every non-null `FieldValue` reports exactly one `FieldType` tag.
//! - `into_native`/`from_native` never change a native value, only its wrapper.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Storage-native scalar type tag.
///
/// Nulls are untyped at the storage layer and therefore have no tag here;
/// they are always storable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

/// Storage-native scalar value, ready for parameter binding.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the storage type tag, or `None` for `Null`.
    pub fn sql_type(&self) -> Option<SqlType> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(SqlType::Integer),
            Self::Real(_) => Some(SqlType::Real),
            Self::Text(_) => Some(SqlType::Text),
            Self::Blob(_) => Some(SqlType::Blob),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Semantic type tag a field can declare.
///
/// The first four tags are stored natively by SQL backends; the rest require
/// a registered type converter before they reach a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Blob,
    Bool,
    Date,
    DateTime,
    Duration,
    Json,
}

impl FieldType {
    /// Returns the storage type this tag maps onto without conversion,
    /// or `None` when a converter is required.
    pub fn native(self) -> Option<SqlType> {
        match self {
            Self::Integer => Some(SqlType::Integer),
            Self::Real => Some(SqlType::Real),
            Self::Text => Some(SqlType::Text),
            Self::Blob => Some(SqlType::Blob),
            Self::Bool | Self::Date | Self::DateTime | Self::Duration | Self::Json => None,
        }
    }
}

/// Semantic scalar value read from or written to a domain object.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Duration(TimeDelta),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Returns the semantic type tag, or `None` for `Null`.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(FieldType::Integer),
            Self::Real(_) => Some(FieldType::Real),
            Self::Text(_) => Some(FieldType::Text),
            Self::Blob(_) => Some(FieldType::Blob),
            Self::Bool(_) => Some(FieldType::Bool),
            Self::Date(_) => Some(FieldType::Date),
            Self::DateTime(_) => Some(FieldType::DateTime),
            Self::Duration(_) => Some(FieldType::Duration),
            Self::Json(_) => Some(FieldType::Json),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Unwraps into a storage-native value, or hands the value back when the
    /// backend cannot store it without a converter.
    pub fn into_native(self) -> Result<SqlValue, Self> {
        match self {
            Self::Null => Ok(SqlValue::Null),
            Self::Integer(value) => Ok(SqlValue::Integer(value)),
            Self::Real(value) => Ok(SqlValue::Real(value)),
            Self::Text(value) => Ok(SqlValue::Text(value)),
            Self::Blob(value) => Ok(SqlValue::Blob(value)),
            other => Err(other),
        }
    }

    /// Wraps a storage value in its semantic counterpart unchanged.
    pub fn from_native(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Self::Null,
            SqlValue::Integer(value) => Self::Integer(value),
            SqlValue::Real(value) => Self::Real(value),
            SqlValue::Text(value) => Self::Text(value),
            SqlValue::Blob(value) => Self::Blob(value),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_blob(self) -> Option<Vec<u8>> {
        match self {
            Self::Blob(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Duration(value) => Some(*value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<TimeDelta> for FieldValue {
    fn from(value: TimeDelta) -> Self {
        Self::Duration(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// `None` maps to `Null`; nullability is enforced by the owning field.
impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldType, FieldValue, SqlType, SqlValue};

    #[test]
    fn native_tags_round_trip_between_universes() {
        let native = FieldValue::from(42i64)
            .into_native()
            .expect("integer is storage-native");
        assert_eq!(native, SqlValue::Integer(42));
        assert_eq!(FieldValue::from_native(native), FieldValue::Integer(42));
    }

    #[test]
    fn semantic_tags_refuse_native_unwrap() {
        let value = FieldValue::from(true);
        assert_eq!(value.field_type(), Some(FieldType::Bool));
        assert!(value.into_native().is_err());
    }

    #[test]
    fn null_has_no_tag_in_either_universe() {
        assert_eq!(SqlValue::Null.sql_type(), None);
        assert_eq!(FieldValue::Null.field_type(), None);
        assert_eq!(FieldValue::from(Option::<i64>::None), FieldValue::Null);
    }

    #[test]
    fn only_converter_backed_tags_lack_a_native_type() {
        assert_eq!(FieldType::Text.native(), Some(SqlType::Text));
        assert_eq!(FieldType::Json.native(), None);
        assert_eq!(FieldType::Date.native(), None);
    }
}
