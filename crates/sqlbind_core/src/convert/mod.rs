//! Bidirectional type conversion between semantic and storage values.
//!
//! # Responsibility
//! - Define the converter contract used by the serializer for every field
//!   type the backend cannot store natively.
//! - Provide first-match converter lookup by source type tag.
//!
//! # Invariants
//! - Converters are stateless; `to_db` accepts only its `source_type` tag
//!   and `from_db` only its `db_type` tag.
//! - `from_db(to_db(x))` round-trips exactly on the storage→source→storage
//!   direction; source→storage→source may truncate where documented.

mod defaults;

pub use defaults::{
    default_converters, BoolConverter, DateConverter, DateTimeConverter, DurationConverter,
    JsonConverter,
};

use crate::value::{FieldType, FieldValue, SqlType, SqlValue};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Conversion failure raised by a [`TypeConverter`].
#[derive(Debug)]
pub enum ConvertError {
    /// `to_db` received a value whose tag is not the converter's source type.
    SourceType {
        converter: &'static str,
        expected: FieldType,
        actual: Option<FieldType>,
    },
    /// `from_db` received a value whose tag is not the converter's db type.
    DbType {
        converter: &'static str,
        expected: SqlType,
        actual: Option<SqlType>,
    },
    /// The payload had the right tag but an unrepresentable content, e.g. an
    /// out-of-range ordinal or unparseable JSON text.
    Malformed {
        converter: &'static str,
        message: String,
    },
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceType {
                converter,
                expected,
                actual,
            } => write!(
                f,
                "converter `{converter}` expected source type {expected:?}, got {actual:?}"
            ),
            Self::DbType {
                converter,
                expected,
                actual,
            } => write!(
                f,
                "converter `{converter}` expected database type {expected:?}, got {actual:?}"
            ),
            Self::Malformed { converter, message } => {
                write!(f, "converter `{converter}` rejected value: {message}")
            }
        }
    }
}

impl Error for ConvertError {}

/// Stateless bidirectional conversion between one semantic type and one
/// storage-native type.
pub trait TypeConverter {
    /// Semantic tag this converter translates.
    fn source_type(&self) -> FieldType;

    /// Storage tag produced by `to_db` and accepted by `from_db`.
    fn db_type(&self) -> SqlType;

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError>;

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError>;
}

/// Returns the first converter registered for `source`, if any.
///
/// Lookup order is registration order; a caller wanting to override a
/// default converter registers its own ahead of the defaults.
pub fn find_for_source(
    converters: &[Box<dyn TypeConverter>],
    source: FieldType,
) -> Option<&dyn TypeConverter> {
    converters
        .iter()
        .find(|converter| converter.source_type() == source)
        .map(Box::as_ref)
}

#[cfg(test)]
mod tests {
    use super::{default_converters, find_for_source, TypeConverter};
    use crate::value::{FieldType, FieldValue, SqlType, SqlValue};

    struct TextBool;

    impl TypeConverter for TextBool {
        fn source_type(&self) -> FieldType {
            FieldType::Bool
        }

        fn db_type(&self) -> SqlType {
            SqlType::Text
        }

        fn to_db(&self, value: FieldValue) -> Result<SqlValue, super::ConvertError> {
            Ok(SqlValue::Text(
                if value.as_bool() == Some(true) { "t" } else { "f" }.to_string(),
            ))
        }

        fn from_db(&self, value: SqlValue) -> Result<FieldValue, super::ConvertError> {
            Ok(FieldValue::Bool(value.sql_type() == Some(SqlType::Text)))
        }
    }

    #[test]
    fn lookup_prefers_earlier_registration() {
        let mut converters = default_converters();
        converters.insert(0, Box::new(TextBool));

        let found = find_for_source(&converters, FieldType::Bool).unwrap();
        assert_eq!(found.db_type(), SqlType::Text);
    }

    #[test]
    fn lookup_misses_unregistered_tags() {
        let converters = default_converters();
        assert!(find_for_source(&converters, FieldType::Text).is_none());
    }
}
