//! Default converter set for SQL backends.
//!
//! Encodings mirror common relational practice: booleans as 0/1 integers,
//! dates as ordinal day counts, timestamps as fractional epoch seconds,
//! durations as whole seconds, structured data as JSON text.

use super::{ConvertError, TypeConverter};
use crate::value::{FieldType, FieldValue, SqlType, SqlValue};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Returns the default converters in lookup order.
pub fn default_converters() -> Vec<Box<dyn TypeConverter>> {
    vec![
        Box::new(BoolConverter),
        Box::new(DateConverter),
        Box::new(DateTimeConverter),
        Box::new(DurationConverter),
        Box::new(JsonConverter),
    ]
}

fn source_mismatch(converter: &'static str, expected: FieldType, value: &FieldValue) -> ConvertError {
    ConvertError::SourceType {
        converter,
        expected,
        actual: value.field_type(),
    }
}

fn db_mismatch(converter: &'static str, expected: SqlType, value: &SqlValue) -> ConvertError {
    ConvertError::DbType {
        converter,
        expected,
        actual: value.sql_type(),
    }
}

/// `Bool` ↔ `Integer` as 0/1.
///
/// Decoding rejects any integer other than 0 or 1 instead of masking
/// corrupted rows.
pub struct BoolConverter;

impl TypeConverter for BoolConverter {
    fn source_type(&self) -> FieldType {
        FieldType::Bool
    }

    fn db_type(&self) -> SqlType {
        SqlType::Integer
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::Bool(flag) => Ok(SqlValue::Integer(i64::from(flag))),
            other => Err(source_mismatch("bool", FieldType::Bool, &other)),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Integer(0) => Ok(FieldValue::Bool(false)),
            SqlValue::Integer(1) => Ok(FieldValue::Bool(true)),
            SqlValue::Integer(other) => Err(ConvertError::Malformed {
                converter: "bool",
                message: format!("expected 0 or 1, got {other}"),
            }),
            other => Err(db_mismatch("bool", SqlType::Integer, &other)),
        }
    }
}

/// `Date` ↔ `Integer` as ordinal day count (days from 0001-01-01).
pub struct DateConverter;

impl TypeConverter for DateConverter {
    fn source_type(&self) -> FieldType {
        FieldType::Date
    }

    fn db_type(&self) -> SqlType {
        SqlType::Integer
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::Date(date) => Ok(SqlValue::Integer(i64::from(date.num_days_from_ce()))),
            other => Err(source_mismatch("date", FieldType::Date, &other)),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Integer(days) => {
                let days = i32::try_from(days).map_err(|_| ConvertError::Malformed {
                    converter: "date",
                    message: format!("ordinal {days} out of range"),
                })?;
                NaiveDate::from_num_days_from_ce_opt(days)
                    .map(FieldValue::Date)
                    .ok_or_else(|| ConvertError::Malformed {
                        converter: "date",
                        message: format!("ordinal {days} out of range"),
                    })
            }
            other => Err(db_mismatch("date", SqlType::Integer, &other)),
        }
    }
}

/// `DateTime` ↔ `Real` as epoch seconds.
///
/// Sub-second precision is preserved at microsecond resolution; anything
/// finer truncates on the source→storage direction.
pub struct DateTimeConverter;

impl TypeConverter for DateTimeConverter {
    fn source_type(&self) -> FieldType {
        FieldType::DateTime
    }

    fn db_type(&self) -> SqlType {
        SqlType::Real
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::DateTime(stamp) => {
                Ok(SqlValue::Real(stamp.timestamp_micros() as f64 / MICROS_PER_SECOND))
            }
            other => Err(source_mismatch("date_time", FieldType::DateTime, &other)),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Real(seconds) => {
                let micros = (seconds * MICROS_PER_SECOND).round();
                if !micros.is_finite() || micros < i64::MIN as f64 || micros > i64::MAX as f64 {
                    return Err(ConvertError::Malformed {
                        converter: "date_time",
                        message: format!("epoch seconds {seconds} out of range"),
                    });
                }
                DateTime::from_timestamp_micros(micros as i64)
                    .map(FieldValue::DateTime)
                    .ok_or_else(|| ConvertError::Malformed {
                        converter: "date_time",
                        message: format!("epoch seconds {seconds} out of range"),
                    })
            }
            other => Err(db_mismatch("date_time", SqlType::Real, &other)),
        }
    }
}

/// `Duration` ↔ `Integer` as whole seconds.
///
/// Sub-second components truncate toward zero when storing.
pub struct DurationConverter;

impl TypeConverter for DurationConverter {
    fn source_type(&self) -> FieldType {
        FieldType::Duration
    }

    fn db_type(&self) -> SqlType {
        SqlType::Integer
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::Duration(span) => Ok(SqlValue::Integer(span.num_seconds())),
            other => Err(source_mismatch("duration", FieldType::Duration, &other)),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Integer(seconds) => TimeDelta::try_seconds(seconds)
                .map(FieldValue::Duration)
                .ok_or_else(|| ConvertError::Malformed {
                    converter: "duration",
                    message: format!("{seconds} seconds out of range"),
                }),
            other => Err(db_mismatch("duration", SqlType::Integer, &other)),
        }
    }
}

/// `Json` ↔ `Text` via JSON encoding.
///
/// Covers every structured payload (arrays, objects, nested mixes) the
/// backend cannot store as a scalar.
pub struct JsonConverter;

impl TypeConverter for JsonConverter {
    fn source_type(&self) -> FieldType {
        FieldType::Json
    }

    fn db_type(&self) -> SqlType {
        SqlType::Text
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::Json(payload) => serde_json::to_string(&payload)
                .map(SqlValue::Text)
                .map_err(|err| ConvertError::Malformed {
                    converter: "json",
                    message: err.to_string(),
                }),
            other => Err(source_mismatch("json", FieldType::Json, &other)),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Text(text) => serde_json::from_str(&text)
                .map(FieldValue::Json)
                .map_err(|err| ConvertError::Malformed {
                    converter: "json",
                    message: err.to_string(),
                }),
            other => Err(db_mismatch("json", SqlType::Text, &other)),
        }
    }
}
