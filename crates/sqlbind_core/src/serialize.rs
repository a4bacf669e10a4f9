//! Row (de)serialization between domain objects and storage values.
//!
//! # Responsibility
//! - Extract field values from an object into a bindable column/value row.
//! - Inject a returned row back into an object.
//! - Route every value the backend cannot store natively through the first
//!   matching type converter.
//!
//! # Invariants
//! - Field order is column order and must match between save and load.
//! - A row's arity must equal the field count before any value is applied.
//! - Nulls bypass converters; nullability is enforced at the field boundary.

use crate::convert::{self, ConvertError, TypeConverter};
use crate::field::{Field, FieldError};
use crate::value::{FieldType, FieldValue, SqlType, SqlValue};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialization failure for one object/row pass.
#[derive(Debug)]
pub enum SerializeError {
    Field(FieldError),
    Convert(ConvertError),
    /// A value needed conversion but no converter is registered for the
    /// field's declared type.
    UnsupportedType { field: String, value_type: FieldType },
    /// Returned row arity does not match the field count.
    RowArity { expected: usize, actual: usize },
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::Convert(err) => write!(f, "{err}"),
            Self::UnsupportedType { field, value_type } => write!(
                f,
                "field `{field}`: no converter registered for unsupported type {value_type:?}"
            ),
            Self::RowArity { expected, actual } => write!(
                f,
                "row has {actual} values, schema declares {expected} fields"
            ),
        }
    }
}

impl Error for SerializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Convert(err) => Some(err),
            Self::UnsupportedType { .. } | Self::RowArity { .. } => None,
        }
    }
}

impl From<FieldError> for SerializeError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

impl From<ConvertError> for SerializeError {
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
    }
}

/// Orders fields, applies converters, and moves rows in and out of objects.
pub struct RowSerializer<M> {
    fields: Vec<Field<M>>,
    supported: Vec<SqlType>,
    converters: Vec<Box<dyn TypeConverter>>,
}

impl<M> RowSerializer<M> {
    pub fn new(
        fields: Vec<Field<M>>,
        supported: Vec<SqlType>,
        converters: Vec<Box<dyn TypeConverter>>,
    ) -> Self {
        Self {
            fields,
            supported,
            converters,
        }
    }

    pub fn fields(&self) -> &[Field<M>] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&Field<M>> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    /// Extracts all field values from `object`, converting where needed.
    ///
    /// Returns parallel column/value sequences ready for parameter binding.
    pub fn params_and_values(&self, object: &M) -> Result<(Vec<&str>, Vec<SqlValue>), SerializeError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = field.extract(object)?;
            values.push(self.to_db_value(field, value)?);
        }
        Ok((self.columns(), values))
    }

    /// Applies a returned row to `object` in field declaration order.
    ///
    /// The row must come from a statement whose column order was built from
    /// this serializer's field order; that pairing is a caller contract.
    pub fn apply_row(&self, object: &mut M, row: &[SqlValue]) -> Result<(), SerializeError> {
        if row.len() != self.fields.len() {
            return Err(SerializeError::RowArity {
                expected: self.fields.len(),
                actual: row.len(),
            });
        }
        for (field, value) in self.fields.iter().zip(row.iter().cloned()) {
            let value = self.from_db_value(field, value)?;
            field.inject(object, value)?;
        }
        Ok(())
    }

    /// Converts one extracted value for storage.
    pub(crate) fn to_db_value(
        &self,
        field: &Field<M>,
        value: FieldValue,
    ) -> Result<SqlValue, SerializeError> {
        let value = match value.into_native() {
            Ok(native) => {
                let storable = match native.sql_type() {
                    None => true,
                    Some(sql_type) => self.supported.contains(&sql_type),
                };
                if storable {
                    return Ok(native);
                }
                FieldValue::from_native(native)
            }
            Err(value) => value,
        };

        let converter = convert::find_for_source(&self.converters, field.field_type()).ok_or(
            SerializeError::UnsupportedType {
                field: field.name().to_string(),
                value_type: field.field_type(),
            },
        )?;
        Ok(converter.to_db(value)?)
    }

    fn from_db_value(&self, field: &Field<M>, value: SqlValue) -> Result<FieldValue, SerializeError> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }
        let native = field
            .field_type()
            .native()
            .is_some_and(|sql_type| self.supported.contains(&sql_type));
        if native {
            return Ok(FieldValue::from_native(value));
        }

        let converter = convert::find_for_source(&self.converters, field.field_type()).ok_or(
            SerializeError::UnsupportedType {
                field: field.name().to_string(),
                value_type: field.field_type(),
            },
        )?;
        Ok(converter.from_db(value)?)
    }
}

impl<M> std::fmt::Debug for RowSerializer<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSerializer")
            .field("fields", &self.fields)
            .field("supported", &self.supported)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{RowSerializer, SerializeError};
    use crate::convert::default_converters;
    use crate::field::Field;
    use crate::value::{FieldType, FieldValue, SqlType, SqlValue};

    #[derive(Default)]
    struct Flagged {
        id: Option<i64>,
        active: bool,
    }

    fn serializer() -> RowSerializer<Flagged> {
        RowSerializer::new(
            vec![
                Field::nullable(
                    "id",
                    FieldType::Integer,
                    |m: &Flagged| FieldValue::from(m.id),
                    |m, v| m.id = v.as_integer(),
                ),
                Field::new(
                    "active",
                    FieldType::Bool,
                    |m: &Flagged| FieldValue::from(m.active),
                    |m, v| m.active = v.as_bool().unwrap_or_default(),
                ),
            ],
            vec![SqlType::Integer, SqlType::Real, SqlType::Text, SqlType::Blob],
            default_converters(),
        )
    }

    #[test]
    fn extraction_converts_unsupported_types() {
        let object = Flagged {
            id: Some(5),
            active: true,
        };
        let serializer = serializer();
        let (params, values) = serializer.params_and_values(&object).unwrap();
        assert_eq!(params, vec!["id", "active"]);
        assert_eq!(values, vec![SqlValue::Integer(5), SqlValue::Integer(1)]);
    }

    #[test]
    fn missing_converter_is_unsupported_type() {
        let serializer = RowSerializer::new(
            vec![Field::new(
                "active",
                FieldType::Bool,
                |m: &Flagged| FieldValue::from(m.active),
                |m, v| m.active = v.as_bool().unwrap_or_default(),
            )],
            vec![SqlType::Integer],
            Vec::new(),
        );
        let err = serializer
            .params_and_values(&Flagged::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::UnsupportedType {
                value_type: FieldType::Bool,
                ..
            }
        ));
    }

    #[test]
    fn apply_row_rejects_arity_mismatch() {
        let mut object = Flagged::default();
        let row = vec![
            SqlValue::Integer(1),
            SqlValue::Integer(0),
            SqlValue::Integer(9),
        ];
        let err = serializer().apply_row(&mut object, &row).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::RowArity {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn apply_row_converts_and_injects_in_order() {
        let mut object = Flagged::default();
        serializer()
            .apply_row(&mut object, &[SqlValue::Null, SqlValue::Integer(1)])
            .unwrap();
        assert_eq!(object.id, None);
        assert!(object.active);
    }
}
