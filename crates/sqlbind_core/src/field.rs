//! Column-to-attribute field bindings.
//!
//! # Responsibility
//! - Bind a named storage column to one attribute of a domain object.
//! - Validate every value crossing the binding against the declared type
//!   and nullability.
//!
//! # Invariants
//! - A value passes `extract`/`inject` only when its tag equals the declared
//!   `FieldType`, or it is null and the field allows null.
//! - Fields hold no per-call state and are safe to share across concurrent
//!   operations on different objects.

use crate::value::{FieldType, FieldValue};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reads one attribute of `M` as a [`FieldValue`].
pub type Getter<M> = fn(&M) -> FieldValue;

/// Writes one attribute of `M` from a [`FieldValue`].
///
/// The value's tag is validated before the setter runs, so the setter may
/// assume the declared variant (or `Null` for nullable fields).
pub type Setter<M> = fn(&mut M, FieldValue);

/// Validation error raised at the field boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value's runtime tag does not match the declared field type.
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },
    /// A null was observed on a field that does not allow null. This covers
    /// both reading an unset attribute and writing an explicit null.
    NullNotAllowed { field: String },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field `{field}` got value of type {actual:?}, expected {expected:?}"
            ),
            Self::NullNotAllowed { field } => {
                write!(f, "field `{field}` does not allow null values")
            }
        }
    }
}

impl Error for FieldError {}

/// Named, typed binding between a storage column and an attribute of `M`.
///
/// Constructed once at schema-definition time and shared across requests.
/// Values pass through `extract`/`inject` return values instead of any
/// internal slot, so a single `Field` serves concurrent calls.
pub struct Field<M> {
    name: String,
    field_type: FieldType,
    allow_null: bool,
    get: Getter<M>,
    set: Setter<M>,
}

impl<M> Field<M> {
    /// Creates a non-nullable field binding.
    pub fn new(name: &str, field_type: FieldType, get: Getter<M>, set: Setter<M>) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            allow_null: false,
            get,
            set,
        }
    }

    /// Creates a field binding that accepts null values.
    pub fn nullable(name: &str, field_type: FieldType, get: Getter<M>, set: Setter<M>) -> Self {
        Self {
            allow_null: true,
            ..Self::new(name, field_type, get, set)
        }
    }

    /// Storage column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared semantic type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// Validates a value against the declared type and nullability.
    pub fn check(&self, value: &FieldValue) -> Result<(), FieldError> {
        match value.field_type() {
            None if self.allow_null => Ok(()),
            None => Err(FieldError::NullNotAllowed {
                field: self.name.clone(),
            }),
            Some(actual) if actual == self.field_type => Ok(()),
            Some(actual) => Err(FieldError::TypeMismatch {
                field: self.name.clone(),
                expected: self.field_type,
                actual,
            }),
        }
    }

    /// Reads the bound attribute and validates the result.
    pub fn extract(&self, object: &M) -> Result<FieldValue, FieldError> {
        let value = (self.get)(object);
        self.check(&value)?;
        Ok(value)
    }

    /// Reads the bound attribute without validation.
    ///
    /// Key-condition assembly uses this to probe optional key fields whose
    /// declared nullability would otherwise reject an unset value.
    pub(crate) fn peek(&self, object: &M) -> FieldValue {
        (self.get)(object)
    }

    /// Validates a value and writes it through the bound setter.
    pub fn inject(&self, object: &mut M, value: FieldValue) -> Result<(), FieldError> {
        self.check(&value)?;
        (self.set)(object, value);
        Ok(())
    }
}

impl<M> Clone for Field<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            field_type: self.field_type,
            allow_null: self.allow_null,
            get: self.get,
            set: self.set,
        }
    }
}

impl<M> std::fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("allow_null", &self.allow_null)
            .finish()
    }
}
