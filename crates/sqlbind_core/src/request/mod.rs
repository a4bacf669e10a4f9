//! Generic CRUD requests over a field schema and an executor.
//!
//! # Responsibility
//! - Compose serializer output and statement builders into full
//!   save/load/update/delete/load_all operations.
//! - Resolve row identity through declared key fields.
//!
//! # Invariants
//! - A request's schema (fields, key fields, table) is validated at
//!   construction and immutable afterwards.
//! - Every operation executes exactly one statement.
//! - Key values are bound as parameters, never interpolated into SQL text.

mod composite;

pub use composite::CompositeRequest;

use crate::convert::TypeConverter;
use crate::exec::{Executor, ExecutorError};
use crate::field::Field;
use crate::serialize::{RowSerializer, SerializeError};
use crate::sql::{Columns, Delete, Insert, Limit, Select, StatementError, Update, Where};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema misconfiguration or unresolvable schema reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A request needs at least one key field to identify rows.
    NoKeyFields,
    /// A declared key field name matches no field in the schema.
    UnknownKeyField { name: String },
    /// Two fields share one column name.
    DuplicateField { name: String },
    /// Every key field of the object is null; no row condition exists.
    AllKeyFieldsNull { table: String },
    /// A sort key matches no declared field.
    UnknownSortField { name: String },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoKeyFields => write!(f, "schema declares no key fields"),
            Self::UnknownKeyField { name } => {
                write!(f, "key field `{name}` is not part of the field set")
            }
            Self::DuplicateField { name } => {
                write!(f, "field `{name}` is declared more than once")
            }
            Self::AllKeyFieldsNull { table } => write!(
                f,
                "cannot identify a row in `{table}`: all key fields are null"
            ),
            Self::UnknownSortField { name } => {
                write!(f, "cannot sort by `{name}`: no such field")
            }
        }
    }
}

impl Error for SchemaError {}

/// Any failure raised by a request operation.
#[derive(Debug)]
pub enum RequestError {
    Schema(SchemaError),
    Serialize(SerializeError),
    Statement(StatementError),
    Executor(ExecutorError),
    /// Composite dispatch found no request registered for the model type.
    NoMatchingRequest { model: &'static str },
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "{err}"),
            Self::Statement(err) => write!(f, "{err}"),
            Self::Executor(err) => write!(f, "{err}"),
            Self::NoMatchingRequest { model } => {
                write!(f, "no request registered for model type `{model}`")
            }
        }
    }
}

impl Error for RequestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Statement(err) => Some(err),
            Self::Executor(err) => Some(err),
            Self::NoMatchingRequest { .. } => None,
        }
    }
}

impl From<SchemaError> for RequestError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<SerializeError> for RequestError {
    fn from(value: SerializeError) -> Self {
        Self::Serialize(value)
    }
}

impl From<StatementError> for RequestError {
    fn from(value: StatementError) -> Self {
        Self::Statement(value)
    }
}

impl From<ExecutorError> for RequestError {
    fn from(value: ExecutorError) -> Self {
        Self::Executor(value)
    }
}

/// Sort column reference for [`CrudRequest::load_all`].
///
/// Built from a column name or from the field itself; resolution against
/// the schema happens inside `load_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey(String);

impl SortKey {
    pub fn column(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        Self::column(value)
    }
}

impl<M> From<&Field<M>> for SortKey {
    fn from(value: &Field<M>) -> Self {
        Self::column(value.name())
    }
}

/// Options for [`CrudRequest::load_all`].
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Maximum number of rows to return.
    pub limit: Option<u32>,
    /// Descending order when a sort column is active. Defaults to `true`.
    pub reverse: bool,
    /// Explicit sort column; when absent and a limit is set, the first key
    /// field sorts implicitly to keep truncation deterministic.
    pub sort_by: Option<SortKey>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: None,
            reverse: true,
            sort_by: None,
        }
    }
}

/// CRUD facade for one model type over one table.
pub struct CrudRequest<M> {
    table: String,
    serializer: RowSerializer<M>,
    key_indexes: Vec<usize>,
    executor: Box<dyn Executor>,
}

impl<M> CrudRequest<M> {
    /// Creates a request using the executor's default converters.
    pub fn try_new(
        table: &str,
        fields: Vec<Field<M>>,
        key_fields: &[&str],
        executor: Box<dyn Executor>,
    ) -> Result<Self, RequestError> {
        Self::try_with_converters(table, fields, key_fields, executor, Vec::new(), false)
    }

    /// Creates a request with caller-supplied converters.
    ///
    /// Caller converters are consulted before the executor's defaults;
    /// `replace` drops the defaults entirely.
    pub fn try_with_converters(
        table: &str,
        fields: Vec<Field<M>>,
        key_fields: &[&str],
        executor: Box<dyn Executor>,
        mut converters: Vec<Box<dyn TypeConverter>>,
        replace: bool,
    ) -> Result<Self, RequestError> {
        let table = crate::sql::validate_table(table)?;

        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|other| other.name() == field.name()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name().to_string(),
                }
                .into());
            }
        }

        if key_fields.is_empty() {
            return Err(SchemaError::NoKeyFields.into());
        }
        let key_indexes = key_fields
            .iter()
            .map(|name| {
                fields
                    .iter()
                    .position(|field| field.name() == *name)
                    .ok_or_else(|| SchemaError::UnknownKeyField {
                        name: (*name).to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !replace {
            converters.extend(executor.default_converters());
        }
        let serializer = RowSerializer::new(fields, executor.supported_types(), converters);

        Ok(Self {
            table,
            serializer,
            key_indexes,
            executor,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[Field<M>] {
        self.serializer.fields()
    }

    /// Inserts `object` as a new row.
    pub fn save(&self, object: &M) -> Result<(), RequestError> {
        let (params, values) = self.serializer.params_and_values(object)?;
        let insert = Insert::new(&self.table, &params, values)?;
        self.executor.run(&insert.statement())?;
        Ok(())
    }

    /// Loads the row identified by `object`'s key fields into `object`.
    ///
    /// Returns `false` and leaves `object` untouched when no row matches.
    pub fn load(&self, object: &mut M) -> Result<bool, RequestError> {
        let condition = self.key_condition(object)?;
        let select = Select::new(&self.table, Columns::All)?
            .filter(condition)
            .limit(Limit::Rows(1));

        let rows = self.executor.run(&select.statement())?;
        match rows.first() {
            Some(row) => {
                self.serializer.apply_row(object, row)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rewrites the row identified by `object`'s current in-memory key
    /// values with `object`'s full field set.
    pub fn update(&self, object: &M) -> Result<(), RequestError> {
        let condition = self.key_condition(object)?;
        let (params, values) = self.serializer.params_and_values(object)?;
        let update = Update::new(&self.table, &params, values)?.filter(condition);
        self.executor.run(&update.statement())?;
        Ok(())
    }

    /// Deletes the row identified by `object`'s key fields.
    pub fn delete(&self, object: &M) -> Result<(), RequestError> {
        let condition = self.key_condition(object)?;
        let delete = Delete::new(&self.table)?.filter(condition);
        self.executor.run(&delete.statement())?;
        Ok(())
    }

    /// Loads every row of the table as fresh objects, in row order.
    pub fn load_all(&self, query: &ListQuery) -> Result<Vec<M>, RequestError>
    where
        M: Default,
    {
        let sort_column = match &query.sort_by {
            Some(key) => {
                if self.serializer.field_named(key.name()).is_none() {
                    return Err(SchemaError::UnknownSortField {
                        name: key.name().to_string(),
                    }
                    .into());
                }
                Some(key.name().to_string())
            }
            // An implicit deterministic sort; otherwise a limit would
            // truncate in storage order.
            None => query.limit.map(|_| self.first_key_field().name().to_string()),
        };

        let mut select = Select::new(&self.table, Columns::All)?;
        if let Some(column) = sort_column {
            let order = if query.reverse {
                format!("{column} DESC")
            } else {
                column
            };
            select = select.order_by(&order)?;
        }
        if let Some(limit) = query.limit {
            select = select.limit(Limit::rows(limit)?);
        }

        let rows = self.executor.run(&select.statement())?;
        let mut objects = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut object = M::default();
            self.serializer.apply_row(&mut object, row)?;
            objects.push(object);
        }
        Ok(objects)
    }

    fn first_key_field(&self) -> &Field<M> {
        &self.serializer.fields()[self.key_indexes[0]]
    }

    /// Builds the row-identifying condition from the first non-null key
    /// field, in key declaration order.
    fn key_condition(&self, object: &M) -> Result<Where, RequestError> {
        for &index in &self.key_indexes {
            let field = &self.serializer.fields()[index];
            let value = field.peek(object);
            if value.is_null() {
                continue;
            }
            field.check(&value).map_err(SerializeError::from)?;
            let bound = self.serializer.to_db_value(field, value)?;
            let condition = Where::with_values(&format!("{} = ?", field.name()), vec![bound])?;
            return Ok(condition);
        }
        Err(SchemaError::AllKeyFieldsNull {
            table: self.table.clone(),
        }
        .into())
    }
}

impl<M> std::fmt::Debug for CrudRequest<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudRequest")
            .field("table", &self.table)
            .field("key_indexes", &self.key_indexes)
            .finish()
    }
}
