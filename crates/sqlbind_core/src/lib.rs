//! Field-based object/SQL mapping core.
//!
//! Persists plain domain objects against a relational store without
//! hand-written SQL: declare [`Field`] bindings for a type, pick key fields,
//! and a [`CrudRequest`] composes serialization, statement building and
//! execution into save/load/update/delete/load_all operations. Values the
//! backend cannot store natively pass through pluggable [`TypeConverter`]s.

pub mod convert;
pub mod exec;
pub mod field;
pub mod logging;
pub mod request;
pub mod serialize;
pub mod sql;
pub mod value;

pub use convert::{default_converters, ConvertError, TypeConverter};
pub use exec::{Executor, ExecutorError, SqliteExecutor};
pub use field::{Field, FieldError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use request::{
    CompositeRequest, CrudRequest, ListQuery, RequestError, SchemaError, SortKey,
};
pub use serialize::{RowSerializer, SerializeError};
pub use sql::{
    Columns, Custom, Delete, Insert, Limit, Script, Select, Statement, StatementError,
    StatementKind, Update, Where,
};
pub use value::{FieldType, FieldValue, SqlType, SqlValue};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
