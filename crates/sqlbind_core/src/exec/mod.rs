//! Statement execution seam between the request layer and a storage engine.
//!
//! # Responsibility
//! - Define the executor contract requests dispatch through.
//! - Surface backend failures unchanged to the caller.
//!
//! # Invariants
//! - One `run` call executes exactly one statement (or one batch script).
//! - Executors never retry and never swallow errors.

mod sqlite;

pub use sqlite::SqliteExecutor;

use crate::convert::TypeConverter;
use crate::sql::Statement;
use crate::value::{SqlType, SqlValue};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Storage-engine failure surfaced by an executor.
#[derive(Debug)]
pub enum ExecutorError {
    Sqlite(rusqlite::Error),
}

impl Display for ExecutorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExecutorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for ExecutorError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous statement runner owned by a storage backend.
///
/// The executor owns all connection lifecycle; the request layer treats it
/// as an opaque function from statements to rows.
pub trait Executor {
    /// Executes one statement. Query statements return their rows in order;
    /// all other kinds return an empty row set.
    fn run(&self, statement: &Statement) -> ExecutorResult<Vec<Vec<SqlValue>>>;

    /// Scalar types this backend stores without conversion.
    fn supported_types(&self) -> Vec<SqlType>;

    /// Backend-recommended converters, merged after caller-supplied ones.
    fn default_converters(&self) -> Vec<Box<dyn TypeConverter>>;
}
