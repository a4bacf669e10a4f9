//! SQLite statement executor.
//!
//! # Responsibility
//! - Run compiled statements against a SQLite database.
//! - Map between [`SqlValue`] and the driver's value representation.
//!
//! # Invariants
//! - File targets open, run, and close a connection per call; implicit
//!   transactions commit before the call returns.
//! - The in-memory target keeps its single connection for the executor's
//!   lifetime, since the database dies with the connection.

use super::{Executor, ExecutorResult};
use crate::convert::{default_converters, TypeConverter};
use crate::sql::{Statement, StatementKind};
use crate::value::{SqlType, SqlValue};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};

enum Target {
    File(PathBuf),
    Memory(Connection),
}

/// Executor backed by a SQLite database file or an in-memory database.
pub struct SqliteExecutor {
    target: Target,
}

impl SqliteExecutor {
    /// Creates a file-backed executor. The file is opened lazily on each
    /// `run` call, so construction never touches the filesystem.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
        }
    }

    /// Creates an executor over a fresh in-memory database.
    pub fn in_memory() -> ExecutorResult<Self> {
        Ok(Self {
            target: Target::Memory(Connection::open_in_memory()?),
        })
    }

    fn run_on(conn: &Connection, statement: &Statement) -> ExecutorResult<Vec<Vec<SqlValue>>> {
        match statement.kind() {
            StatementKind::Batch => {
                conn.execute_batch(statement.text())?;
                Ok(Vec::new())
            }
            StatementKind::Execute => {
                let mut prepared = conn.prepare(statement.text())?;
                prepared.execute(params_from_iter(statement.values().iter().map(to_driver)))?;
                Ok(Vec::new())
            }
            StatementKind::Query => {
                let mut prepared = conn.prepare(statement.text())?;
                let column_count = prepared.column_count();
                let mut rows =
                    prepared.query(params_from_iter(statement.values().iter().map(to_driver)))?;

                let mut table = Vec::new();
                while let Some(row) = rows.next()? {
                    let mut record = Vec::with_capacity(column_count);
                    for index in 0..column_count {
                        record.push(from_driver(row.get::<_, Value>(index)?));
                    }
                    table.push(record);
                }
                Ok(table)
            }
        }
    }
}

impl Executor for SqliteExecutor {
    fn run(&self, statement: &Statement) -> ExecutorResult<Vec<Vec<SqlValue>>> {
        debug!(
            "event=sql_execute module=exec status=start kind={:?} text={}",
            statement.kind(),
            statement.text()
        );

        let result = match &self.target {
            Target::File(path) => {
                let conn = Connection::open(path)?;
                Self::run_on(&conn, statement)
            }
            Target::Memory(conn) => Self::run_on(conn, statement),
        };

        match &result {
            Ok(rows) => debug!(
                "event=sql_execute module=exec status=ok kind={:?} rows={}",
                statement.kind(),
                rows.len()
            ),
            Err(err) => error!(
                "event=sql_execute module=exec status=error kind={:?} error={err}",
                statement.kind()
            ),
        }

        result
    }

    fn supported_types(&self) -> Vec<SqlType> {
        vec![SqlType::Integer, SqlType::Real, SqlType::Text, SqlType::Blob]
    }

    fn default_converters(&self) -> Vec<Box<dyn TypeConverter>> {
        default_converters()
    }
}

fn to_driver(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::Integer(*value),
        SqlValue::Real(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Blob(value) => Value::Blob(value.clone()),
    }
}

fn from_driver(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(value) => SqlValue::Integer(value),
        Value::Real(value) => SqlValue::Real(value),
        Value::Text(value) => SqlValue::Text(value),
        Value::Blob(value) => SqlValue::Blob(value),
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteExecutor;
    use crate::exec::Executor;
    use crate::sql::{Columns, Custom, Insert, Select};
    use crate::value::SqlValue;

    fn seeded() -> SqliteExecutor {
        let executor = SqliteExecutor::in_memory().unwrap();
        executor
            .run(
                &Custom::new("CREATE TABLE notes (id INTEGER, body TEXT);")
                    .unwrap()
                    .statement(),
            )
            .unwrap();
        executor
    }

    #[test]
    fn execute_then_query_round_trips_values() {
        let executor = seeded();
        let insert = Insert::new(
            "notes",
            &["id", "body"],
            vec![SqlValue::Integer(1), SqlValue::Text("hello".to_string())],
        )
        .unwrap();
        executor.run(&insert.statement()).unwrap();

        let rows = executor
            .run(&Select::new("notes", Columns::All).unwrap().statement())
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![SqlValue::Integer(1), SqlValue::Text("hello".to_string())]]
        );
    }

    #[test]
    fn non_query_statements_return_no_rows() {
        let executor = seeded();
        let rows = executor
            .run(
                &Custom::new("INSERT INTO notes (id, body) VALUES (2, 'x');")
                    .unwrap()
                    .statement(),
            )
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn driver_errors_surface_to_the_caller() {
        let executor = seeded();
        let result = executor.run(&Custom::new("SELECT * FROM missing;").unwrap().statement());
        assert!(result.is_err());
    }
}
