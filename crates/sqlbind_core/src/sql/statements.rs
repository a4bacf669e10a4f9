//! INSERT/SELECT/UPDATE/DELETE builders plus raw and script statements.
//!
//! # Responsibility
//! - Compile validated arguments into parameterized SQL text.
//!
//! # Invariants
//! - Every builder validates fully at construction; `statement()` cannot fail.
//! - Data values are always bound, never interpolated into text.

use super::{
    validate_columns, validate_order_by, validate_table, Columns, Limit, Statement, StatementError,
    StatementKind, Where,
};
use crate::value::SqlValue;
use std::path::Path;

/// `INSERT INTO` / `REPLACE INTO` builder.
#[derive(Debug, Clone)]
pub struct Insert {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    replace: bool,
}

impl Insert {
    pub fn new(table: &str, columns: &[&str], values: Vec<SqlValue>) -> Result<Self, StatementError> {
        let table = validate_table(table)?;
        let columns = validate_columns(columns)?;
        if values.is_empty() {
            return Err(StatementError::EmptyValues);
        }
        if values.len() != columns.len() {
            return Err(StatementError::ColumnValueArity {
                columns: columns.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            table,
            columns,
            values,
            replace: false,
        })
    }

    /// Switches to `REPLACE INTO`, the backend's upsert-by-key form.
    pub fn or_replace(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Builds an `INSERT INTO t DEFAULT VALUES;` statement.
    pub fn default_values(table: &str) -> Result<Statement, StatementError> {
        let table = validate_table(table)?;
        Ok(Statement::new(
            format!("INSERT INTO {table} DEFAULT VALUES;"),
            Vec::new(),
            StatementKind::Execute,
        ))
    }

    pub fn statement(&self) -> Statement {
        let command = if self.replace { "REPLACE" } else { "INSERT" };
        let placeholders = vec!["?"; self.values.len()].join(", ");
        Statement::new(
            format!(
                "{command} INTO {} ({}) VALUES ({placeholders});",
                self.table,
                self.columns.join(", ")
            ),
            self.values.clone(),
            StatementKind::Execute,
        )
    }
}

/// `SELECT` builder.
#[derive(Debug, Clone)]
pub struct Select {
    table: String,
    columns: Columns,
    distinct: bool,
    filter: Option<Where>,
    order_by: Option<String>,
    limit: Option<Limit>,
}

impl Select {
    pub fn new(table: &str, columns: Columns) -> Result<Self, StatementError> {
        Ok(Self {
            table: validate_table(table)?,
            columns,
            distinct: false,
            filter: None,
            order_by: None,
            limit: None,
        })
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Raw order-by fragment, e.g. `created_at DESC`.
    pub fn order_by(mut self, expr: &str) -> Result<Self, StatementError> {
        self.order_by = Some(validate_order_by(expr)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn statement(&self) -> Statement {
        let mut text = String::from("SELECT");
        if self.distinct {
            text.push_str(" DISTINCT");
        }
        text.push(' ');
        text.push_str(&self.columns.render());
        text.push_str(" FROM ");
        text.push_str(&self.table);

        let mut values = Vec::new();
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            text.push_str(filter.expr());
            values.extend_from_slice(filter.values());
        }
        if let Some(order_by) = &self.order_by {
            text.push_str(" ORDER BY ");
            text.push_str(order_by);
        }
        if let Some(limit) = &self.limit {
            text.push_str(" LIMIT ");
            text.push_str(&limit.render());
        }
        text.push(';');

        Statement::new(text, values, StatementKind::Query)
    }
}

/// `UPDATE` builder; SET values bind first, then where values.
#[derive(Debug, Clone)]
pub struct Update {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    filter: Option<Where>,
}

impl Update {
    pub fn new(table: &str, columns: &[&str], values: Vec<SqlValue>) -> Result<Self, StatementError> {
        let table = validate_table(table)?;
        let columns = validate_columns(columns)?;
        if values.is_empty() {
            return Err(StatementError::EmptyValues);
        }
        if values.len() != columns.len() {
            return Err(StatementError::ColumnValueArity {
                columns: columns.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            table,
            columns,
            values,
            filter: None,
        })
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn statement(&self) -> Statement {
        let assignments = self
            .columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut text = format!("UPDATE {} SET {assignments}", self.table);
        let mut values = self.values.clone();
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            text.push_str(filter.expr());
            values.extend_from_slice(filter.values());
        }
        text.push(';');

        Statement::new(text, values, StatementKind::Execute)
    }
}

/// `DELETE` builder.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    filter: Option<Where>,
}

impl Delete {
    pub fn new(table: &str) -> Result<Self, StatementError> {
        Ok(Self {
            table: validate_table(table)?,
            filter: None,
        })
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn statement(&self) -> Statement {
        let mut text = format!("DELETE FROM {}", self.table);
        let mut values = Vec::new();
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            text.push_str(filter.expr());
            values.extend_from_slice(filter.values());
        }
        text.push(';');

        Statement::new(text, values, StatementKind::Execute)
    }
}

/// Pass-through raw statement text.
#[derive(Debug, Clone)]
pub struct Custom {
    text: String,
}

impl Custom {
    pub fn new(text: &str) -> Result<Self, StatementError> {
        if text.trim().is_empty() {
            return Err(StatementError::EmptyStatement);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn statement(&self) -> Statement {
        // Raw text carries no structural kind; row-producing statements are
        // recognized by their leading keyword.
        let kind = if self
            .text
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("SELECT"))
        {
            StatementKind::Query
        } else {
            StatementKind::Execute
        };
        Statement::new(self.text.clone(), Vec::new(), kind)
    }
}

/// File-sourced multi-statement script, e.g. externally supplied DDL.
#[derive(Debug, Clone)]
pub struct Script {
    text: String,
}

impl Script {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StatementError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StatementError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;
        if !text.contains(';') {
            return Err(StatementError::UnterminatedScript {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { text })
    }

    pub fn statement(&self) -> Statement {
        Statement::new(self.text.clone(), Vec::new(), StatementKind::Batch)
    }
}
