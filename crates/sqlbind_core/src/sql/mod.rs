//! Parameterized SQL statement model and builder inputs.
//!
//! # Responsibility
//! - Define the compiled [`Statement`] handed to executors.
//! - Validate builder arguments eagerly, before any SQL text exists.
//!
//! # Invariants
//! - Identifiers (table and column names) match `[A-Za-z_][A-Za-z0-9_]*`.
//! - Absence of an optional clause is an `Option`, never an empty string.
//! - Bound values are storage-native by construction.

mod statements;

pub use statements::{Custom, Delete, Insert, Script, Select, Update};

use crate::value::SqlValue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles")
});

/// Malformed statement-builder arguments, rejected at construction.
#[derive(Debug)]
pub enum StatementError {
    EmptyTable,
    InvalidIdentifier { name: String },
    EmptyColumns,
    EmptyValues,
    ColumnValueArity { columns: usize, values: usize },
    EmptyWhere,
    EmptyOrderBy,
    ZeroLimit,
    EmptyLimitExpr,
    EmptyStatement,
    UnterminatedScript { path: PathBuf },
    ScriptRead { path: PathBuf, source: std::io::Error },
}

impl Display for StatementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "table name cannot be empty"),
            Self::InvalidIdentifier { name } => {
                write!(f, "`{name}` is not a valid SQL identifier")
            }
            Self::EmptyColumns => write!(f, "column list cannot be empty"),
            Self::EmptyValues => write!(f, "value list cannot be empty"),
            Self::ColumnValueArity { columns, values } => write!(
                f,
                "value count ({values}) does not match column count ({columns})"
            ),
            Self::EmptyWhere => write!(f, "where clause cannot be an empty string"),
            Self::EmptyOrderBy => write!(f, "order-by clause cannot be an empty string"),
            Self::ZeroLimit => write!(f, "row limit must be positive"),
            Self::EmptyLimitExpr => write!(f, "raw limit expression cannot be empty"),
            Self::EmptyStatement => write!(f, "statement text cannot be empty"),
            Self::UnterminatedScript { path } => write!(
                f,
                "script `{}` contains no `;`-terminated statement",
                path.display()
            ),
            Self::ScriptRead { path, source } => {
                write!(f, "cannot read script `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StatementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ScriptRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// How an executor should run a statement and what it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Single statement producing rows.
    Query,
    /// Single statement producing no rows.
    Execute,
    /// Multi-statement script, no parameters, no rows.
    Batch,
}

/// Compiled SQL text plus positionally bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    values: Vec<SqlValue>,
    kind: StatementKind,
}

impl Statement {
    pub(crate) fn new(text: String, values: Vec<SqlValue>, kind: StatementKind) -> Self {
        Self { text, values, kind }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }
}

/// Column selection for SELECT-class statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// The `*` sentinel.
    All,
    Named(Vec<String>),
}

impl Columns {
    /// Validates a named column list: non-empty, all valid identifiers.
    pub fn named(names: &[&str]) -> Result<Self, StatementError> {
        Ok(Self::Named(validate_columns(names)?))
    }

    fn render(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::Named(names) => names.join(", "),
        }
    }
}

/// Raw predicate fragment with optional bound values.
///
/// Values referenced by `?` placeholders in the fragment are carried here so
/// callers never interpolate data into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    expr: String,
    values: Vec<SqlValue>,
}

impl Where {
    pub fn new(expr: &str) -> Result<Self, StatementError> {
        Self::with_values(expr, Vec::new())
    }

    pub fn with_values(expr: &str, values: Vec<SqlValue>) -> Result<Self, StatementError> {
        if expr.trim().is_empty() {
            return Err(StatementError::EmptyWhere);
        }
        Ok(Self {
            expr: expr.to_string(),
            values,
        })
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Row limit: a positive count or a raw SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    Rows(u32),
    Raw(String),
}

impl Limit {
    pub fn rows(count: u32) -> Result<Self, StatementError> {
        if count == 0 {
            return Err(StatementError::ZeroLimit);
        }
        Ok(Self::Rows(count))
    }

    pub fn raw(expr: &str) -> Result<Self, StatementError> {
        if expr.trim().is_empty() {
            return Err(StatementError::EmptyLimitExpr);
        }
        Ok(Self::Raw(expr.to_string()))
    }

    fn render(&self) -> String {
        match self {
            Self::Rows(count) => count.to_string(),
            Self::Raw(expr) => expr.clone(),
        }
    }
}

pub(crate) fn validate_table(name: &str) -> Result<String, StatementError> {
    if name.is_empty() {
        return Err(StatementError::EmptyTable);
    }
    validate_identifier(name)?;
    Ok(name.to_string())
}

pub(crate) fn validate_columns(names: &[&str]) -> Result<Vec<String>, StatementError> {
    if names.is_empty() {
        return Err(StatementError::EmptyColumns);
    }
    names
        .iter()
        .map(|name| {
            validate_identifier(name)?;
            Ok(name.to_string())
        })
        .collect()
}

fn validate_identifier(name: &str) -> Result<(), StatementError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(StatementError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

pub(crate) fn validate_order_by(expr: &str) -> Result<String, StatementError> {
    if expr.trim().is_empty() {
        return Err(StatementError::EmptyOrderBy);
    }
    Ok(expr.to_string())
}
