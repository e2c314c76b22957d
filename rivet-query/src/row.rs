//! Rows returned by a [`QueryEngine`](crate::traits::QueryEngine) and their
//! decoding into models.
//!
//! ```rust
//! use rivet_query::row::{FromRow, Row, RowError, RowRef};
//!
//! struct Wheel {
//!     id: i64,
//!     position: String,
//! }
//!
//! impl FromRow for Wheel {
//!     fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
//!         Ok(Self {
//!             id: row.get_i64("id")?,
//!             position: row.get_string("position")?,
//!         })
//!     }
//! }
//!
//! let row = Row::new().with("id", 1i64).with("position", "front-left");
//! let wheel = Wheel::from_row(&row).unwrap();
//! assert_eq!(wheel.position, "front-left");
//! ```

use indexmap::IndexMap;
use thiserror::Error;

use crate::error::QueryError;
use crate::filter::FilterValue;

/// Error type for row decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    /// Column not found.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    /// Type conversion error.
    #[error("type conversion error for '{column}': {message}")]
    TypeConversion {
        /// Column being read.
        column: String,
        /// What went wrong.
        message: String,
    },
    /// Null value in non-nullable column.
    #[error("unexpected null in column '{0}'")]
    UnexpectedNull(String),
}

impl From<RowError> for QueryError {
    fn from(err: RowError) -> Self {
        QueryError::deserialization(err.to_string()).with_source(err)
    }
}

/// Typed read access to a row.
pub trait RowRef {
    /// Raw value of a column.
    fn value(&self, column: &str) -> Result<&FilterValue, RowError>;

    /// Get a 64-bit integer column value.
    fn get_i64(&self, column: &str) -> Result<i64, RowError> {
        self.get_i64_opt(column)?
            .ok_or_else(|| RowError::UnexpectedNull(column.to_string()))
    }

    /// Get an optional 64-bit integer column value.
    fn get_i64_opt(&self, column: &str) -> Result<Option<i64>, RowError> {
        match self.value(column)? {
            FilterValue::Null => Ok(None),
            FilterValue::Int(v) => Ok(Some(*v)),
            FilterValue::Bool(b) => Ok(Some(i64::from(*b))),
            other => Err(mismatch(column, "int", other)),
        }
    }

    /// Get a float column value.
    fn get_f64(&self, column: &str) -> Result<f64, RowError> {
        match self.value(column)? {
            FilterValue::Null => Err(RowError::UnexpectedNull(column.to_string())),
            FilterValue::Float(v) => Ok(*v),
            FilterValue::Int(v) => Ok(*v as f64),
            other => Err(mismatch(column, "float", other)),
        }
    }

    /// Get a boolean column value.
    ///
    /// Integer columns are accepted since SQLite stores booleans as 0/1.
    fn get_bool(&self, column: &str) -> Result<bool, RowError> {
        match self.value(column)? {
            FilterValue::Null => Err(RowError::UnexpectedNull(column.to_string())),
            FilterValue::Bool(b) => Ok(*b),
            FilterValue::Int(v) => Ok(*v != 0),
            other => Err(mismatch(column, "bool", other)),
        }
    }

    /// Get a string column value as a borrowed reference.
    fn get_str(&self, column: &str) -> Result<&str, RowError> {
        self.get_str_opt(column)?
            .ok_or_else(|| RowError::UnexpectedNull(column.to_string()))
    }

    /// Get an optional string column value as a borrowed reference.
    fn get_str_opt(&self, column: &str) -> Result<Option<&str>, RowError> {
        match self.value(column)? {
            FilterValue::Null => Ok(None),
            FilterValue::String(s) => Ok(Some(s.as_str())),
            other => Err(mismatch(column, "string", other)),
        }
    }

    /// Get a string column value as owned.
    fn get_string(&self, column: &str) -> Result<String, RowError> {
        self.get_str(column).map(str::to_string)
    }

    /// Get an optional string as owned.
    fn get_string_opt(&self, column: &str) -> Result<Option<String>, RowError> {
        self.get_str_opt(column)
            .map(|opt| opt.map(str::to_string))
    }
}

fn mismatch(column: &str, expected: &str, found: &FilterValue) -> RowError {
    RowError::TypeConversion {
        column: column.to_string(),
        message: format!("expected {}, found {}", expected, found.type_name()),
    }
}

/// Trait for types that can be decoded from a row.
pub trait FromRow: Sized {
    /// Decode from a row.
    fn from_row(row: &impl RowRef) -> Result<Self, RowError>;
}

/// A single result row, columns kept in statement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: IndexMap<String, FilterValue>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column (builder style).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Add or replace a column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FilterValue>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in statement order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl RowRef for Row {
    fn value(&self, column: &str) -> Result<&FilterValue, RowError> {
        self.columns
            .get(column)
            .ok_or_else(|| RowError::ColumnNotFound(column.to_string()))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
