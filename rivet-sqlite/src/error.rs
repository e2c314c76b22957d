//! Error types for SQLite operations.

use rusqlite::ErrorCode as SqliteCode;
use thiserror::Error;

use rivet_query::error::QueryError;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Error type for SQLite operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite driver error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The database stayed locked past the busy timeout.
    #[error("Database busy for more than {0}ms")]
    Timeout(u64),
}

impl SqliteError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is a busy or locked database.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                matches!(e.code, SqliteCode::DatabaseBusy | SqliteCode::DatabaseLocked)
            }
            _ => false,
        }
    }
}

impl From<SqliteError> for QueryError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Sqlite(rusqlite::Error::QueryReturnedNoRows) => QueryError::not_found("row"),
            SqliteError::Sqlite(rusqlite::Error::SqlInputError { ref msg, ref sql, .. })
                if is_syntax_error(msg) =>
            {
                let (msg, sql) = (msg.clone(), sql.clone());
                QueryError::sql_syntax(msg, sql).with_source(err)
            }
            SqliteError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                if is_syntax_error(msg) =>
            {
                let msg = msg.clone();
                QueryError::sql_syntax(msg, String::new()).with_source(err)
            }
            SqliteError::Sqlite(rusqlite::Error::SqliteFailure(ref e, _))
                if e.code == SqliteCode::CannotOpen =>
            {
                QueryError::connection(err.to_string()).with_source(err)
            }
            SqliteError::Sqlite(rusqlite::Error::InvalidParameterCount(given, expected)) => {
                QueryError::invalid_input(
                    "params",
                    format!("statement expects {} parameters, got {}", expected, given),
                )
            }
            SqliteError::Timeout(ms) => QueryError::timeout(ms),
            SqliteError::Config(msg) => QueryError::invalid_configuration(msg),
            SqliteError::Sqlite(e) => QueryError::database(e.to_string()).with_source(e),
        }
    }
}

fn is_syntax_error(msg: &str) -> bool {
    msg.contains("syntax error") || msg.contains("incomplete input")
}
