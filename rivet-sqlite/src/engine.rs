//! SQLite query engine implementation.

use rusqlite::params_from_iter;
use tracing::{debug, instrument};

use rivet_query::connection::{Connection, ConnectionOptions};
use rivet_query::error::{QueryError, QueryResult};
use rivet_query::filter::FilterValue;
use rivet_query::row::Row;
use rivet_query::sql::DatabaseType;
use rivet_query::traits::QueryEngine;

use crate::config::SqliteConfig;
use crate::error::{SqliteError, SqliteResult};
use crate::types::{filter_value_to_sqlite, from_sqlite_value};

/// SQLite query engine over a single blocking connection.
pub struct SqliteEngine {
    conn: rusqlite::Connection,
    config: SqliteConfig,
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("path", &self.config.path.display())
            .finish_non_exhaustive()
    }
}

impl SqliteEngine {
    /// Open a database and apply the configured pragmas.
    pub fn open(config: SqliteConfig) -> SqliteResult<Self> {
        let conn = match &config.path {
            crate::config::DatabasePath::Memory => rusqlite::Connection::open_in_memory()?,
            crate::config::DatabasePath::File(path) => rusqlite::Connection::open(path)?,
        };
        conn.execute_batch(&config.init_sql())?;

        debug!(path = %config.path.display(), "Opened SQLite database");
        Ok(Self { conn, config })
    }

    /// Open a fresh in-memory database.
    pub fn memory() -> SqliteResult<Self> {
        Self::open(SqliteConfig::memory())
    }

    /// Get the configuration the engine was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Run one or more statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> SqliteResult<()> {
        debug!(sql = %sql, "Executing batch");
        self.conn.execute_batch(sql).map_err(|e| self.classify(e.into()))
    }

    /// Run a single statement and return the number of affected rows.
    pub fn execute(&self, sql: &str, params: &[FilterValue]) -> SqliteResult<usize> {
        debug!(sql = %sql, "Executing statement");
        self.conn
            .execute(sql, params_from_iter(params.iter().map(filter_value_to_sqlite)))
            .map_err(|e| self.classify(e.into()))
    }

    /// Wrap the engine in a connection using `?` placeholders.
    pub fn into_connection(self) -> Connection {
        self.into_connection_with(ConnectionOptions::new())
    }

    /// Wrap the engine in a connection; the dialect is forced to SQLite.
    pub fn into_connection_with(self, options: ConnectionOptions) -> Connection {
        Connection::with_options(self, options.database_type(DatabaseType::SQLite))
    }

    fn fetch(&self, sql: &str, params: &[FilterValue]) -> SqliteResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(filter_value_to_sqlite)))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.as_str(), from_sqlite_value(row.get_ref(idx)?));
            }
            results.push(record);
        }
        Ok(results)
    }

    // A busy database has already waited `busy_timeout` before failing.
    fn classify(&self, err: SqliteError) -> SqliteError {
        match self.config.busy_timeout_ms {
            Some(ms) if err.is_busy() => SqliteError::Timeout(u64::from(ms)),
            _ => err,
        }
    }
}

impl QueryEngine for SqliteEngine {
    #[instrument(skip(self, params), fields(params = params.len()))]
    fn query_many(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Vec<Row>> {
        debug!(sql = %sql, "Executing query_many");
        self.fetch(sql, params)
            .map_err(|e| QueryError::from(self.classify(e)).with_sql(sql))
    }
}
