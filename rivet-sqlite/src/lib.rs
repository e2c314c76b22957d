//! SQLite query engine for the Rivet ORM.
//!
//! This crate runs the statements produced by `rivet-query` against SQLite
//! through `rusqlite`. Execution is blocking; one engine owns one connection.
//!
//! # Features
//!
//! - In-memory and file-based databases
//! - URL configuration with pragma options
//! - Busy and syntax errors mapped onto `QueryError` codes
//!
//! # Example
//!
//! ```rust
//! use rivet_query::QueryEngine;
//! use rivet_sqlite::{SqliteConfig, SqliteEngine};
//!
//! let engine = SqliteEngine::open(SqliteConfig::from_url("sqlite::memory:").unwrap()).unwrap();
//! engine.execute_batch("CREATE TABLE cars (id INTEGER PRIMARY KEY); INSERT INTO cars VALUES (1);").unwrap();
//!
//! let rows = engine.query_many("SELECT id FROM cars", &[]).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::{DatabasePath, JournalMode, SqliteConfig, SynchronousMode};
pub use engine::SqliteEngine;
pub use error::{SqliteError, SqliteResult};
