//! Connections and their configuration.
//!
//! A [`Connection`] pairs a [`QueryEngine`] with [`ConnectionOptions`]. Every
//! query created from it inherits the options' dialect and eager mode.
//!
//! # Configuration sources
//!
//! ```rust
//! use rivet_query::connection::{ConnectionOptions, MapEnvSource};
//! use rivet_query::EagerMode;
//!
//! // From a URL query string
//! let opts = ConnectionOptions::from_url("sqlite://garage.db?eager_mode=cache").unwrap();
//! assert_eq!(opts.eager_mode, EagerMode::Cache);
//!
//! // From environment variables
//! let env = MapEnvSource::new().set("RIVET_EAGER_MODE", "default");
//! let opts = ConnectionOptions::from_env_source(&env).unwrap();
//! assert_eq!(opts.eager_mode, EagerMode::Default);
//! ```

mod env;
mod options;

pub use env::{EnvSource, MapEnvSource, StdEnvSource};
pub use options::{ConnectionOptions, DIALECT_ENV, EAGER_MODE_ENV};

use std::fmt;

use thiserror::Error;

use crate::eager::EagerMode;
use crate::error::{ErrorCode, QueryError, QueryResult};
use crate::query::Query;
use crate::relations::Loadable;
use crate::traits::QueryEngine;

/// Errors that can occur while reading connection configuration.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Invalid URL format.
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// Unknown database driver or dialect.
    #[error("Unknown database driver: {0}")]
    UnknownDriver(String),

    /// Invalid option value.
    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    /// Invalid environment variable value.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvValue { name: String, message: String },
}

/// Result type for connection configuration.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

impl From<ConnectionError> for QueryError {
    fn from(err: ConnectionError) -> Self {
        let code = match err {
            ConnectionError::InvalidUrl(_) | ConnectionError::UnknownDriver(_) => {
                ErrorCode::InvalidConnectionString
            }
            ConnectionError::InvalidOption { .. } | ConnectionError::InvalidEnvValue { .. } => {
                ErrorCode::InvalidConfiguration
            }
        };
        QueryError::new(code, err.to_string()).with_source(err)
    }
}

/// A handle to a backing store.
pub struct Connection {
    engine: Box<dyn QueryEngine>,
    options: ConnectionOptions,
}

impl Connection {
    /// Create a connection with default options.
    pub fn new(engine: impl QueryEngine + 'static) -> Self {
        Self::with_options(engine, ConnectionOptions::default())
    }

    /// Create a connection with the given options.
    pub fn with_options(engine: impl QueryEngine + 'static, options: ConnectionOptions) -> Self {
        Self {
            engine: Box::new(engine),
            options,
        }
    }

    /// Options of this connection.
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// The engine executing statements.
    pub fn engine(&self) -> &dyn QueryEngine {
        self.engine.as_ref()
    }

    /// Create a query on this connection.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Create a query that loads associations with the given mode.
    pub fn set_eager_mode(&self, mode: EagerMode) -> Query<'_> {
        self.query().set_eager_mode(mode)
    }

    /// Create a query that eagerly loads the named associations.
    pub fn eager(&self, fields: impl IntoIterator<Item = impl Into<String>>) -> Query<'_> {
        self.query().eager(fields)
    }

    /// Load associations into records that were already fetched.
    ///
    /// No field names means every declared association.
    pub fn load(
        &self,
        model: &mut dyn Loadable,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> QueryResult<()> {
        self.eager(fields).eager_load(model)
    }

    /// Load every declared association into already fetched records.
    pub fn load_all(&self, model: &mut dyn Loadable) -> QueryResult<()> {
        self.load(model, std::iter::empty::<String>())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
