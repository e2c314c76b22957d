//! Connection options.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::env::{EnvSource, StdEnvSource};
use super::{ConnectionError, ConnectionResult};
use crate::eager::EagerMode;
use crate::sql::DatabaseType;

/// Variable holding the connection eager mode.
pub const EAGER_MODE_ENV: &str = "RIVET_EAGER_MODE";

/// Variable holding the placeholder dialect.
pub const DIALECT_ENV: &str = "RIVET_DIALECT";

/// Options shared by every query created from a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Placeholder dialect of translated statements.
    pub database_type: DatabaseType,
    /// Eager mode copied into each new query.
    pub eager_mode: EagerMode,
}

impl ConnectionOptions {
    /// Create new connection options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder dialect.
    pub fn database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = database_type;
        self
    }

    /// Set the connection eager mode.
    pub fn eager_mode(mut self, mode: EagerMode) -> Self {
        self.eager_mode = mode;
        self
    }

    /// Parse options from key-value parameters.
    ///
    /// Recognised keys are `eager_mode` and `dialect`; other keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> ConnectionResult<Self> {
        let mut opts = Self::default();

        if let Some(mode) = params.get("eager_mode") {
            opts.eager_mode = parse_eager_mode(mode).map_err(|message| {
                ConnectionError::InvalidOption {
                    key: "eager_mode".to_string(),
                    message,
                }
            })?;
        }

        if let Some(dialect) = params.get("dialect") {
            opts.database_type = DatabaseType::from_scheme(dialect)
                .ok_or_else(|| ConnectionError::UnknownDriver(dialect.clone()))?;
        }

        Ok(opts)
    }

    /// Parse options from a connection URL.
    ///
    /// The scheme selects the dialect and the query string feeds
    /// [`from_params`](Self::from_params).
    ///
    /// ```rust
    /// use rivet_query::{ConnectionOptions, DatabaseType, EagerMode};
    ///
    /// let opts = ConnectionOptions::from_url("postgres://localhost/garage?eager_mode=cache").unwrap();
    /// assert_eq!(opts.database_type, DatabaseType::PostgreSQL);
    /// assert_eq!(opts.eager_mode, EagerMode::Cache);
    /// ```
    pub fn from_url(url: &str) -> ConnectionResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| ConnectionError::InvalidUrl(e.to_string()))?;
        let database_type = DatabaseType::from_scheme(parsed.scheme())
            .ok_or_else(|| ConnectionError::UnknownDriver(parsed.scheme().to_string()))?;

        let params: HashMap<String, String> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self::from_params(&params)?.database_type(database_type))
    }

    /// Read options from the process environment.
    pub fn from_env() -> ConnectionResult<Self> {
        Self::from_env_source(&StdEnvSource)
    }

    /// Read options from an environment source.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env_source(env: &impl EnvSource) -> ConnectionResult<Self> {
        let mut opts = Self::default();

        if let Some(mode) = env.get(EAGER_MODE_ENV) {
            opts.eager_mode =
                parse_eager_mode(&mode).map_err(|message| ConnectionError::InvalidEnvValue {
                    name: EAGER_MODE_ENV.to_string(),
                    message,
                })?;
        }

        if let Some(dialect) = env.get(DIALECT_ENV) {
            opts.database_type = DatabaseType::from_scheme(&dialect).ok_or_else(|| {
                ConnectionError::InvalidEnvValue {
                    name: DIALECT_ENV.to_string(),
                    message: format!("unknown dialect '{}'", dialect),
                }
            })?;
        }

        Ok(opts)
    }
}

fn parse_eager_mode(value: &str) -> Result<EagerMode, String> {
    value.parse::<EagerMode>().map_err(|e| e.message)
}
