//! Eager loading mode selection.
//!
//! The mode is chosen at three scopes, lowest precedence first:
//!
//! 1. process-wide, via [`set_eager_mode`];
//! 2. per connection, via `ConnectionOptions::eager_mode` or
//!    `Connection::set_eager_mode`, materialised into each new query;
//! 3. per query, via `Query::set_eager_mode`.
//!
//! A query left at [`EagerMode::Unspecified`] resolves to the process-wide
//! mode when loading actually happens, so a later [`set_eager_mode`] call is
//! observed by queries that have not executed yet.
//!
//! ```rust
//! use rivet_query::EagerMode;
//!
//! let mode: EagerMode = "cache".parse().unwrap();
//! assert_eq!(mode, EagerMode::Cache);
//! assert_eq!(EagerMode::Unspecified.resolve_with(EagerMode::Default), EagerMode::Default);
//! assert_eq!(EagerMode::Cache.resolve_with(EagerMode::Default), EagerMode::Cache);
//! assert!("batched".parse::<EagerMode>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Strategy used to populate associations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EagerMode {
    /// One query per association per record.
    Default,
    /// Batched loading with a bounded number of queries. Currently loads nothing.
    Cache,
    /// Defer to the process-wide mode at load time.
    #[default]
    Unspecified,
}

impl EagerMode {
    /// Name used in configuration values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cache => "cache",
            Self::Unspecified => "unspecified",
        }
    }

    /// Check whether this mode defers to an outer scope.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    /// Resolve against an outer scope's mode.
    pub fn resolve_with(self, outer: EagerMode) -> EagerMode {
        if self.is_unspecified() { outer } else { self }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Cache => 1,
            Self::Unspecified => 2,
        }
    }

    fn from_u8(raw: u8) -> QueryResult<Self> {
        match raw {
            0 => Ok(Self::Default),
            1 => Ok(Self::Cache),
            2 => Ok(Self::Unspecified),
            other => Err(QueryError::unsupported_eager_mode(other)),
        }
    }
}

impl fmt::Display for EagerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EagerMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "cache" => Ok(Self::Cache),
            "unspecified" | "" => Ok(Self::Unspecified),
            other => Err(QueryError::invalid_configuration(format!(
                "unknown eager mode '{}'",
                other
            ))
            .with_field("eager_mode")
            .with_suggestion("Use one of: default, cache, unspecified")),
        }
    }
}

/// Process-wide mode. Written once at startup in practice; atomic so that a
/// concurrent write is still well defined.
static GLOBAL_MODE: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide eager mode.
///
/// Affects every query that has not been given its own mode and has not
/// loaded yet.
pub fn set_eager_mode(mode: EagerMode) {
    GLOBAL_MODE.store(mode.to_u8(), Ordering::SeqCst);
}

/// Current process-wide eager mode.
pub fn global_eager_mode() -> EagerMode {
    EagerMode::from_u8(GLOBAL_MODE.load(Ordering::SeqCst)).unwrap_or(EagerMode::Default)
}

/// Resolve a query's mode to the strategy that will run.
///
/// Fails when neither the query nor the process has a concrete strategy.
pub fn resolve_eager_mode(query_mode: EagerMode) -> QueryResult<EagerMode> {
    let mode = if query_mode.is_unspecified() {
        EagerMode::from_u8(GLOBAL_MODE.load(Ordering::SeqCst))?
    } else {
        query_mode
    };
    match mode {
        EagerMode::Unspecified => Err(QueryError::unsupported_eager_mode(EagerMode::Unspecified)
            .with_help("The process-wide eager mode must be default or cache")),
        mode => Ok(mode),
    }
}
