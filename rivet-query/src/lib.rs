//! # rivet-query
//!
//! Eager association loading for the Rivet ORM.
//!
//! This crate provides:
//! - Association declarations on models (`has one`, `has many`, `belongs to`, `many to many`)
//! - Eager loading of associations, nested associations and association whitelists
//! - Process-wide, per-connection and per-query eager mode selection
//! - A small synchronous query surface (`Connection`, `Query`, `QueryEngine`)
//!
//! ## Eager Modes
//!
//! ```rust
//! use rivet_query::EagerMode;
//!
//! // Queries start unspecified and follow the process-wide mode
//! assert_eq!(EagerMode::default(), EagerMode::Unspecified);
//! assert_eq!("cache".parse::<EagerMode>().unwrap(), EagerMode::Cache);
//! ```
//!
//! ## Association Whitelists
//!
//! ```rust
//! use rivet_query::Include;
//!
//! let include = Include::parse(["books.publisher", "agent"]).unwrap();
//! assert!(include.contains("books"));
//! assert!(Include::parse(["books.", "agent"]).is_err());
//! ```
//!
//! ## Filter Values
//!
//! ```rust
//! use rivet_query::FilterValue;
//!
//! let val: FilterValue = 42.into();
//! assert!(matches!(val, FilterValue::Int(42)));
//!
//! let val: FilterValue = Option::<i64>::None.into();
//! assert!(val.is_null());
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use rivet_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::unknown_association("Car", "tyres");
//! assert_eq!(err.code, ErrorCode::InvalidAssociation);
//! ```

pub mod connection;
pub mod eager;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query;
pub mod relations;
pub mod row;
pub mod sql;
pub mod traits;
pub mod types;

pub use connection::{Connection, ConnectionError, ConnectionOptions, ConnectionResult};
pub use eager::{EagerMode, global_eager_mode, set_eager_mode};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use filter::FilterValue;
pub use query::Query;
pub use relations::{
    AssociationKind, EagerLoader, Include, JoinTableSpec, Loadable, RelationSlot, RelationSpec,
    RelationType,
};
pub use row::{FromRow, Row, RowError, RowRef};
pub use sql::DatabaseType;
pub use traits::{Model, ModelShape, QueryEngine, Record};
pub use types::{NullsOrder, OrderBy, OrderByField, SortOrder};

// Re-export logging utilities
pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_with_level,
    is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::connection::{Connection, ConnectionOptions};
    pub use crate::eager::{EagerMode, set_eager_mode};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::FilterValue;
    pub use crate::query::Query;
    pub use crate::relations::{JoinTableSpec, Loadable, RelationSlot, RelationSpec};
    pub use crate::row::{FromRow, RowError, RowRef};
    pub use crate::sql::DatabaseType;
    pub use crate::traits::{Model, QueryEngine};
    pub use crate::types::{OrderBy, OrderByField, SortOrder};
}
