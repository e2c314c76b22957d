//! # Rivet
//!
//! An ORM whose models declare their associations once and load them eagerly.
//!
//! Rivet provides:
//! - Association declarations (`has one`, `has many`, `belongs to`, `many to many`)
//! - Eager loading of every association, a whitelist, or nested paths
//! - A process-wide eager mode with per-connection and per-query overrides
//! - A blocking SQLite engine (feature `sqlite`, on by default)
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "sqlite")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rivet_orm::prelude::*;
//!
//! struct Wheel {
//!     position: String,
//! }
//!
//! impl Model for Wheel {
//!     const MODEL_NAME: &'static str = "Wheel";
//!     const TABLE_NAME: &'static str = "wheels";
//!     const PRIMARY_KEY: &'static [&'static str] = &["id"];
//!     const COLUMNS: &'static [&'static str] = &["id", "car_id", "position"];
//! }
//!
//! impl FromRow for Wheel {
//!     fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
//!         Ok(Self { position: row.get_string("position")? })
//!     }
//! }
//!
//! struct Car {
//!     id: i64,
//!     wheels: Vec<Wheel>,
//! }
//!
//! impl Model for Car {
//!     const MODEL_NAME: &'static str = "Car";
//!     const TABLE_NAME: &'static str = "cars";
//!     const PRIMARY_KEY: &'static [&'static str] = &["id"];
//!     const COLUMNS: &'static [&'static str] = &["id"];
//!
//!     fn relations() -> Vec<RelationSpec> {
//!         vec![RelationSpec::one_to_many::<Wheel>("wheels").order_by("id ASC")]
//!     }
//!
//!     fn value(&self, column: &str) -> Option<FilterValue> {
//!         (column == "id").then(|| self.id.into())
//!     }
//!
//!     fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
//!         match name {
//!             "wheels" => Some(&mut self.wheels),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let engine = SqliteEngine::memory()?;
//! engine.execute_batch(
//!     "CREATE TABLE wheels (id INTEGER PRIMARY KEY, car_id INTEGER, position TEXT);
//!      INSERT INTO wheels VALUES (1, 1, 'front-left'), (2, 1, 'front-right');",
//! )?;
//! let conn = engine.into_connection_with(ConnectionOptions::new().eager_mode(EagerMode::Default));
//!
//! let mut car = Car { id: 1, wheels: Vec::new() };
//! conn.load_all(&mut car)?;
//! assert_eq!(car.wheels[1].position, "front-right");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sqlite"))]
//! # fn main() {}
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use rivet_query as query;

/// SQLite engine.
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite {
    pub use rivet_sqlite::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rivet_query::prelude::*;

    #[cfg(feature = "sqlite")]
    pub use rivet_sqlite::{SqliteConfig, SqliteEngine};
}

// Re-export key types at the crate root
pub use rivet_query::{
    Connection, ConnectionOptions, EagerMode, ErrorCode, Include, QueryError, QueryResult,
    global_eager_mode, set_eager_mode,
};
