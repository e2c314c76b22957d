//! Association declarations and eager loading.
//!
//! Models declare their associations through
//! [`Model::relations`](crate::traits::Model::relations) and expose the
//! backing fields through [`Model::relation_mut`](crate::traits::Model::relation_mut).
//! On every load call the loader:
//!
//! 1. parses the optional whitelist ([`Include`]);
//! 2. resolves the selected associations of each record ([`associations_for`]);
//! 3. builds a constraint from the owning record's keys and fetches the
//!    related rows with a fresh, non-eager query;
//! 4. recurses into inner associations of the populated fields.
//!
//! ## Example
//!
//! ```rust,ignore
//! // Load every association of a car
//! conn.load(&mut car, Vec::<String>::new())?;
//!
//! // Load only the books, and each book's publisher
//! let authors: Vec<Author> = conn.eager(["books.publisher"]).all()?;
//!
//! // Pick the strategy for one query
//! let cars: Vec<Car> = conn
//!     .query()
//!     .eager(["wheels"])
//!     .set_eager_mode(EagerMode::Cache)
//!     .all()?;
//! ```

mod association;
mod include;
mod loader;
mod slot;
mod spec;

pub use association::{Association, Constraint, InnerAssociation, associations_for};
pub use include::{Include, IncludePath};
pub use loader::EagerLoader;
pub use slot::{Loadable, ModelRef, RelationSlot};
pub use spec::{AssociationKind, JoinTableSpec, RelationSpec, RelationType};
