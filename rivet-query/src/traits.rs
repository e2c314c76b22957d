//! Core traits implemented by models and backing stores.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::filter::FilterValue;
use crate::relations::{RelationSlot, RelationSpec};
use crate::row::Row;

/// A persisted record type.
///
/// Besides the table metadata, a model exposes its declared associations
/// explicitly instead of having them discovered by inspection:
///
/// ```rust
/// use rivet_query::{FilterValue, Model, RelationSlot, RelationSpec};
/// use rivet_query::row::{FromRow, RowError, RowRef};
///
/// #[derive(Debug, Default)]
/// struct Wheel {
///     id: i64,
///     car_id: i64,
/// }
///
/// impl Model for Wheel {
///     const MODEL_NAME: &'static str = "Wheel";
///     const TABLE_NAME: &'static str = "wheels";
///     const PRIMARY_KEY: &'static [&'static str] = &["id"];
///     const COLUMNS: &'static [&'static str] = &["id", "car_id"];
/// }
///
/// impl FromRow for Wheel {
///     fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
///         Ok(Self { id: row.get_i64("id")?, car_id: row.get_i64("car_id")? })
///     }
/// }
///
/// #[derive(Debug, Default)]
/// struct Car {
///     id: i64,
///     wheels: Vec<Wheel>,
/// }
///
/// impl Model for Car {
///     const MODEL_NAME: &'static str = "Car";
///     const TABLE_NAME: &'static str = "cars";
///     const PRIMARY_KEY: &'static [&'static str] = &["id"];
///     const COLUMNS: &'static [&'static str] = &["id"];
///
///     fn relations() -> Vec<RelationSpec> {
///         vec![RelationSpec::one_to_many::<Wheel>("wheels")]
///     }
///
///     fn value(&self, column: &str) -> Option<FilterValue> {
///         match column {
///             "id" => Some(self.id.into()),
///             _ => None,
///         }
///     }
///
///     fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
///         match name {
///             "wheels" => Some(&mut self.wheels),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Model: 'static {
    /// The name of the model.
    const MODEL_NAME: &'static str;

    /// The name of the database table.
    const TABLE_NAME: &'static str;

    /// The primary key column name(s).
    const PRIMARY_KEY: &'static [&'static str];

    /// All column names for this model.
    const COLUMNS: &'static [&'static str];

    /// Declared associations, in the order they are loaded.
    fn relations() -> Vec<RelationSpec> {
        Vec::new()
    }

    /// Current value of a column, `None` if the model does not expose it.
    fn value(&self, _column: &str) -> Option<FilterValue> {
        None
    }

    /// The field backing the named association.
    fn relation_mut(&mut self, _name: &str) -> Option<&mut dyn RelationSlot> {
        None
    }
}

/// Static description of a model used when translating queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelShape {
    /// The name of the model.
    pub model_name: &'static str,
    /// The name of the database table.
    pub table_name: &'static str,
    /// The primary key column name(s).
    pub primary_key: &'static [&'static str],
    /// All column names.
    pub columns: &'static [&'static str],
}

impl ModelShape {
    /// Shape of a model type.
    pub fn of<M: Model>() -> Self {
        Self {
            model_name: M::MODEL_NAME,
            table_name: M::TABLE_NAME,
            primary_key: M::PRIMARY_KEY,
            columns: M::COLUMNS,
        }
    }
}

/// Object-safe view of a single model instance.
///
/// Implemented for every [`Model`]; the loader walks records through this
/// trait so that associations of different model types can be mixed.
pub trait Record {
    /// Shape of the record's model.
    fn shape(&self) -> ModelShape;

    /// Declared associations of the record's model.
    fn relation_specs(&self) -> Vec<RelationSpec>;

    /// Current value of a column.
    fn column_value(&self, column: &str) -> Option<FilterValue>;

    /// The field backing the named association.
    fn relation_slot(&mut self, name: &str) -> Option<&mut dyn RelationSlot>;
}

impl<M: Model> Record for M {
    fn shape(&self) -> ModelShape {
        ModelShape::of::<M>()
    }

    fn relation_specs(&self) -> Vec<RelationSpec> {
        M::relations()
    }

    fn column_value(&self, column: &str) -> Option<FilterValue> {
        self.value(column)
    }

    fn relation_slot(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
        self.relation_mut(name)
    }
}

/// The backing store that executes final statements.
///
/// Execution is synchronous: each call blocks until the store answers.
/// Timeouts, retries and pooling belong to the implementation.
pub trait QueryEngine {
    /// Execute a statement and return every row.
    fn query_many(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Vec<Row>>;

    /// Execute a statement and return its first row.
    ///
    /// Fails with [`QueryError::not_found`] when nothing matched.
    fn query_one(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Row> {
        self.query_many(sql, params)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::not_found("row").with_sql(sql))
    }
}

impl<E: QueryEngine + ?Sized> QueryEngine for Rc<E> {
    fn query_many(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Vec<Row>> {
        (**self).query_many(sql, params)
    }

    fn query_one(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Row> {
        (**self).query_one(sql, params)
    }
}

impl<E: QueryEngine + ?Sized> QueryEngine for Arc<E> {
    fn query_many(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Vec<Row>> {
        (**self).query_many(sql, params)
    }

    fn query_one(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Row> {
        (**self).query_one(sql, params)
    }
}
