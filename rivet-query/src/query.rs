//! Queries bound to a [`Connection`].
//!
//! A query collects predicates, ordering and a limit, translates them into a
//! statement for a [`ModelShape`], and fetches rows into models or
//! association fields. When eager loading is requested the fetched records
//! have their associations populated before they are returned.
//!
//! ```rust
//! use rivet_query::prelude::*;
//! use rivet_query::{ModelShape, QueryEngine, QueryResult, Row};
//!
//! struct NoRows;
//!
//! impl QueryEngine for NoRows {
//!     fn query_many(&self, _sql: &str, _params: &[FilterValue]) -> QueryResult<Vec<Row>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! struct Wheel;
//!
//! impl Model for Wheel {
//!     const MODEL_NAME: &'static str = "Wheel";
//!     const TABLE_NAME: &'static str = "wheels";
//!     const PRIMARY_KEY: &'static [&'static str] = &["id"];
//!     const COLUMNS: &'static [&'static str] = &["id", "car_id", "position"];
//! }
//!
//! let conn = Connection::with_options(
//!     NoRows,
//!     ConnectionOptions::new().database_type(DatabaseType::PostgreSQL),
//! );
//! let (sql, args) = conn
//!     .query()
//!     .r#where("car_id = ?", [7i64])
//!     .order("position ASC")
//!     .to_sql(&ModelShape::of::<Wheel>());
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, car_id, position FROM wheels WHERE (car_id = $1) ORDER BY position ASC"
//! );
//! assert_eq!(args, vec![FilterValue::Int(7)]);
//! ```

use tracing::debug;

use crate::connection::Connection;
use crate::eager::{EagerMode, resolve_eager_mode};
use crate::error::{QueryError, QueryResult};
use crate::filter::FilterValue;
use crate::relations::{EagerLoader, Loadable, RelationSlot};
use crate::row::FromRow;
use crate::sql::quote_identifier;
use crate::traits::{Model, ModelShape};

/// A query under construction.
#[derive(Clone)]
pub struct Query<'c> {
    connection: &'c Connection,
    where_clauses: Vec<(String, Vec<FilterValue>)>,
    order_clauses: Vec<String>,
    limit: Option<u64>,
    raw: Option<(String, Vec<FilterValue>)>,
    eager: bool,
    eager_fields: Vec<String>,
    eager_mode: EagerMode,
}

impl<'c> Query<'c> {
    /// Create a query with the connection's configured eager mode.
    pub fn new(connection: &'c Connection) -> Self {
        Self {
            connection,
            where_clauses: Vec::new(),
            order_clauses: Vec::new(),
            limit: None,
            raw: None,
            eager: false,
            eager_fields: Vec::new(),
            eager_mode: connection.options().eager_mode,
        }
    }

    /// The connection this query runs on.
    pub fn connection(&self) -> &'c Connection {
        self.connection
    }

    /// Add a predicate with `?` placeholders. Predicates are AND-ed together.
    pub fn r#where(
        mut self,
        predicate: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<FilterValue>>,
    ) -> Self {
        self.where_clauses
            .push((predicate.into(), args.into_iter().map(Into::into).collect()));
        self
    }

    /// Add an order clause such as `"position ASC"`.
    pub fn order(mut self, clause: impl Into<String>) -> Self {
        self.order_clauses.push(clause.into());
        self
    }

    /// Limit the number of rows.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Request eager loading of the named associations.
    ///
    /// No names means every declared association.
    pub fn eager(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.eager = true;
        self.eager_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Turn eager loading off for this query.
    pub fn disable_eager(mut self) -> Self {
        self.eager = false;
        self
    }

    /// Check if eager loading was requested.
    pub fn is_eager(&self) -> bool {
        self.eager
    }

    /// Associations requested for eager loading.
    pub fn eager_fields(&self) -> &[String] {
        &self.eager_fields
    }

    /// Set the eager mode for this query only.
    pub fn set_eager_mode(mut self, mode: EagerMode) -> Self {
        self.eager_mode = mode;
        self
    }

    /// Eager mode as configured on this query, possibly unspecified.
    pub fn eager_mode(&self) -> EagerMode {
        self.eager_mode
    }

    /// Eager mode this query would load with right now.
    pub fn effective_eager_mode(&self) -> QueryResult<EagerMode> {
        resolve_eager_mode(self.eager_mode)
    }

    /// Replace the query with an already translated statement.
    ///
    /// The statement is executed exactly as given.
    pub fn raw_query(
        mut self,
        sql: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<FilterValue>>,
    ) -> Self {
        self.raw = Some((sql.into(), args.into_iter().map(Into::into).collect()));
        self
    }

    /// Translate into a statement and its arguments for the given model.
    pub fn to_sql(&self, shape: &ModelShape) -> (String, Vec<FilterValue>) {
        self.build_sql(shape, self.limit)
    }

    fn build_sql(&self, shape: &ModelShape, limit: Option<u64>) -> (String, Vec<FilterValue>) {
        if let Some((sql, args)) = &self.raw {
            return (sql.clone(), args.clone());
        }

        let columns = if shape.columns.is_empty() {
            "*".to_string()
        } else {
            shape
                .columns
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, quote_identifier(shape.table_name));
        let mut args = Vec::new();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            for (i, (predicate, predicate_args)) in self.where_clauses.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push('(');
                sql.push_str(predicate);
                sql.push(')');
                args.extend(predicate_args.iter().cloned());
            }
        }

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        }

        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        (self.connection.options().database_type.rebind(&sql), args)
    }

    /// Fetch every row into a collection field.
    pub fn all_into(&self, slot: &mut dyn RelationSlot) -> QueryResult<()> {
        let (sql, args) = self.to_sql(&slot.shape());
        debug!(model = slot.shape().model_name, sql = %sql, "Fetching all rows");
        crate::rivet_debug!(params = ?args, "Query parameters");

        let rows = self
            .connection
            .engine()
            .query_many(&sql, &args)
            .map_err(|e| attach_sql(e, &sql))?;
        slot.fill_all(rows)
    }

    /// Fetch the first row into a single-record field.
    ///
    /// Fails with [`QueryError::not_found`] when nothing matched.
    pub fn first_into(&self, slot: &mut dyn RelationSlot) -> QueryResult<()> {
        let shape = slot.shape();
        let (sql, args) = self.build_sql(&shape, Some(1));
        debug!(model = shape.model_name, sql = %sql, "Fetching first row");
        crate::rivet_debug!(params = ?args, "Query parameters");

        let row = self
            .connection
            .engine()
            .query_one(&sql, &args)
            .map_err(|e| {
                if e.is_not_found() {
                    QueryError::not_found(shape.model_name).with_sql(&sql)
                } else {
                    attach_sql(e, &sql)
                }
            })?;
        slot.fill_first(row)
    }

    /// Fetch every matching record, loading associations if requested.
    pub fn all<M: Model + FromRow>(&self) -> QueryResult<Vec<M>> {
        let mut records: Vec<M> = Vec::new();
        self.all_into(&mut records)?;
        if self.eager {
            self.eager_load(&mut records)?;
        }
        Ok(records)
    }

    /// Fetch the first matching record, loading associations if requested.
    pub fn first<M: Model + FromRow>(&self) -> QueryResult<M> {
        let mut record: Option<M> = None;
        self.first_into(&mut record)?;
        let mut record = record.ok_or_else(|| QueryError::not_found(M::MODEL_NAME))?;
        if self.eager {
            self.eager_load(&mut record)?;
        }
        Ok(record)
    }

    /// Load the requested associations into already fetched records.
    ///
    /// Uses this query's eager fields and resolves its eager mode now.
    pub fn eager_load(&self, model: &mut dyn Loadable) -> QueryResult<()> {
        EagerLoader::new(self.connection).load(self.eager_mode, model, &self.eager_fields)
    }
}

impl std::fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("where_clauses", &self.where_clauses)
            .field("order_clauses", &self.order_clauses)
            .field("limit", &self.limit)
            .field("raw", &self.raw)
            .field("eager", &self.eager)
            .field("eager_fields", &self.eager_fields)
            .field("eager_mode", &self.eager_mode)
            .finish()
    }
}

fn attach_sql(err: QueryError, sql: &str) -> QueryError {
    if err.context.sql.is_some() {
        err
    } else {
        err.with_sql(sql)
    }
}
