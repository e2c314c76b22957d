//! Eager loading strategies.

use tracing::{debug, trace};

use crate::connection::Connection;
use crate::eager::{EagerMode, resolve_eager_mode};
use crate::error::{QueryError, QueryResult};
use crate::traits::Record;

use super::association::{Association, associations_for};
use super::include::Include;
use super::slot::{Loadable, ModelRef};
use super::spec::AssociationKind;

/// Populates associations of records fetched through a connection.
///
/// Every association query is a fresh query on the same connection with
/// eager loading turned off; nested associations are loaded explicitly
/// after their parent field is filled.
#[derive(Debug, Clone, Copy)]
pub struct EagerLoader<'c> {
    connection: &'c Connection,
}

impl<'c> EagerLoader<'c> {
    /// Create a loader for a connection.
    pub fn new(connection: &'c Connection) -> Self {
        Self { connection }
    }

    /// Load associations with the strategy selected by `mode`.
    ///
    /// An unspecified mode resolves to the process-wide mode now.
    pub fn load(
        &self,
        mode: EagerMode,
        model: &mut dyn Loadable,
        fields: &[String],
    ) -> QueryResult<()> {
        let resolved = resolve_eager_mode(mode)?;
        trace!(requested = %mode, resolved = %resolved, "Resolved eager mode");
        match resolved {
            EagerMode::Default => self.load_default(model, fields),
            EagerMode::Cache => self.load_cached(model, fields),
            EagerMode::Unspecified => Err(QueryError::unsupported_eager_mode(resolved)),
        }
    }

    /// Load with one query per association per record.
    ///
    /// Records of a collection are visited in order and the first error
    /// stops the walk. Fields populated before the error stay populated.
    pub fn load_default(&self, model: &mut dyn Loadable, fields: &[String]) -> QueryResult<()> {
        match model.records() {
            ModelRef::One(record) => self.load_record(record, fields),
            ModelRef::Many(records) => {
                for record in records {
                    self.load_record(record, fields)?;
                }
                Ok(())
            }
        }
    }

    /// Batched loading entry point.
    ///
    /// Loads nothing yet and issues no queries. Once implemented it must fill
    /// the same fields as [`load_default`](Self::load_default) with a number
    /// of queries independent of the number of records.
    pub fn load_cached(&self, _model: &mut dyn Loadable, _fields: &[String]) -> QueryResult<()> {
        Ok(())
    }

    fn load_record(&self, record: &mut dyn Record, fields: &[String]) -> QueryResult<()> {
        let include = Include::parse(fields)?;
        let associations = associations_for(record, &include)?;

        for association in &associations {
            if association.skipped {
                trace!(
                    model = association.owner_model,
                    association = %association.name,
                    "Association skipped"
                );
                continue;
            }

            self.load_association(record, association)?;

            for inner in &association.inner {
                let slot = record.relation_slot(&inner.name).ok_or_else(|| {
                    QueryError::invalid_association(
                        association.owner_model,
                        format!("no field backs association {}", inner.name),
                    )
                })?;
                self.load_default(slot.as_loadable(), std::slice::from_ref(&inner.fields))?;
            }
        }

        Ok(())
    }

    fn load_association(&self, record: &mut dyn Record, association: &Association) -> QueryResult<()> {
        let constraint = association.constraint(&*record)?;

        let mut query = self
            .connection
            .query()
            .disable_eager()
            .r#where(constraint.predicate, constraint.args);
        if let Some(clause) = association.order_clause() {
            query = query.order(clause);
        }

        let (sql, args) = query.to_sql(&association.related);
        debug!(
            model = association.owner_model,
            association = %association.name,
            kind = %association.kind,
            sql = %sql,
            "Loading association"
        );
        let query = query.raw_query(sql, args);

        let slot = record.relation_slot(&association.name).ok_or_else(|| {
            QueryError::invalid_association(
                association.owner_model,
                format!("no field backs association {}", association.name),
            )
        })?;

        let result = match association.kind {
            AssociationKind::Collection => query.all_into(slot),
            AssociationKind::Single => query.first_into(slot),
        };

        match result {
            Err(err) if err.is_not_found() => {
                trace!(
                    model = association.owner_model,
                    association = %association.name,
                    "No related record"
                );
                Ok(())
            }
            other => other,
        }
    }
}
