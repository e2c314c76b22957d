//! Association fields and the records the loader walks.

use crate::error::{QueryError, QueryResult};
use crate::row::{FromRow, Row};
use crate::traits::{Model, ModelShape, Record};

use super::spec::AssociationKind;

/// A field that holds the related records of one association.
///
/// `Vec<M>` is a collection field, `Option<M>` a single-record field whose
/// zero value is `None`.
pub trait RelationSlot {
    /// Cardinality of the field.
    fn kind(&self) -> AssociationKind;

    /// Shape of the model the field holds.
    fn shape(&self) -> ModelShape;

    /// Replace the field's contents with every fetched row.
    fn fill_all(&mut self, rows: Vec<Row>) -> QueryResult<()>;

    /// Replace the field's contents with the first fetched row.
    fn fill_first(&mut self, row: Row) -> QueryResult<()>;

    /// The field's current value, for nested loading.
    fn as_loadable(&mut self) -> &mut dyn Loadable;
}

impl<M: Model + FromRow> RelationSlot for Vec<M> {
    fn kind(&self) -> AssociationKind {
        AssociationKind::Collection
    }

    fn shape(&self) -> ModelShape {
        ModelShape::of::<M>()
    }

    fn fill_all(&mut self, rows: Vec<Row>) -> QueryResult<()> {
        *self = rows
            .iter()
            .map(M::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }

    fn fill_first(&mut self, _row: Row) -> QueryResult<()> {
        Err(QueryError::internal(format!(
            "collection of {} cannot be filled with a single row",
            M::MODEL_NAME
        )))
    }

    fn as_loadable(&mut self) -> &mut dyn Loadable {
        self
    }
}

impl<M: Model + FromRow> RelationSlot for Option<M> {
    fn kind(&self) -> AssociationKind {
        AssociationKind::Single
    }

    fn shape(&self) -> ModelShape {
        ModelShape::of::<M>()
    }

    fn fill_all(&mut self, _rows: Vec<Row>) -> QueryResult<()> {
        Err(QueryError::internal(format!(
            "single {} record cannot be filled with a row set",
            M::MODEL_NAME
        )))
    }

    fn fill_first(&mut self, row: Row) -> QueryResult<()> {
        *self = Some(M::from_row(&row)?);
        Ok(())
    }

    fn as_loadable(&mut self) -> &mut dyn Loadable {
        self
    }
}

/// Records reachable through a model reference.
pub enum ModelRef<'a> {
    /// A single record.
    One(&'a mut dyn Record),
    /// An ordered sequence of records.
    Many(Vec<&'a mut dyn Record>),
}

impl ModelRef<'_> {
    /// Number of records referenced.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(records) => records.len(),
        }
    }

    /// Check if no record is referenced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Something associations can be loaded into: one record or a sequence.
pub trait Loadable {
    /// The referenced records, in their original order.
    fn records(&mut self) -> ModelRef<'_>;
}

impl<M: Model> Loadable for M {
    fn records(&mut self) -> ModelRef<'_> {
        ModelRef::One(self)
    }
}

impl<M: Model> Loadable for [M] {
    fn records(&mut self) -> ModelRef<'_> {
        ModelRef::Many(self.iter_mut().map(|m| m as &mut dyn Record).collect())
    }
}

impl<M: Model> Loadable for Vec<M> {
    fn records(&mut self) -> ModelRef<'_> {
        self.as_mut_slice().records()
    }
}

impl<M: Model> Loadable for Option<M> {
    fn records(&mut self) -> ModelRef<'_> {
        ModelRef::Many(self.iter_mut().map(|m| m as &mut dyn Record).collect())
    }
}
