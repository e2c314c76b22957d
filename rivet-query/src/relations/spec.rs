//! Relation specification types.

use std::fmt;

use crate::traits::{Model, ModelShape};

/// Type of relation between models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-one relation (e.g., Person has one Passport).
    OneToOne,
    /// One-to-many relation (e.g., Car has many Wheels).
    OneToMany,
    /// Many-to-one relation (e.g., Car belongs to its owner).
    ManyToOne,
    /// Many-to-many relation (e.g., Book has many Tags).
    ManyToMany,
}

impl RelationType {
    /// Check if this relation returns multiple records.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    /// Check if this relation returns a single record.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }

    /// Cardinality of the association field.
    pub fn kind(&self) -> AssociationKind {
        if self.is_many() {
            AssociationKind::Collection
        } else {
            AssociationKind::Single
        }
    }
}

/// Whether an association yields one related record or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Fetched with a first-row query into an optional field.
    Single,
    /// Fetched with an all-rows query into a collection field.
    Collection,
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single record"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

/// Specification for a relation between models.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationSpec {
    /// Name of the relation (field name).
    pub name: String,
    /// Type of relation.
    pub relation_type: RelationType,
    /// Shape of the related model.
    pub related: ModelShape,
    /// Key columns on the owning model.
    pub fields: Vec<String>,
    /// Key columns on the related model.
    pub references: Vec<String>,
    /// Join table for many-to-many relations.
    pub join_table: Option<JoinTableSpec>,
    /// Order clause for the related rows. An empty clause keeps the database order.
    pub order_by: Option<String>,
    /// Nested associations loaded on the related records.
    pub nested: Vec<String>,
}

impl RelationSpec {
    fn new<M: Model>(name: impl Into<String>, relation_type: RelationType) -> Self {
        Self {
            name: name.into(),
            relation_type,
            related: ModelShape::of::<M>(),
            fields: Vec::new(),
            references: Vec::new(),
            join_table: None,
            order_by: None,
            nested: Vec::new(),
        }
    }

    /// Create a one-to-one relation spec.
    pub fn one_to_one<M: Model>(name: impl Into<String>) -> Self {
        Self::new::<M>(name, RelationType::OneToOne)
    }

    /// Create a one-to-many relation spec.
    pub fn one_to_many<M: Model>(name: impl Into<String>) -> Self {
        Self::new::<M>(name, RelationType::OneToMany)
    }

    /// Create a many-to-one relation spec.
    pub fn many_to_one<M: Model>(name: impl Into<String>) -> Self {
        Self::new::<M>(name, RelationType::ManyToOne)
    }

    /// Create a many-to-many relation spec.
    pub fn many_to_many<M: Model>(name: impl Into<String>, join_table: JoinTableSpec) -> Self {
        let mut spec = Self::new::<M>(name, RelationType::ManyToMany);
        spec.join_table = Some(join_table);
        spec
    }

    /// Set the key fields on the owning model.
    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the referenced fields on the related model.
    pub fn references(mut self, refs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.references = refs.into_iter().map(Into::into).collect();
        self
    }

    /// Order the related rows.
    ///
    /// Accepts a raw clause or an [`OrderBy`](crate::types::OrderBy).
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    /// Always load a nested association of the related records.
    pub fn include(mut self, nested: impl Into<String>) -> Self {
        self.nested.push(nested.into());
        self
    }

    /// Cardinality of the association field.
    pub fn kind(&self) -> AssociationKind {
        self.relation_type.kind()
    }
}

/// Specification for a join table (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTableSpec {
    /// Name of the join table.
    pub table_name: String,
    /// Column referencing the source model.
    pub source_column: String,
    /// Column referencing the target model.
    pub target_column: String,
}

impl JoinTableSpec {
    /// Create a new join table spec.
    pub fn new(
        table_name: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}
