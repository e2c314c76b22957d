//! Per-call association descriptors and their constraints.
//!
//! Descriptors are rebuilt from [`Model::relations`](crate::traits::Model::relations)
//! on every load call and never cached.

use convert_case::{Case, Casing};

use crate::error::{QueryError, QueryResult};
use crate::filter::FilterValue;
use crate::sql::quote_identifier;
use crate::traits::{ModelShape, Record};

use super::include::Include;
use super::spec::{AssociationKind, JoinTableSpec, RelationSpec, RelationType};

/// A nested load to run after an association is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerAssociation {
    /// Association field on the owning record.
    pub name: String,
    /// Whitelist applied to the records in that field.
    pub fields: String,
}

/// Predicate and positional arguments selecting the related rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// `?`-placeholder predicate.
    pub predicate: String,
    /// Arguments in placeholder order.
    pub args: Vec<FilterValue>,
}

/// One association of one owning record, resolved for a single load call.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    /// Association field name.
    pub name: String,
    /// Relation type.
    pub relation_type: RelationType,
    /// Cardinality of the field.
    pub kind: AssociationKind,
    /// Model name of the owning record.
    pub owner_model: &'static str,
    /// Shape of the related model.
    pub related: ModelShape,
    /// Whether loading is skipped for this record.
    pub skipped: bool,
    /// Key columns read from the owning record.
    pub owner_columns: Vec<String>,
    /// Key columns matched on the related rows.
    pub related_columns: Vec<String>,
    /// Join table for many-to-many relations.
    pub join_table: Option<JoinTableSpec>,
    /// Order clause; an empty clause keeps the database order.
    pub order_by: Option<String>,
    /// Nested loads, in declaration then whitelist order.
    pub inner: Vec<InnerAssociation>,
}

impl Association {
    /// Order clause if the association applies one.
    pub fn order_clause(&self) -> Option<&str> {
        self.order_by.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Build the constraint from the owning record's current values.
    ///
    /// Executes nothing. Fails if the record does not expose a key column.
    pub fn constraint(&self, owner: &dyn Record) -> QueryResult<Constraint> {
        let mut args = Vec::with_capacity(self.owner_columns.len());
        for column in &self.owner_columns {
            let value = owner
                .column_value(column)
                .ok_or_else(|| QueryError::missing_key(self.owner_model, column.as_str()))?;
            args.push(value);
        }

        let predicate = match (&self.join_table, self.related_columns.as_slice()) {
            (Some(jt), [related]) => format!(
                "{} IN (SELECT {} FROM {} WHERE {} = ?)",
                quote_identifier(related),
                quote_identifier(&jt.target_column),
                quote_identifier(&jt.table_name),
                quote_identifier(&jt.source_column),
            ),
            (Some(_), _) => {
                return Err(QueryError::invalid_association(
                    self.owner_model,
                    format!("many-to-many association {} needs one referenced column", self.name),
                ));
            }
            (None, _) => self
                .related_columns
                .iter()
                .map(|c| format!("{} = ?", quote_identifier(c)))
                .collect::<Vec<_>>()
                .join(" AND "),
        };

        Ok(Constraint { predicate, args })
    }
}

/// Resolve the associations of one record, filtered by a whitelist.
///
/// Associations come back in declaration order. Every whitelist entry must
/// name a declared association, and every selected association must be
/// backed by a field of the declared cardinality.
pub fn associations_for(record: &mut dyn Record, include: &Include) -> QueryResult<Vec<Association>> {
    let owner = record.shape();
    let specs = record.relation_specs();

    for path in include.paths() {
        if !specs.iter().any(|s| s.name == path.relation) {
            return Err(QueryError::unknown_association(owner.model_name, path.relation.as_str()));
        }
    }

    let mut associations = Vec::new();
    for spec in specs {
        if !include.is_empty() && !include.contains(&spec.name) {
            continue;
        }

        let slot = record.relation_slot(&spec.name).ok_or_else(|| {
            QueryError::invalid_association(
                owner.model_name,
                format!("no field backs association {}.{}", owner.model_name, spec.name),
            )
            .with_field(spec.name.as_str())
        })?;
        if slot.kind() != spec.kind() {
            return Err(QueryError::kind_mismatch(
                owner.model_name,
                spec.name.as_str(),
                spec.kind(),
                slot.kind(),
            ));
        }

        let (owner_columns, related_columns) = key_columns(&owner, &spec)?;
        let skipped = spec.relation_type == RelationType::ManyToOne
            && owner_columns
                .iter()
                .any(|c| record.column_value(c).is_some_and(|v| v.is_null()));

        // A path named both by the relation and the whitelist loads once.
        let mut inner: Vec<InnerAssociation> = Vec::new();
        let paths = spec.nested.iter().map(String::as_str).chain(include.nested_for(&spec.name));
        for fields in paths {
            if inner.iter().all(|i| i.fields != fields) {
                inner.push(InnerAssociation {
                    name: spec.name.clone(),
                    fields: fields.to_string(),
                });
            }
        }

        associations.push(Association {
            kind: spec.kind(),
            relation_type: spec.relation_type,
            owner_model: owner.model_name,
            related: spec.related,
            skipped,
            owner_columns,
            related_columns,
            join_table: spec.join_table,
            order_by: spec.order_by,
            inner,
            name: spec.name,
        });
    }

    Ok(associations)
}

/// Owner and related key columns, with defaults filled in.
fn key_columns(owner: &ModelShape, spec: &RelationSpec) -> QueryResult<(Vec<String>, Vec<String>)> {
    let primary_key = |shape: &ModelShape| -> Vec<String> {
        shape.primary_key.iter().map(|c| c.to_string()).collect()
    };
    let or_default = |columns: &[String], default: Vec<String>| {
        if columns.is_empty() { default } else { columns.to_vec() }
    };

    let (owner_columns, related_columns) = match spec.relation_type {
        RelationType::OneToOne | RelationType::OneToMany => (
            or_default(&spec.fields, primary_key(owner)),
            or_default(
                &spec.references,
                vec![format!("{}_id", owner.model_name.to_case(Case::Snake))],
            ),
        ),
        RelationType::ManyToOne => (
            or_default(&spec.fields, vec![format!("{}_id", spec.name.to_case(Case::Snake))]),
            or_default(&spec.references, primary_key(&spec.related)),
        ),
        RelationType::ManyToMany => {
            if spec.join_table.is_none() {
                return Err(QueryError::invalid_association(
                    owner.model_name,
                    format!("many-to-many association {} has no join table", spec.name),
                )
                .with_field(spec.name.as_str()));
            }
            let columns = (
                or_default(&spec.fields, primary_key(owner)),
                or_default(&spec.references, primary_key(&spec.related)),
            );
            if columns.0.len() != 1 || columns.1.len() != 1 {
                return Err(QueryError::invalid_association(
                    owner.model_name,
                    format!(
                        "many-to-many association {} must use exactly one key column per side",
                        spec.name
                    ),
                )
                .with_field(spec.name.as_str()));
            }
            columns
        }
    };

    if owner_columns.is_empty() || owner_columns.len() != related_columns.len() {
        return Err(QueryError::invalid_association(
            owner.model_name,
            format!(
                "association {} pairs {} key column(s) with {} referenced column(s)",
                spec.name,
                owner_columns.len(),
                related_columns.len()
            ),
        )
        .with_field(spec.name.as_str()));
    }

    Ok((owner_columns, related_columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::RelationSlot;
    use crate::row::{FromRow, RowError, RowRef};
    use crate::traits::Model;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Publisher {
        id: i64,
    }

    impl Model for Publisher {
        const MODEL_NAME: &'static str = "Publisher";
        const TABLE_NAME: &'static str = "publishers";
        const PRIMARY_KEY: &'static [&'static str] = &["id"];
        const COLUMNS: &'static [&'static str] = &["id"];
    }

    impl FromRow for Publisher {
        fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
            Ok(Self { id: row.get_i64("id")? })
        }
    }

    #[derive(Debug, Default)]
    struct Tag;

    impl Model for Tag {
        const MODEL_NAME: &'static str = "Tag";
        const TABLE_NAME: &'static str = "tags";
        const PRIMARY_KEY: &'static [&'static str] = &["id"];
        const COLUMNS: &'static [&'static str] = &["id"];
    }

    impl FromRow for Tag {
        fn from_row(_row: &impl RowRef) -> Result<Self, RowError> {
            Ok(Self)
        }
    }

    #[derive(Debug, Default)]
    struct BookReview;

    impl Model for BookReview {
        const MODEL_NAME: &'static str = "BookReview";
        const TABLE_NAME: &'static str = "book_reviews";
        const PRIMARY_KEY: &'static [&'static str] = &["id"];
        const COLUMNS: &'static [&'static str] = &["id", "book_id"];
    }

    impl FromRow for BookReview {
        fn from_row(_row: &impl RowRef) -> Result<Self, RowError> {
            Ok(Self)
        }
    }

    #[derive(Debug, Default)]
    struct Book {
        id: Option<i64>,
        publisher_id: Option<i64>,
        publisher: Option<Publisher>,
        tags: Vec<Tag>,
        reviews: Vec<BookReview>,
    }

    impl Model for Book {
        const MODEL_NAME: &'static str = "Book";
        const TABLE_NAME: &'static str = "books";
        const PRIMARY_KEY: &'static [&'static str] = &["id"];
        const COLUMNS: &'static [&'static str] = &["id", "publisher_id"];

        fn relations() -> Vec<RelationSpec> {
            vec![
                RelationSpec::many_to_one::<Publisher>("publisher"),
                RelationSpec::many_to_many::<Tag>(
                    "tags",
                    JoinTableSpec::new("book_tags", "book_id", "tag_id"),
                ),
                RelationSpec::one_to_many::<BookReview>("reviews")
                    .order_by("created_at DESC")
                    .include("author"),
            ]
        }

        fn value(&self, column: &str) -> Option<FilterValue> {
            match column {
                "id" => self.id.map(FilterValue::from),
                "publisher_id" => Some(self.publisher_id.into()),
                _ => None,
            }
        }

        fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
            match name {
                "publisher" => Some(&mut self.publisher),
                "tags" => Some(&mut self.tags),
                "reviews" => Some(&mut self.reviews),
                _ => None,
            }
        }
    }

    fn book() -> Book {
        Book {
            id: Some(7),
            publisher_id: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_associations_in_declaration_order() {
        let mut book = book();
        let associations = associations_for(&mut book, &Include::new()).unwrap();
        let names: Vec<_> = associations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["publisher", "tags", "reviews"]);
        assert_eq!(associations[0].kind, AssociationKind::Single);
        assert_eq!(associations[1].kind, AssociationKind::Collection);
    }

    #[test]
    fn test_whitelist_filters_and_attaches_inner() {
        let mut book = book();
        let include = Include::parse(["reviews.author", "publisher"]).unwrap();
        let associations = associations_for(&mut book, &include).unwrap();

        let names: Vec<_> = associations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["publisher", "reviews"]);
        assert_eq!(
            associations[1].inner,
            vec![InnerAssociation {
                name: "reviews".into(),
                fields: "author".into()
            }]
        );
    }

    #[test]
    fn test_whitelist_adds_nested_paths_after_declared_ones() {
        let mut book = book();
        let include = Include::parse(["reviews.book", "reviews.author", "reviews.book"]).unwrap();
        let associations = associations_for(&mut book, &include).unwrap();

        let fields: Vec<_> = associations[0].inner.iter().map(|i| i.fields.as_str()).collect();
        assert_eq!(fields, ["author", "book"]);
    }

    #[test]
    fn test_unknown_whitelist_entry() {
        let mut book = book();
        let include = Include::parse(["authors"]).unwrap();
        let err = associations_for(&mut book, &include).unwrap_err();
        assert_eq!(err.message, "field authors does not exist in model Book");
    }

    #[test]
    fn test_has_many_constraint_defaults() {
        let mut book = book();
        let include = Include::parse(["reviews"]).unwrap();
        let association = associations_for(&mut book, &include).unwrap().remove(0);

        assert_eq!(association.related_columns, vec!["book_id"]);
        assert_eq!(association.order_clause(), Some("created_at DESC"));
        let constraint = association.constraint(&book).unwrap();
        assert_eq!(constraint.predicate, "book_id = ?");
        assert_eq!(constraint.args, vec![FilterValue::Int(7)]);
    }

    #[test]
    fn test_belongs_to_constraint_and_null_skip() {
        let mut book = book();
        let include = Include::parse(["publisher"]).unwrap();
        let association = associations_for(&mut book, &include).unwrap().remove(0);
        assert!(!association.skipped);
        let constraint = association.constraint(&book).unwrap();
        assert_eq!(constraint.predicate, "id = ?");
        assert_eq!(constraint.args, vec![FilterValue::Int(3)]);

        book.publisher_id = None;
        let association = associations_for(&mut book, &include).unwrap().remove(0);
        assert!(association.skipped);
    }

    #[test]
    fn test_many_to_many_constraint() {
        let mut book = book();
        let include = Include::parse(["tags"]).unwrap();
        let association = associations_for(&mut book, &include).unwrap().remove(0);
        let constraint = association.constraint(&book).unwrap();
        assert_eq!(
            constraint.predicate,
            "id IN (SELECT tag_id FROM book_tags WHERE book_id = ?)"
        );
    }

    #[test]
    fn test_missing_owner_key() {
        let mut book = Book::default();
        let include = Include::parse(["reviews"]).unwrap();
        let association = associations_for(&mut book, &include).unwrap().remove(0);
        let err = association.constraint(&book).unwrap_err();
        assert!(err.is_missing_key());
        assert_eq!(err.context.field.as_deref(), Some("id"));
    }

    #[test]
    fn test_mismatched_key_columns() {
        let spec = RelationSpec::one_to_many::<BookReview>("reviews")
            .fields(["id", "edition"])
            .references(["book_id"]);
        let err = key_columns(&ModelShape::of::<Book>(), &spec).unwrap_err();
        assert!(err.is_invalid_association());
    }
}
