//! Association whitelists for eager loading.
//!
//! A whitelist entry names an association, optionally followed by a dotted
//! path into the related model:
//!
//! ```rust
//! use rivet_query::relations::Include;
//!
//! let include = Include::parse(["books.publisher", " owner ", ""]).unwrap();
//! assert!(include.contains("books"));
//! assert!(include.contains("owner"));
//! assert_eq!(include.nested_for("books").collect::<Vec<_>>(), ["publisher"]);
//!
//! assert!(Include::parse(["books..publisher"]).is_err());
//! ```

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{QueryError, QueryResult};

static PATH_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").ok());

/// One parsed whitelist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludePath {
    /// Association on the model being loaded.
    pub relation: String,
    /// Remaining path, applied to the related records.
    pub nested: Option<String>,
}

impl IncludePath {
    /// Parse a single entry. Blank entries yield `None`.
    pub fn parse(expr: &str) -> QueryResult<Option<Self>> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(None);
        }

        let pattern = PATH_PATTERN
            .as_ref()
            .ok_or_else(|| QueryError::internal("association path pattern failed to compile"))?;
        if !pattern.is_match(expr) {
            return Err(QueryError::invalid_association_expr(expr));
        }

        Ok(Some(match expr.split_once('.') {
            Some((relation, nested)) => Self {
                relation: relation.to_string(),
                nested: Some(nested.to_string()),
            },
            None => Self {
                relation: expr.to_string(),
                nested: None,
            },
        }))
    }
}

/// A parsed association whitelist. Empty means every declared association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include {
    paths: Vec<IncludePath>,
}

impl Include {
    /// Create an empty whitelist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse whitelist entries in order.
    pub fn parse<I, S>(fields: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = Vec::new();
        for field in fields {
            if let Some(path) = IncludePath::parse(field.as_ref())? {
                paths.push(path);
            }
        }
        Ok(Self { paths })
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Check if an association was named.
    pub fn contains(&self, relation: &str) -> bool {
        self.paths.iter().any(|p| p.relation == relation)
    }

    /// Nested paths requested for an association, in entry order.
    pub fn nested_for<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.paths
            .iter()
            .filter(move |p| p.relation == relation)
            .filter_map(|p| p.nested.as_deref())
    }

    /// All parsed entries.
    pub fn paths(&self) -> &[IncludePath] {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_and_nested() {
        assert_eq!(
            IncludePath::parse("wheels").unwrap(),
            Some(IncludePath {
                relation: "wheels".to_string(),
                nested: None
            })
        );
        assert_eq!(
            IncludePath::parse("books.publisher.address").unwrap(),
            Some(IncludePath {
                relation: "books".to_string(),
                nested: Some("publisher.address".to_string())
            })
        );
        assert_eq!(IncludePath::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for expr in ["books.", ".books", "books..publisher", "books publisher", "books-1"] {
            let err = IncludePath::parse(expr).unwrap_err();
            assert!(err.is_invalid_association(), "{expr} should be rejected");
        }
    }

    #[test]
    fn test_include_keeps_every_nested_entry() {
        let include = Include::parse(["books.publisher", "books", "books.tags"]).unwrap();
        assert_eq!(include.paths().len(), 3);
        assert_eq!(
            include.nested_for("books").collect::<Vec<_>>(),
            ["publisher", "tags"]
        );
        assert!(!include.contains("publisher"));
    }

    #[test]
    fn test_blank_entries_mean_everything() {
        let include = Include::parse([""]).unwrap();
        assert!(include.is_empty());
        assert_eq!(include, Include::new());
    }
}
