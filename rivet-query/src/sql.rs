//! SQL generation utilities.

use serde::{Deserialize, Serialize};

/// Escape a string for use in SQL (for identifiers, not values).
pub fn escape_identifier(name: &str) -> String {
    let escaped = name.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    let reserved = [
        "user", "order", "group", "select", "from", "where", "table", "index", "key", "primary",
        "foreign", "check", "default", "null", "not", "and", "or", "in", "is", "like", "between",
        "case", "when", "then", "else", "end", "as", "on", "join", "limit", "offset", "union",
        "all", "distinct", "having", "values", "set",
    ];

    if reserved.contains(&name.to_lowercase().as_str()) {
        return true;
    }

    !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote an identifier if needed.
pub fn quote_identifier(name: &str) -> String {
    if needs_quoting(name) {
        escape_identifier(name)
    } else {
        name.to_string()
    }
}

/// Placeholder dialect of the backing store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseType {
    /// PostgreSQL uses $1, $2, etc.
    #[default]
    PostgreSQL,
    /// MySQL uses ?, ?, etc.
    MySQL,
    /// SQLite uses ?, ?, etc.
    SQLite,
}

impl DatabaseType {
    /// Get the parameter placeholder for this database type.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }

    /// Resolve a dialect from a URL scheme or configuration value.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::PostgreSQL),
            "mysql" | "mariadb" => Some(Self::MySQL),
            "sqlite" | "file" => Some(Self::SQLite),
            _ => None,
        }
    }

    /// Rewrite `?` placeholders into this dialect's placeholders.
    ///
    /// Question marks inside single-quoted literals are left alone.
    ///
    /// ```rust
    /// use rivet_query::DatabaseType;
    ///
    /// let sql = DatabaseType::PostgreSQL.rebind("a = ? AND b = '?' AND c = ?");
    /// assert_eq!(sql, "a = $1 AND b = '?' AND c = $2");
    /// ```
    pub fn rebind(&self, sql: &str) -> String {
        if !matches!(self, Self::PostgreSQL) {
            return sql.to_string();
        }

        let mut out = String::with_capacity(sql.len() + 8);
        let mut index = 0;
        let mut in_literal = false;
        for c in sql.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(c);
                }
                '?' if !in_literal => {
                    index += 1;
                    out.push_str(&self.placeholder(index));
                }
                _ => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("user"), "\"user\"");
        assert_eq!(escape_identifier("has\"quote"), "\"has\"\"quote\"");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("order"), "\"order\"");
        assert_eq!(quote_identifier("wheels"), "wheels");
        assert_eq!(quote_identifier("has space"), "\"has space\"");
    }

    #[test]
    fn test_database_placeholder() {
        assert_eq!(DatabaseType::PostgreSQL.placeholder(1), "$1");
        assert_eq!(DatabaseType::PostgreSQL.placeholder(5), "$5");
        assert_eq!(DatabaseType::MySQL.placeholder(1), "?");
        assert_eq!(DatabaseType::SQLite.placeholder(1), "?");
    }

    #[test]
    fn test_rebind_leaves_question_marks_for_sqlite() {
        assert_eq!(DatabaseType::SQLite.rebind("car_id = ?"), "car_id = ?");
    }

    #[test]
    fn test_from_scheme() {
        assert_eq!(DatabaseType::from_scheme("postgresql"), Some(DatabaseType::PostgreSQL));
        assert_eq!(DatabaseType::from_scheme("MariaDB"), Some(DatabaseType::MySQL));
        assert_eq!(DatabaseType::from_scheme("sqlite"), Some(DatabaseType::SQLite));
        assert_eq!(DatabaseType::from_scheme("oracle"), None);
    }
}
