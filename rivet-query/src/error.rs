//! Error types for query and association-loading operations.
//!
//! Every failure carries an [`ErrorCode`] for programmatic handling plus an
//! [`ErrorContext`] describing what was being done when it happened.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Query errors (not found, invalid association, missing key)
//! - 3xxx: Connection errors (timeout, auth)
//! - 5xxx: Execution errors (timeout, syntax, database)
//! - 6xxx: Data errors (row decoding)
//! - 7xxx: Configuration errors (eager mode, connection options)
//! - 9xxx: Internal errors
//!
//! ```rust
//! use rivet_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::not_found("Person");
//! assert_eq!(err.code, ErrorCode::RecordNotFound);
//! assert!(err.is_not_found());
//!
//! let err = QueryError::missing_key("Car", "id");
//! assert_eq!(err.code, ErrorCode::MissingKey);
//! assert!(err.to_string().contains("P1005"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Query errors (1xxx)
    /// No row matched a single-record fetch (P1001).
    RecordNotFound = 1001,
    /// A model's associations could not be resolved (P1004).
    InvalidAssociation = 1004,
    /// The owning record lacks a key a constraint needs (P1005).
    MissingKey = 1005,

    // Connection errors (3xxx)
    /// Database connection failed (P3001).
    ConnectionFailed = 3001,
    /// Connection timeout (P3003).
    ConnectionTimeout = 3003,

    // Query execution errors (5xxx)
    /// Query timeout (P5001).
    QueryTimeout = 5001,
    /// SQL syntax error (P5002).
    SqlSyntax = 5002,
    /// Invalid parameter (P5003).
    InvalidParameter = 5003,
    /// General database error (P5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// Row could not be decoded into a model (P6003).
    DeserializationError = 6003,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,
    /// Invalid connection string (P7003).
    InvalidConnectionString = 7003,
    /// Eager mode outside the supported set (P7004).
    UnsupportedEagerMode = 7004,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1001").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RecordNotFound => "Record not found",
            Self::InvalidAssociation => "Invalid association",
            Self::MissingKey => "Missing key for association constraint",
            Self::ConnectionFailed => "Database connection failed",
            Self::ConnectionTimeout => "Connection timeout",
            Self::QueryTimeout => "Query timeout",
            Self::SqlSyntax => "SQL syntax error",
            Self::InvalidParameter => "Invalid parameter",
            Self::DatabaseError => "Database error",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::InvalidConnectionString => "Invalid connection string",
            Self::UnsupportedEagerMode => "Unsupported eager mode",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The model involved.
    pub model: Option<String>,
    /// The field or association involved.
    pub field: Option<String>,
    /// The SQL statement (if available).
    pub sql: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur during query and loading operations.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context
            .suggestions
            .push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the SQL statement.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a not found error.
    ///
    /// This is the distinguished "no rows" outcome that single-record
    /// association loads tolerate.
    pub fn not_found(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("No {} record found matching the query", model),
        )
        .with_model(&model)
    }

    /// Create an error for an association declaration that cannot be resolved.
    pub fn invalid_association(model: impl Into<String>, message: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(ErrorCode::InvalidAssociation, message.into())
            .with_model(&model)
            .with_context("resolving associations")
    }

    /// Create an error for a whitelist entry naming something that is not an association.
    pub fn unknown_association(model: impl Into<String>, field: impl Into<String>) -> Self {
        let model = model.into();
        let field = field.into();
        Self::new(
            ErrorCode::InvalidAssociation,
            format!("field {} does not exist in model {}", field, model),
        )
        .with_model(&model)
        .with_field(&field)
        .with_context("resolving associations")
        .with_suggestion(format!(
            "Declare '{}' in {}::relations() or remove it from the eager field list",
            field, model
        ))
    }

    /// Create an error for a malformed association expression.
    pub fn invalid_association_expr(expr: impl Into<String>) -> Self {
        let expr = expr.into();
        Self::new(
            ErrorCode::InvalidAssociation,
            format!(
                "association '{}' does not match the format '<field>' or '<field>.<nested-field>'",
                expr
            ),
        )
        .with_field(&expr)
        .with_context("parsing eager fields")
    }

    /// Create an error for a field whose shape disagrees with its declared kind.
    pub fn kind_mismatch(
        model: impl Into<String>,
        field: impl Into<String>,
        declared: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        let model = model.into();
        let field = field.into();
        Self::new(
            ErrorCode::InvalidAssociation,
            format!(
                "association {}.{} is declared as {} but its field holds {}",
                model, field, declared, actual
            ),
        )
        .with_model(&model)
        .with_field(&field)
        .with_help("Collection relations need a Vec<_> field, single-record relations an Option<_> field")
    }

    /// Create an error for an owning record that lacks a key column.
    pub fn missing_key(model: impl Into<String>, column: impl Into<String>) -> Self {
        let model = model.into();
        let column = column.into();
        Self::new(
            ErrorCode::MissingKey,
            format!("{} has no value for key column '{}'", model, column),
        )
        .with_model(&model)
        .with_field(&column)
        .with_context("building association constraint")
        .with_suggestion(format!("Return the '{}' column from {}::value()", column, model))
    }

    /// Create an error for an eager mode that cannot be dispatched.
    pub fn unsupported_eager_mode(mode: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnsupportedEagerMode,
            format!("eager mode {} is not supported", mode),
        )
        .with_suggestion("Use EagerMode::Default or EagerMode::Cache")
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidParameter,
            format!("Invalid input for {}: {}", field, message),
        )
        .with_field(&field)
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::ConnectionFailed, format!("Connection error: {}", message))
            .with_suggestion("Check that the database is reachable")
    }

    /// Create a timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::new(
            ErrorCode::QueryTimeout,
            format!("Query timed out after {}ms", duration_ms),
        )
        .with_suggestion("Increase the busy or statement timeout of the connection")
    }

    /// Create an SQL syntax error.
    pub fn sql_syntax(message: impl Into<String>, sql: impl Into<String>) -> Self {
        let message = message.into();
        let sql = sql.into();
        Self::new(ErrorCode::SqlSyntax, format!("SQL syntax error: {}", message))
            .with_sql(&sql)
            .with_suggestion("Check the relation's order clause and key columns")
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize result: {}", message),
        )
        .with_suggestion("Check that the model matches the database schema")
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
    }

    // ============== Error Checks ==============

    /// Check if this is the "no rows" error.
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::RecordNotFound
    }

    /// Check if the model's association shape could not be resolved.
    pub fn is_invalid_association(&self) -> bool {
        self.code == ErrorCode::InvalidAssociation
    }

    /// Check if a constraint could not be built.
    pub fn is_missing_key(&self) -> bool {
        self.code == ErrorCode::MissingKey
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self.code, ErrorCode::QueryTimeout | ErrorCode::ConnectionTimeout)
    }

    /// Check if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidConfiguration
                | ErrorCode::InvalidConnectionString
                | ErrorCode::UnsupportedEagerMode
        )
    }

    // ============== Display Functions ==============

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref model) = self.context.model {
            output.push_str(&format!("  → Model: {}\n", model));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }

        // SQL (truncated if too long)
        if let Some(ref sql) = self.context.sql {
            let sql_display = if sql.chars().count() > 200 {
                format!("{}...", sql.chars().take(200).collect::<String>())
            } else {
                sql.clone()
            };
            output.push_str(&format!("  → SQL: {}\n", sql_display));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!(
                        "     ```\n     {}\n     ```\n",
                        code.replace('\n', "\n     ")
                    ));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

/// Helper for creating errors with context.
#[macro_export]
macro_rules! query_error {
    ($code:expr, $msg:expr) => {
        $crate::error::QueryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let mut err = $crate::error::QueryError::new($code, $msg);
        $(
            err = err.$key($value);
        )+
        err
    }};
}
