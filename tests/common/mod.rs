//! Shared fixtures: a small library schema on SQLite plus an engine that
//! records every statement it runs.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rivet_orm::prelude::*;
use rivet_orm::query::Row;

/// Wraps an engine and records the SQL of every statement.
pub struct Recorder<E> {
    inner: E,
    statements: RefCell<Vec<String>>,
}

impl<E> Recorder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            statements: RefCell::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.statements.borrow().len()
    }

    pub fn clear(&self) {
        self.statements.borrow_mut().clear();
    }
}

impl<E: QueryEngine> QueryEngine for Recorder<E> {
    fn query_many(&self, sql: &str, params: &[FilterValue]) -> QueryResult<Vec<Row>> {
        self.statements.borrow_mut().push(sql.to_string());
        self.inner.query_many(sql, params)
    }
}

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

impl Model for Publisher {
    const MODEL_NAME: &'static str = "Publisher";
    const TABLE_NAME: &'static str = "publishers";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

impl FromRow for Publisher {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self {
            id: row.get_i64("id")?,
            name: row.get_string("name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

impl Model for Tag {
    const MODEL_NAME: &'static str = "Tag";
    const TABLE_NAME: &'static str = "tags";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "label"];
}

impl FromRow for Tag {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self {
            id: row.get_i64("id")?,
            label: row.get_string("label")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub publisher_id: Option<i64>,
    pub publisher: Option<Publisher>,
    pub tags: Vec<Tag>,
}

impl Model for Book {
    const MODEL_NAME: &'static str = "Book";
    const TABLE_NAME: &'static str = "books";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "title", "author_id", "publisher_id"];

    fn relations() -> Vec<RelationSpec> {
        vec![
            RelationSpec::many_to_one::<Publisher>("publisher"),
            RelationSpec::many_to_many::<Tag>("tags", JoinTableSpec::new("book_tags", "book_id", "tag_id"))
                .order_by("label ASC"),
        ]
    }

    fn value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "id" => Some(self.id.into()),
            "author_id" => Some(self.author_id.into()),
            "publisher_id" => Some(self.publisher_id.into()),
            _ => None,
        }
    }

    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
        match name {
            "publisher" => Some(&mut self.publisher),
            "tags" => Some(&mut self.tags),
            _ => None,
        }
    }
}

impl FromRow for Book {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self {
            id: row.get_i64("id")?,
            title: row.get_string("title")?,
            author_id: row.get_i64("author_id")?,
            publisher_id: row.get_i64_opt("publisher_id")?,
            publisher: None,
            tags: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub bio: String,
}

impl Model for Profile {
    const MODEL_NAME: &'static str = "Profile";
    const TABLE_NAME: &'static str = "profiles";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "bio"];
}

impl FromRow for Profile {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self {
            id: row.get_i64("id")?,
            bio: row.get_string("bio")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
    pub profile: Option<Profile>,
}

impl Author {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

impl Model for Author {
    const MODEL_NAME: &'static str = "Author";
    const TABLE_NAME: &'static str = "authors";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn relations() -> Vec<RelationSpec> {
        vec![
            RelationSpec::one_to_many::<Book>("books").order_by("id ASC"),
            RelationSpec::one_to_one::<Profile>("profile"),
        ]
    }

    fn value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "id" => Some(self.id.into()),
            _ => None,
        }
    }

    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
        match name {
            "books" => Some(&mut self.books),
            "profile" => Some(&mut self.profile),
            _ => None,
        }
    }
}

impl FromRow for Author {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self {
            id: row.get_i64("id")?,
            name: row.get_string("name")?,
            ..Default::default()
        })
    }
}

// ============================================================================
// Database
// ============================================================================

const SCHEMA: &str = "
CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE publishers (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES authors(id),
    publisher_id INTEGER REFERENCES publishers(id)
);
CREATE TABLE profiles (id INTEGER PRIMARY KEY, author_id INTEGER NOT NULL, bio TEXT NOT NULL);
CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT NOT NULL);
CREATE TABLE book_tags (book_id INTEGER NOT NULL, tag_id INTEGER NOT NULL);

INSERT INTO authors VALUES (1, 'Ursula'), (2, 'Italo'), (3, 'Octavia');
INSERT INTO publishers VALUES (10, 'Ace'), (11, 'Harcourt');
INSERT INTO books VALUES
    (102, 'The Dispossessed', 1, 11),
    (101, 'The Left Hand of Darkness', 1, 10),
    (201, 'Invisible Cities', 2, NULL);
INSERT INTO profiles VALUES (1, 1, 'Wrote Earthsea.');
INSERT INTO tags VALUES (1, 'science fiction'), (2, 'classic'), (3, 'fable');
INSERT INTO book_tags VALUES (101, 1), (101, 2), (201, 3);
";

/// An in-memory library database behind a statement recorder.
pub fn library() -> Rc<Recorder<SqliteEngine>> {
    let engine = SqliteEngine::memory().expect("open in-memory database");
    engine.execute_batch(SCHEMA).expect("create library schema");
    Rc::new(Recorder::new(engine))
}

/// A SQLite-dialect connection over a shared recorder.
pub fn connect(engine: &Rc<Recorder<SqliteEngine>>, mode: EagerMode) -> Connection {
    Connection::with_options(
        Rc::clone(engine),
        ConnectionOptions::new()
            .database_type(DatabaseType::SQLite)
            .eager_mode(mode),
    )
}
