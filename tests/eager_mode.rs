//! Process-wide eager mode.
//!
//! Every test here changes the process-wide mode, so they run one at a time
//! behind a lock and restore the default before releasing it.

#![cfg(feature = "sqlite")]

mod common;

use std::sync::{Mutex, MutexGuard};

use common::{Author, connect, library};
use pretty_assertions::assert_eq;
use rivet_orm::prelude::*;
use rivet_orm::{ErrorCode, global_eager_mode};

static GLOBAL: Mutex<()> = Mutex::new(());

struct GlobalMode<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl GlobalMode<'_> {
    fn set(mode: EagerMode) -> Self {
        let guard = GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set_eager_mode(mode);
        Self { _guard: guard }
    }
}

impl Drop for GlobalMode<'_> {
    fn drop(&mut self) {
        set_eager_mode(EagerMode::Default);
    }
}

#[test]
fn test_unspecified_query_follows_global_default() {
    let _mode = GlobalMode::set(EagerMode::Default);
    let db = library();
    let conn = connect(&db, EagerMode::Unspecified);

    let mut author = Author::new(1);
    conn.load_all(&mut author).unwrap();

    assert_eq!(author.books.len(), 2);
    assert_eq!(db.count(), 2);
}

#[test]
fn test_unspecified_query_follows_global_cache() {
    let _mode = GlobalMode::set(EagerMode::Cache);
    let db = library();
    let conn = connect(&db, EagerMode::Unspecified);

    let mut author = Author::new(1);
    conn.load_all(&mut author).unwrap();

    assert!(author.books.is_empty());
    assert_eq!(db.count(), 0);
}

#[test]
fn test_global_mode_is_read_at_load_time() {
    let _mode = GlobalMode::set(EagerMode::Default);
    let db = library();
    let conn = connect(&db, EagerMode::Unspecified);

    let query = conn.eager(["books"]);
    assert_eq!(query.eager_mode(), EagerMode::Unspecified);

    set_eager_mode(EagerMode::Cache);
    let mut author = Author::new(1);
    query.eager_load(&mut author).unwrap();

    assert!(author.books.is_empty());
    assert_eq!(query.effective_eager_mode().unwrap(), EagerMode::Cache);
}

#[test]
fn test_connection_mode_overrides_global() {
    let _mode = GlobalMode::set(EagerMode::Cache);
    let db = library();
    let conn = connect(&db, EagerMode::Default);

    let mut author = Author::new(1);
    conn.load_all(&mut author).unwrap();

    assert_eq!(author.books.len(), 2);
}

#[test]
fn test_query_mode_overrides_connection_and_global() {
    let _mode = GlobalMode::set(EagerMode::Default);
    let db = library();
    let conn = connect(&db, EagerMode::Default);

    let mut author = Author::new(1);
    conn.set_eager_mode(EagerMode::Cache)
        .eager(["books"])
        .eager_load(&mut author)
        .unwrap();

    assert!(author.books.is_empty());
    assert_eq!(db.count(), 0);
}

#[test]
fn test_unspecified_global_is_rejected() {
    let _mode = GlobalMode::set(EagerMode::Unspecified);
    assert_eq!(global_eager_mode(), EagerMode::Unspecified);

    let db = library();
    let conn = connect(&db, EagerMode::Unspecified);

    let mut author = Author::new(1);
    let err = conn.load_all(&mut author).unwrap_err();

    assert_eq!(err.code, ErrorCode::UnsupportedEagerMode);
    assert_eq!(db.count(), 0);

    // An explicit mode on the query does not consult the global.
    conn.set_eager_mode(EagerMode::Default)
        .eager_load(&mut author)
        .unwrap();
    assert_eq!(author.books.len(), 2);
}
