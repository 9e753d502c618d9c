// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft persistence for wizard sessions.
//!
//! Drafts are saved under `<flow>:<session>` keys through the
//! [`DraftStore`] port. Two implementations are provided:
//!
//! - [`InMemoryDraftStore`]: process memory, used by tests
//! - [`SqliteDraftStore`]: `SQLite` via Diesel, in-memory or file-backed
//!
//! ## Migrations
//!
//! `SQLite` migrations live in `migrations/` and are embedded in the binary;
//! they run whenever a store is opened.
//!
//! ## Same-key writes
//!
//! A save replaces the previous snapshot for its key and increments the
//! key's revision. Concurrent writers to one key resolve as last write wins.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use upscalex_domain::FormState;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use store::{DraftKey, DraftRecord, DraftStore, InMemoryDraftStore};

/// Draft store backed by `SQLite`.
pub struct SqliteDraftStore {
    conn: SqliteConnection,
}

impl SqliteDraftStore {
    /// Creates a store with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so stores never
    /// see each other's drafts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:drafts_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a store with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        Ok(Self { conn })
    }
}

impl DraftStore for SqliteDraftStore {
    fn save(
        &mut self,
        key: &DraftKey,
        form: &FormState,
        current_ordinal: usize,
    ) -> Result<DraftRecord, PersistenceError> {
        mutations::save_draft(&mut self.conn, key, form, current_ordinal)
    }

    fn load(&mut self, key: &DraftKey) -> Result<Option<DraftRecord>, PersistenceError> {
        queries::load_draft(&mut self.conn, key)
    }

    fn clear(&mut self, key: &DraftKey) -> Result<(), PersistenceError> {
        mutations::clear_draft(&mut self.conn, key)
    }
}
