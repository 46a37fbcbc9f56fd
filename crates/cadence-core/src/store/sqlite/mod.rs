//! Table-backed session store on SQLite.
//!
//! A fresh connection is opened for every operation so the store is cheap to
//! share across threads; the schema is applied when the store is opened. A
//! file SQLite rejects as corrupt is set aside and the store starts empty.

use std::path::{Path, PathBuf};

use log::warn;
use rusqlite::Connection;

use super::{SessionStore, set_aside};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{SelectionCommitment, SessionRecord},
};

mod schema;
mod selection_queries;
mod session_queries;

/// SQLite implementation of [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and applies the
    /// schema.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or created. A corrupt file is
    /// moved to `<path>.corrupt` and replaced by an empty database instead.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };

        match store.initialize() {
            Err(e) if e.is_corrupt_database() => {
                warn!("Treating {} as empty history: {e}", store.path.display());
                set_aside(&store.path)?;
                store.initialize()?;
            }
            result => result?,
        }
        Ok(store)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize(&self) -> Result<()> {
        schema::initialize_schema(&self.connect()?)
    }

    fn connect(&self) -> Result<Connection> {
        let connection =
            Connection::open(&self.path).db_context("Failed to open database connection")?;
        connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;
        Ok(connection)
    }
}

impl SessionStore for SqliteStore {
    fn load_sessions(&self, owner_id: Option<&str>) -> Result<Vec<SessionRecord>> {
        session_queries::load_sessions(&self.connect()?, owner_id)
    }

    fn append_session(&self, record: &SessionRecord) -> Result<()> {
        session_queries::insert_session(&mut self.connect()?, record)
    }

    fn load_selection_history(&self, owner_id: Option<&str>) -> Result<Vec<SelectionCommitment>> {
        selection_queries::load_selections(&self.connect()?, owner_id)
    }

    fn append_selection_commitment(&self, commitment: &SelectionCommitment) -> Result<()> {
        selection_queries::insert_selection(&self.connect()?, commitment)
    }

    fn load_identity(&self) -> Result<Option<String>> {
        selection_queries::load_identity(&self.connect()?)
    }

    fn save_identity(&self, owner_id: &str) -> Result<()> {
        selection_queries::save_identity(&self.connect()?, owner_id)
    }
}
