//! Persistence boundary for sessions, selections and identity.
//!
//! The core only needs append and read-all operations, expressed by the
//! [`SessionStore`] trait. Two interchangeable backends implement it:
//!
//! - [`SqliteStore`]: table-backed storage in a SQLite file
//! - [`JsonStore`]: a local key/value file with one JSON value per key
//!
//! Which one is used is decided by configuration ([`Backend`]), never by the
//! planning or walk-through logic.
//!
//! # Corrupt data
//!
//! Stored history that cannot be parsed is treated as absent: the affected
//! records are skipped (SQLite) or the affected key reads as empty (JSON) and
//! a warning is logged. Reads never fail because of bad content alone.
//!
//! A file that is unreadable as a whole is renamed to `<name>.corrupt` and
//! replaced by an empty store before anything is written, so the original
//! bytes are kept for inspection.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use log::warn;

use crate::{
    error::{FileSystemResultExt, Result},
    models::{SelectionCommitment, SessionRecord},
};

pub mod json;
pub mod sqlite;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

/// Append-only storage used by the planning engine and walk-through.
pub trait SessionStore: Send + Sync {
    /// Loads every session, restricted to `owner_id` when one is given.
    fn load_sessions(&self, owner_id: Option<&str>) -> Result<Vec<SessionRecord>>;

    /// Appends a completed session.
    fn append_session(&self, record: &SessionRecord) -> Result<()>;

    /// Loads the selection log, restricted to `owner_id` when one is given.
    fn load_selection_history(&self, owner_id: Option<&str>) -> Result<Vec<SelectionCommitment>>;

    /// Appends a selection commitment to the log.
    fn append_selection_commitment(&self, commitment: &SelectionCommitment) -> Result<()>;

    /// Loads the stored owner identity, if any.
    fn load_identity(&self) -> Result<Option<String>>;

    /// Stores the owner identity, replacing any previous one.
    fn save_identity(&self, owner_id: &str) -> Result<()>;
}

/// Path an unreadable store file is moved to.
pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}

/// Moves an unreadable store file out of the way, replacing any earlier
/// `.corrupt` copy.
pub(crate) fn set_aside(path: &Path) -> Result<PathBuf> {
    let target = corrupt_path(path);
    std::fs::rename(path, &target).fs_context(path)?;
    warn!(
        "Moved unreadable store {} to {}",
        path.display(),
        target.display()
    );
    Ok(target)
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Table-backed SQLite database
    #[default]
    Sqlite,

    /// Key/value JSON file
    Json,
}

impl Backend {
    /// File name used under the data directory when no path is given.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "cadence.db",
            Backend::Json => "cadence.json",
        }
    }

    /// Opens the backend at `path`, initializing it when needed.
    pub fn open(&self, path: &Path) -> Result<Arc<dyn SessionStore>> {
        Ok(match self {
            Backend::Sqlite => Arc::new(SqliteStore::open(path)?),
            Backend::Json => Arc::new(JsonStore::open(path)?),
        })
    }

    /// Lowercase name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Json => "json",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Backend::Sqlite),
            "json" => Ok(Backend::Json),
            _ => Err(format!("Invalid backend: {s}")),
        }
    }
}
