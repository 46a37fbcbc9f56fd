//! Key/value session store backed by a single JSON file.
//!
//! The file holds one JSON object whose keys play the role of device
//! key/value slots: `sessions`, `selections` and `identity`. Entries that
//! fail to parse are skipped on read and left untouched on append. A file
//! that is not a JSON object reads as empty and is moved aside on the next
//! write.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::{SessionStore, set_aside};
use crate::{
    error::{FileSystemResultExt, Result},
    models::{SelectionCommitment, SessionRecord},
};

const SESSIONS_KEY: &str = "sessions";
const SELECTIONS_KEY: &str = "selections";
const IDENTITY_KEY: &str = "identity";

/// JSON file implementation of [`SessionStore`].
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Opens the store at `path`, creating an empty file when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            std::fs::write(&path, "{}").fs_context(&path)?;
            debug!("Created key/value store at {}", path.display());
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).fs_context(&self.path),
        }
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Map::new());
        };
        Ok(parse_map(&contents).unwrap_or_else(|| {
            warn!(
                "Ignoring unreadable key/value store at {}",
                self.path.display()
            );
            Map::new()
        }))
    }

    /// Reads the map ahead of a write. An unreadable file is set aside first
    /// so the write does not replace its bytes.
    fn read_map_for_update(&self) -> Result<Map<String, Value>> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Map::new());
        };
        match parse_map(&contents) {
            Some(map) => Ok(map),
            None => {
                set_aside(&self.path)?;
                Ok(Map::new())
            }
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).fs_context(&tmp)?;
        std::fs::rename(&tmp, &self.path).fs_context(&self.path)
    }

    /// Reads every parsable entry of an array-valued key.
    fn read_entries<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let map = self.read_map()?;
        let entries = match map.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                warn!("Ignoring non-array value under key '{key}'");
                return Ok(Vec::new());
            }
        };

        Ok(entries
            .iter()
            .filter_map(|entry| match T::deserialize(entry) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping unreadable entry under key '{key}': {e}");
                    None
                }
            })
            .collect())
    }

    /// Appends one entry to an array-valued key, keeping existing entries
    /// verbatim.
    fn append_entry<T: Serialize>(&self, key: &str, entry: &T) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut map = self.read_map_for_update()?;
        let value = serde_json::to_value(entry)?;
        match map.get_mut(key) {
            Some(Value::Array(entries)) => entries.push(value),
            _ => {
                map.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
        self.write_map(&map)
    }
}

fn parse_map(contents: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => None,
    }
}

impl SessionStore for JsonStore {
    fn load_sessions(&self, owner_id: Option<&str>) -> Result<Vec<SessionRecord>> {
        let mut sessions: Vec<SessionRecord> = self.read_entries(SESSIONS_KEY)?;
        sessions.retain(|session| session.is_owned_by(owner_id));
        sessions.sort_by_key(|session| session.completed_at);
        Ok(sessions)
    }

    fn append_session(&self, record: &SessionRecord) -> Result<()> {
        self.append_entry(SESSIONS_KEY, record)
    }

    fn load_selection_history(&self, owner_id: Option<&str>) -> Result<Vec<SelectionCommitment>> {
        let mut selections: Vec<SelectionCommitment> = self.read_entries(SELECTIONS_KEY)?;
        if let Some(owner) = owner_id {
            selections.retain(|selection| selection.owner_id.as_deref() == Some(owner));
        }
        Ok(selections)
    }

    fn append_selection_commitment(&self, commitment: &SelectionCommitment) -> Result<()> {
        self.append_entry(SELECTIONS_KEY, commitment)
    }

    fn load_identity(&self) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(IDENTITY_KEY)
            .and_then(Value::as_str)
            .map(String::from))
    }

    fn save_identity(&self, owner_id: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut map = self.read_map_for_update()?;
        map.insert(IDENTITY_KEY.to_string(), Value::String(owner_id.to_string()));
        self.write_map(&map)
    }
}
