//! Builder for creating and configuring Routine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::tz::TimeZone;
use log::{debug, info};
use tokio::task;

use super::Routine;
use crate::{
    catalog::Catalog,
    clock::{Clock, SystemClock},
    error::{FileSystemResultExt, Result, RoutineError},
    planning::{RECENT_THRESHOLD_DAYS, RecencyPolicy},
    store::{Backend, SessionStore},
};

/// Builder for creating and configuring Routine instances.
#[derive(Clone)]
pub struct RoutineBuilder {
    backend: Backend,
    data_path: Option<PathBuf>,
    catalog: Option<Arc<Catalog>>,
    store: Option<Arc<dyn SessionStore>>,
    owner_id: Option<String>,
    recent_threshold_days: u32,
    time_zone: Option<TimeZone>,
    clock: Arc<dyn Clock>,
}

impl RoutineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend: Backend::default(),
            data_path: None,
            catalog: None,
            store: None,
            owner_id: None,
            recent_threshold_days: RECENT_THRESHOLD_DAYS,
            time_zone: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Selects the storage backend. Defaults to SQLite.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets a custom data file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/cadence/cadence.db` (or `cadence.json` for the JSON
    /// backend), falling back to `~/.local/share/cadence/`.
    pub fn with_data_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.data_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `catalog` instead of the built-in one.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Uses an already opened store; backend and data path are then ignored.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Acts for `owner_id` and stores it as the identity. Without an owner
    /// the stored identity is used, if any.
    pub fn with_owner(mut self, owner_id: Option<String>) -> Self {
        if owner_id.is_some() {
            self.owner_id = owner_id;
        }
        self
    }

    /// Overrides the number of days a performed optional step stays
    /// Recommended.
    pub fn with_recent_threshold_days(mut self, days: u32) -> Self {
        self.recent_threshold_days = days;
        self
    }

    /// Sets the zone used for calendar-day decisions. Defaults to the system
    /// zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Replaces the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the configured routine instance.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::InvalidInput` if the owner name is blank
    /// Returns `RoutineError::FileSystem` if the data path is invalid
    /// Returns `RoutineError::Database` if store initialization fails
    pub async fn build(self) -> Result<Routine> {
        let requested_owner = match self.owner_id {
            Some(name) => Some(validate_owner(&name)?),
            None => None,
        };

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(Catalog::builtin()?),
        };

        let store = match self.store {
            Some(store) => store,
            None => {
                let path = match self.data_path {
                    Some(path) => path,
                    None => Self::default_data_path(self.backend)?,
                };
                Self::open_store(self.backend, path).await?
            }
        };

        let identity_store = Arc::clone(&store);
        let (owner_id, returning_user) = task::spawn_blocking(move || {
            resolve_identity(identity_store.as_ref(), requested_owner)
        })
        .await
        .map_err(RoutineError::join)??;

        let policy = RecencyPolicy {
            recent_threshold_days: self.recent_threshold_days,
            time_zone: self.time_zone.unwrap_or_else(TimeZone::system),
        };

        debug!(
            "Routine ready: {} steps, threshold {} days, owner {:?}",
            catalog.len(),
            policy.recent_threshold_days,
            owner_id
        );

        Ok(Routine {
            catalog,
            store,
            owner_id,
            policy,
            clock: self.clock,
            returning_user,
        })
    }

    async fn open_store(backend: Backend, path: PathBuf) -> Result<Arc<dyn SessionStore>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).fs_context(parent)?;
        }

        info!("Opening {} store at {}", backend.as_str(), path.display());
        task::spawn_blocking(move || backend.open(&path))
            .await
            .map_err(RoutineError::join)?
    }

    /// Returns the default data path following XDG Base Directory
    /// specification.
    fn default_data_path(backend: Backend) -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file(backend.default_file_name())
            .map_err(|e| RoutineError::XdgDirectory(e.to_string()))
    }
}

impl Default for RoutineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_owner(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RoutineError::invalid_input("owner").with_reason("Name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Picks the effective owner and decides whether they are returning.
///
/// A requested owner replaces the stored identity. An owner counts as
/// returning when they already were the stored identity or have sessions.
fn resolve_identity(
    store: &dyn SessionStore,
    requested: Option<String>,
) -> Result<(Option<String>, bool)> {
    let stored = store.load_identity()?;

    let owner_id = match requested {
        Some(name) => {
            if stored.as_deref() != Some(name.as_str()) {
                store.save_identity(&name)?;
                info!("Saved identity {name}");
            }
            Some(name)
        }
        None => stored.clone(),
    };

    let returning_user = match owner_id.as_deref() {
        Some(owner) => {
            stored.as_deref() == Some(owner) || !store.load_sessions(Some(owner))?.is_empty()
        }
        None => false,
    };

    Ok((owner_id, returning_user))
}
