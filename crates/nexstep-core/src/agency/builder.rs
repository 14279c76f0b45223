//! Builder for creating and configuring Agency instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::tz::TimeZone;
use log::debug;
use tokio::task;

use super::Agency;
use crate::{
    clock::{SystemClock, TimeSource},
    db::Database,
    error::{NexstepError, Result},
    reoptimize::{Reoptimizer, Unconfigured},
};

/// Builder for creating and configuring Agency instances.
#[derive(Clone, Default)]
pub struct AgencyBuilder {
    database_path: Option<PathBuf>,
    time_zone: Option<TimeZone>,
    time_zone_name: Option<String>,
    time_source: Option<Arc<dyn TimeSource>>,
    reoptimizer: Option<Arc<dyn Reoptimizer>>,
}

impl AgencyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/nexstep/nexstep.db` or
    /// `~/.local/share/nexstep/nexstep.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Places activities in `time_zone` instead of the system zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Like [`with_time_zone`](Self::with_time_zone), by IANA name. The name
    /// is resolved in [`build`](Self::build).
    pub fn with_time_zone_name<S: Into<String>>(mut self, name: Option<S>) -> Self {
        if let Some(name) = name {
            self.time_zone_name = Some(name.into());
        }
        self
    }

    /// Reads "now" from `source` instead of the system clock.
    pub fn with_time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(source);
        self
    }

    /// Hands disruption reports to `reoptimizer`. Without one, every report
    /// falls back to marking the activity disrupted.
    pub fn with_reoptimizer(mut self, reoptimizer: Arc<dyn Reoptimizer>) -> Self {
        self.reoptimizer = Some(reoptimizer);
        self
    }

    /// Builds the configured agency instance.
    ///
    /// # Errors
    ///
    /// Returns `NexstepError::Configuration` if the time zone name is unknown
    /// Returns `NexstepError::FileSystem` if the database path is invalid
    /// Returns `NexstepError::Database` if database initialization fails
    pub async fn build(self) -> Result<Agency> {
        let time_zone = match (self.time_zone, self.time_zone_name) {
            (Some(time_zone), _) => time_zone,
            (None, Some(name)) => TimeZone::get(&name).map_err(|e| NexstepError::Configuration {
                message: format!("Unknown time zone '{name}': {e}"),
            })?,
            (None, None) => TimeZone::system(),
        };

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| NexstepError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), NexstepError>(())
        })
        .await
        .map_err(NexstepError::join_error)??;

        debug!("Agency ready with database {}", db_path.display());

        Ok(Agency::new(
            db_path,
            time_zone,
            self.time_source.unwrap_or_else(|| Arc::new(SystemClock)),
            self.reoptimizer.unwrap_or_else(|| Arc::new(Unconfigured)),
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("nexstep")
            .place_data_file("nexstep.db")
            .map_err(|e| NexstepError::XdgDirectory(e.to_string()))
    }
}
