//! High-level agency API for managing trips and driving their status.
//!
//! This module provides the main [`Agency`] interface. The agency sits
//! between the interfaces (CLI, MCP) and the database, and wires the
//! time-derived components (timeline, classifier, lifecycle) to persisted
//! trips.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │   (handlers)    │───▶│ (trip_ops,      │───▶│   (via db/)     │
//! │                 │    │  itinerary_ops, │    │                 │
//! │                 │    │  status_ops,    │    │                 │
//! │                 │    │  disruption_ops)│    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!     Display wrappers     Business logic        Data persistence
//! ```
//!
//! Every database operation opens its own connection on a blocking task, so
//! an `Agency` is cheap to clone and safe to share between tasks.
//!
//! # Usage Examples
//!
//! ```rust
//! use nexstep_core::{params::CreateTrip, AgencyBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let agency = AgencyBuilder::new()
//!     .with_database_path(Some("/tmp/nexstep-example.db"))
//!     .build()
//!     .await?;
//!
//! let trip = agency
//!     .create_trip(&CreateTrip {
//!         client_name: "Ada Lovelace".to_string(),
//!         destination: "Lisbon".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{trip}");
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use jiff::{tz::TimeZone, Timestamp};
use tokio::task;

pub mod builder;
pub mod disruption_ops;
pub mod handlers;
pub mod itinerary_ops;
pub mod status_ops;
pub mod trip_ops;


pub use builder::AgencyBuilder;
pub use disruption_ops::DisruptionReport;
pub use status_ops::{RefreshReport, StatusSession};

use crate::{
    clock::TimeSource,
    db::Database,
    error::{NexstepError, Result},
    lifecycle::TripStore,
    models::{Trip, TripStatus},
    reoptimize::Reoptimizer,
};

/// Main agency interface for managing trips.
#[derive(Clone)]
pub struct Agency {
    pub(crate) db_path: PathBuf,
    time_zone: TimeZone,
    time_source: Arc<dyn TimeSource>,
    reoptimizer: Arc<dyn Reoptimizer>,
}

impl Agency {
    pub(crate) fn new(
        db_path: PathBuf,
        time_zone: TimeZone,
        time_source: Arc<dyn TimeSource>,
        reoptimizer: Arc<dyn Reoptimizer>,
    ) -> Self {
        Self {
            db_path,
            time_zone,
            time_source,
            reoptimizer,
        }
    }

    /// Time zone activities are placed in.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Current instant according to the configured time source.
    pub fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    pub fn time_source(&self) -> Arc<dyn TimeSource> {
        self.time_source.clone()
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Runs `operation` against a fresh connection on a blocking task.
    pub(crate) async fn with_database<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let time_source = self.time_source.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?.with_time_source(time_source);
            operation(&mut db)
        })
        .await
        .map_err(NexstepError::join_error)?
    }
}

#[async_trait]
impl TripStore for Agency {
    async fn transition_status(&self, trip_id: u64, from: TripStatus, to: TripStatus) -> Result<Trip> {
        self.with_database(move |db| db.transition_trip_status(trip_id, from, to))
            .await
    }
}
