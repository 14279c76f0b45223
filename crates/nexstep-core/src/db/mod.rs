//! Database operations and SQLite management for trips and itineraries.
//!
//! This module provides the low-level persistence operations behind the
//! [`Agency`](crate::agency::Agency) facade. It owns the SQLite connection,
//! the embedded schema, and specialized query interfaces for trips, itinerary
//! days and activities, and travel bookings (flights and hotel stays).
//!
//! Dates, times and timestamps are stored as their ISO 8601 text forms and
//! parsed back on read; a row that does not decode is reported as a database
//! error rather than silently skipped.

use std::{path::Path, str::FromStr, sync::Arc};

use jiff::Timestamp;
use rusqlite::{types::Type, Connection};

use crate::{
    clock::{SystemClock, TimeSource},
    error::{DatabaseResultExt, Result},
};

pub mod itinerary_queries;
pub mod migrations;
pub mod travel_queries;
pub mod trip_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    time_source: Arc<dyn TimeSource>,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self {
            connection,
            time_source: Arc::new(SystemClock),
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Stamps `created_at`/`updated_at` from `source` instead of the system
    /// clock.
    pub fn with_time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.time_source = source;
        self
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }
}

/// Reads a text column and parses it, mapping parse failures to a
/// conversion error on that column.
pub(crate) fn parse_column<T>(row: &rusqlite::Row, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text: String = row.get(index)?;
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("Invalid value '{text}': {e}").into(),
        )
    })
}

/// Reads an `INTEGER PRIMARY KEY` style column as an ID.
pub(crate) fn id_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(index)? as u64)
}
