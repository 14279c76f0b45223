//! Trip CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{id_column, parse_column};
use crate::{
    error::{DatabaseResultExt, NexstepError, Result},
    models::{Trip, TripFilter, TripStatus, UpdateTripRequest},
};

const TRIP_COLUMNS: &str =
    "id, client_name, destination, dates, status, issue_summary, created_at, updated_at";
const INSERT_TRIP_SQL: &str = "INSERT INTO trips (client_name, destination, dates, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_TRIP_SQL: &str = "SELECT id, client_name, destination, dates, status, issue_summary, created_at, updated_at FROM trips WHERE id = ?1";
const CHECK_TRIP_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)";
const SELECT_TRIP_STATUS_SQL: &str = "SELECT status FROM trips WHERE id = ?1";
const UPDATE_TRIP_SQL: &str = "UPDATE trips SET client_name = ?1, destination = ?2, dates = ?3, status = ?4, issue_summary = ?5, updated_at = ?6 WHERE id = ?7";
const UPDATE_TRIP_STATUS_CAS_SQL: &str =
    "UPDATE trips SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4";
const DELETE_TRIP_SQL: &str = "DELETE FROM trips WHERE id = ?1";

impl super::Database {
    /// Helper function to construct a Trip (without relations) from a row
    fn build_trip_from_row(row: &rusqlite::Row) -> rusqlite::Result<Trip> {
        Ok(Trip {
            id: id_column(row, 0)?,
            client_name: row.get(1)?,
            destination: row.get(2)?,
            dates: row.get(3)?,
            status: parse_column::<TripStatus>(row, 4)?,
            issue_summary: row.get(5)?,
            created_at: parse_column::<Timestamp>(row, 6)?,
            updated_at: parse_column::<Timestamp>(row, 7)?,
            days: Vec::new(),
            flights: Vec::new(),
            hotels: Vec::new(),
        })
    }

    /// Loads days (with activities), flights and hotel stays into `trip`.
    fn load_trip_relations(&self, trip: &mut Trip) -> Result<()> {
        trip.days = self.get_days(trip.id)?;
        trip.flights = self.get_flights(trip.id)?;
        trip.hotels = self.get_hotels(trip.id)?;
        Ok(())
    }

    /// Creates a new trip. The status defaults to draft.
    pub fn create_trip(
        &mut self,
        client_name: &str,
        destination: &str,
        dates: Option<&str>,
        status: Option<TripStatus>,
    ) -> Result<Trip> {
        let now = self.now();
        let now_str = now.to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = status.unwrap_or_default();

        tx.execute(
            INSERT_TRIP_SQL,
            params![client_name, destination, dates, status.as_str(), &now_str, &now_str],
        )
        .db_context("Failed to insert trip")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Trip {
            id,
            client_name: client_name.into(),
            destination: destination.into(),
            dates: dates.map(String::from),
            status,
            issue_summary: None,
            days: Vec::new(),
            flights: Vec::new(),
            hotels: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a trip by its ID with days, activities, flights and hotel
    /// stays eagerly loaded.
    pub fn get_trip(&self, id: u64) -> Result<Option<Trip>> {
        let mut trip = self
            .connection
            .query_row(SELECT_TRIP_SQL, params![id as i64], Self::build_trip_from_row)
            .optional()
            .db_context("Failed to query trip")?;

        if let Some(ref mut trip) = trip {
            self.load_trip_relations(trip)?;
        }

        Ok(trip)
    }

    /// Lists trips, newest first, with optional filtering. Relations are
    /// eagerly loaded for every trip.
    pub fn list_trips(&self, filter: Option<&TripFilter>) -> Result<Vec<Trip>> {
        let mut query = format!("SELECT {TRIP_COLUMNS} FROM trips");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(ref status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }

            if let Some(ref client) = f.client_contains {
                conditions.push("client_name LIKE ?");
                params_vec.push(Box::new(format!("%{client}%")));
            }

            if let Some(ref destination) = f.destination_contains {
                conditions.push("destination LIKE ?");
                params_vec.push(Box::new(format!("%{destination}%")));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut trips = stmt
            .query_map(&params_refs[..], Self::build_trip_from_row)
            .db_context("Failed to query trips")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch trips")?;

        for trip in &mut trips {
            self.load_trip_relations(trip)?;
        }

        Ok(trips)
    }

    /// Applies a sparse patch and returns the updated trip.
    ///
    /// # Errors
    ///
    /// * `NexstepError::TripNotFound` - When no trip has the given ID
    pub fn update_trip(&mut self, id: u64, request: &UpdateTripRequest) -> Result<Trip> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(SELECT_TRIP_SQL, params![id as i64], Self::build_trip_from_row)
            .optional()
            .db_context("Failed to query trip")?
            .ok_or(NexstepError::TripNotFound { id })?;

        let client_name = request.client_name.as_deref().unwrap_or(&current.client_name);
        let destination = request.destination.as_deref().unwrap_or(&current.destination);
        let dates = request.dates.as_deref().or(current.dates.as_deref());
        let status = request.status.unwrap_or(current.status);
        let issue_summary = request
            .issue_summary
            .as_deref()
            .or(current.issue_summary.as_deref());

        tx.execute(
            UPDATE_TRIP_SQL,
            params![
                client_name,
                destination,
                dates,
                status.as_str(),
                issue_summary,
                now.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update trip")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_trip(id)?.ok_or(NexstepError::TripNotFound { id })
    }

    /// Sets the trip's status to `to` only if it is still `from`.
    ///
    /// # Errors
    ///
    /// * `NexstepError::TripNotFound` - When no trip has the given ID
    /// * `NexstepError::StatusConflict` - When the stored status is no longer
    ///   `from`
    pub fn transition_trip_status(
        &mut self,
        id: u64,
        from: TripStatus,
        to: TripStatus,
    ) -> Result<Trip> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows_affected = tx
            .execute(
                UPDATE_TRIP_STATUS_CAS_SQL,
                params![to.as_str(), now.to_string(), id as i64, from.as_str()],
            )
            .db_context("Failed to update trip status")?;

        if rows_affected == 0 {
            let actual = tx
                .query_row(SELECT_TRIP_STATUS_SQL, params![id as i64], |row| {
                    parse_column::<TripStatus>(row, 0)
                })
                .optional()
                .db_context("Failed to check trip status")?;

            return Err(match actual {
                None => NexstepError::TripNotFound { id },
                Some(actual) => NexstepError::StatusConflict {
                    id,
                    expected: from,
                    actual,
                },
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_trip(id)?.ok_or(NexstepError::TripNotFound { id })
    }

    /// Permanently deletes a trip together with its days, activities,
    /// flights and hotel stays. This operation cannot be undone.
    pub fn delete_trip(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TRIP_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check trip existence")?;

        if !exists {
            return Err(NexstepError::TripNotFound { id });
        }

        // Relations go with it through ON DELETE CASCADE
        tx.execute(DELETE_TRIP_SQL, params![id as i64])
            .db_context("Failed to delete trip")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
