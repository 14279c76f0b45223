//! Day and activity CRUD operations, plus the transactional write behind a
//! disruption report.

use jiff::{civil::Time, Timestamp};
use rusqlite::{params, OptionalExtension, Transaction};

use super::{id_column, parse_column};
use crate::{
    error::{DatabaseResultExt, NexstepError, Result},
    models::{Activity, Day, TripStatus, UpdateActivityRequest},
    reoptimize::ActivityRevision,
};

const CHECK_TRIP_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)";
const CHECK_DAY_NUMBER_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM days WHERE trip_id = ?1 AND day_number = ?2)";
const INSERT_DAY_SQL: &str = "INSERT INTO days (trip_id, day_number, title) VALUES (?1, ?2, ?3)";
const SELECT_DAYS_BY_TRIP_SQL: &str =
    "SELECT id, trip_id, day_number, title FROM days WHERE trip_id = ?1 ORDER BY day_number";
const SELECT_DAY_TRIP_SQL: &str = "SELECT trip_id FROM days WHERE id = ?1";
const DELETE_DAY_SQL: &str = "DELETE FROM days WHERE id = ?1";

const ACTIVITY_COLUMNS: &str = "id, day_id, title, time, location, notes, disrupted, position";
const GET_NEXT_POSITION_SQL: &str =
    "SELECT COALESCE(MAX(position), -1) + 1 FROM activities WHERE day_id = ?1";
const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (day_id, title, time, location, notes, disrupted, position) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)";
const UPDATE_ACTIVITY_SQL: &str = "UPDATE activities SET title = ?1, time = ?2, location = ?3, notes = ?4, disrupted = ?5 WHERE id = ?6";
const MARK_ACTIVITY_DISRUPTED_SQL: &str = "UPDATE activities SET disrupted = 1 WHERE id = ?1";
const DELETE_ACTIVITY_SQL: &str = "DELETE FROM activities WHERE id = ?1";
const CLOSE_POSITION_GAP_SQL: &str =
    "UPDATE activities SET position = position - 1 WHERE day_id = ?1 AND position > ?2";
const SELECT_ACTIVITY_TRIP_SQL: &str =
    "SELECT days.trip_id FROM activities JOIN days ON days.id = activities.day_id WHERE activities.id = ?1";
const SELECT_ACTIVITY_IDS_BY_TIME_SQL: &str =
    "SELECT id FROM activities WHERE day_id = ?1 ORDER BY time, position";
const UPDATE_ACTIVITY_POSITION_SQL: &str = "UPDATE activities SET position = ?1 WHERE id = ?2";

const UPDATE_TRIP_TIMESTAMP_SQL: &str = "UPDATE trips SET updated_at = ?1 WHERE id = ?2";
const RECORD_TRIP_ISSUE_SQL: &str =
    "UPDATE trips SET status = ?1, issue_summary = ?2, updated_at = ?3 WHERE id = ?4";

/// Time of day as stored: `HH:MM` for whole minutes, `HH:MM:SS` otherwise.
/// Both sort correctly as text.
fn time_text(time: Time) -> String {
    if time.second() == 0 && time.subsec_nanosecond() == 0 {
        time.strftime("%H:%M").to_string()
    } else {
        time.strftime("%H:%M:%S").to_string()
    }
}

fn parse_time_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Time> {
    let text: String = row.get(index)?;
    crate::params::parse_time("time", &text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn touch_trip(tx: &Transaction, trip_id: u64, now: Timestamp) -> Result<()> {
    tx.execute(
        UPDATE_TRIP_TIMESTAMP_SQL,
        params![now.to_string(), trip_id as i64],
    )
    .db_context("Failed to update trip timestamp")?;
    Ok(())
}

fn activity_trip_id(tx: &Transaction, activity_id: u64) -> Result<Option<u64>> {
    tx.query_row(SELECT_ACTIVITY_TRIP_SQL, params![activity_id as i64], |row| id_column(row, 0))
        .optional()
        .db_context("Failed to look up activity")
}

/// Re-numbers positions of a day in time order.
fn renumber_day(tx: &Transaction, day_id: u64) -> Result<()> {
    let mut stmt = tx
        .prepare(SELECT_ACTIVITY_IDS_BY_TIME_SQL)
        .db_context("Failed to prepare query")?;
    let ids = stmt
        .query_map(params![day_id as i64], |row| row.get::<_, i64>(0))
        .db_context("Failed to query activities")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch activities")?;
    drop(stmt);

    for (position, id) in ids.into_iter().enumerate() {
        tx.execute(UPDATE_ACTIVITY_POSITION_SQL, params![position as i64, id])
            .db_context("Failed to reorder activities")?;
    }
    Ok(())
}

impl super::Database {
    /// Helper function to construct an Activity from a database row
    fn build_activity_from_row(row: &rusqlite::Row) -> rusqlite::Result<Activity> {
        Ok(Activity {
            id: id_column(row, 0)?,
            day_id: id_column(row, 1)?,
            title: row.get(2)?,
            time: parse_time_column(row, 3)?,
            location: row.get(4)?,
            notes: row.get(5)?,
            disrupted: row.get(6)?,
            position: row.get::<_, i64>(7)? as u32,
        })
    }

    /// Adds a numbered day to a trip.
    ///
    /// # Errors
    ///
    /// * `NexstepError::TripNotFound` - When the trip doesn't exist
    /// * `NexstepError::InvalidInput` - When the trip already has that day
    pub fn add_day(&mut self, trip_id: u64, day_number: u32, title: Option<&str>) -> Result<Day> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let trip_exists: bool = tx
            .query_row(CHECK_TRIP_EXISTS_SQL, params![trip_id as i64], |row| row.get(0))
            .db_context("Failed to check trip existence")?;
        if !trip_exists {
            return Err(NexstepError::TripNotFound { id: trip_id });
        }

        let taken: bool = tx
            .query_row(
                CHECK_DAY_NUMBER_SQL,
                params![trip_id as i64, i64::from(day_number)],
                |row| row.get(0),
            )
            .db_context("Failed to check day number")?;
        if taken {
            return Err(NexstepError::invalid_input("day_number")
                .with_reason(format!("Trip {trip_id} already has day {day_number}")));
        }

        tx.execute(
            INSERT_DAY_SQL,
            params![trip_id as i64, i64::from(day_number), title],
        )
        .db_context("Failed to insert day")?;
        let id = tx.last_insert_rowid() as u64;

        touch_trip(&tx, trip_id, now)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Day {
            id,
            trip_id,
            day_number,
            title: title.map(String::from),
            activities: Vec::new(),
        })
    }

    /// Retrieves all days for a trip, ordered by day number, with their
    /// activities in position order.
    pub fn get_days(&self, trip_id: u64) -> Result<Vec<Day>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DAYS_BY_TRIP_SQL)
            .db_context("Failed to prepare query")?;

        let mut days = stmt
            .query_map(params![trip_id as i64], |row| {
                Ok(Day {
                    id: id_column(row, 0)?,
                    trip_id: id_column(row, 1)?,
                    day_number: row.get::<_, i64>(2)? as u32,
                    title: row.get(3)?,
                    activities: Vec::new(),
                })
            })
            .db_context("Failed to query days")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch days")?;

        for day in &mut days {
            day.activities = self.get_activities(day.id)?;
        }

        Ok(days)
    }

    /// Deletes a day and its activities.
    pub fn delete_day(&mut self, id: u64) -> Result<()> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let trip_id = tx
            .query_row(SELECT_DAY_TRIP_SQL, params![id as i64], |row| id_column(row, 0))
            .optional()
            .db_context("Failed to look up day")?
            .ok_or(NexstepError::DayNotFound { id })?;

        tx.execute(DELETE_DAY_SQL, params![id as i64])
            .db_context("Failed to delete day")?;
        touch_trip(&tx, trip_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Appends an activity to a day.
    ///
    /// # Errors
    ///
    /// * `NexstepError::DayNotFound` - When the day doesn't exist
    pub fn add_activity(
        &mut self,
        day_id: u64,
        time: Time,
        title: &str,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Activity> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let trip_id = tx
            .query_row(SELECT_DAY_TRIP_SQL, params![day_id as i64], |row| id_column(row, 0))
            .optional()
            .db_context("Failed to look up day")?
            .ok_or(NexstepError::DayNotFound { id: day_id })?;

        let position: i64 = tx
            .query_row(GET_NEXT_POSITION_SQL, params![day_id as i64], |row| row.get(0))
            .db_context("Failed to get next activity position")?;

        tx.execute(
            INSERT_ACTIVITY_SQL,
            params![day_id as i64, title, time_text(time), location, notes, position],
        )
        .db_context("Failed to insert activity")?;
        let id = tx.last_insert_rowid() as u64;

        touch_trip(&tx, trip_id, now)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Activity {
            id,
            day_id,
            title: title.into(),
            time,
            location: location.map(String::from),
            notes: notes.map(String::from),
            disrupted: false,
            position: position as u32,
        })
    }

    /// Retrieves the activities of a day in position order.
    pub fn get_activities(&self, day_id: u64) -> Result<Vec<Activity>> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE day_id = ?1 ORDER BY position"
        );
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let activities = stmt
            .query_map(params![day_id as i64], Self::build_activity_from_row)
            .db_context("Failed to query activities")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch activities")?;

        Ok(activities)
    }

    /// Retrieves a single activity by ID.
    pub fn get_activity(&self, id: u64) -> Result<Option<Activity>> {
        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1");
        self.connection
            .query_row(&query, params![id as i64], Self::build_activity_from_row)
            .optional()
            .db_context("Failed to query activity")
    }

    /// ID of the trip an activity belongs to.
    pub fn get_activity_trip_id(&self, id: u64) -> Result<Option<u64>> {
        self.connection
            .query_row(SELECT_ACTIVITY_TRIP_SQL, params![id as i64], |row| id_column(row, 0))
            .optional()
            .db_context("Failed to look up activity")
    }

    /// Applies a sparse patch and returns the updated activity.
    pub fn update_activity(&mut self, id: u64, request: &UpdateActivityRequest) -> Result<Activity> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1");
        let current = tx
            .query_row(&query, params![id as i64], Self::build_activity_from_row)
            .optional()
            .db_context("Failed to query activity")?
            .ok_or(NexstepError::ActivityNotFound { id })?;

        let updated = Activity {
            title: request.title.clone().unwrap_or(current.title),
            time: request.time.unwrap_or(current.time),
            location: request.location.clone().or(current.location),
            notes: request.notes.clone().or(current.notes),
            disrupted: request.disrupted.unwrap_or(current.disrupted),
            ..current
        };

        tx.execute(
            UPDATE_ACTIVITY_SQL,
            params![
                &updated.title,
                time_text(updated.time),
                updated.location.as_deref(),
                updated.notes.as_deref(),
                updated.disrupted,
                id as i64
            ],
        )
        .db_context("Failed to update activity")?;

        if let Some(trip_id) = activity_trip_id(&tx, id)? {
            touch_trip(&tx, trip_id, now)?;
        }
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Deletes an activity and closes the gap in its day's positions.
    pub fn delete_activity(&mut self, id: u64) -> Result<()> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1");
        let activity = tx
            .query_row(&query, params![id as i64], Self::build_activity_from_row)
            .optional()
            .db_context("Failed to query activity")?
            .ok_or(NexstepError::ActivityNotFound { id })?;
        let trip_id = activity_trip_id(&tx, id)?;

        tx.execute(DELETE_ACTIVITY_SQL, params![id as i64])
            .db_context("Failed to delete activity")?;
        tx.execute(
            CLOSE_POSITION_GAP_SQL,
            params![activity.day_id as i64, i64::from(activity.position)],
        )
        .db_context("Failed to reorder activities")?;

        if let Some(trip_id) = trip_id {
            touch_trip(&tx, trip_id, now)?;
        }
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Records a reported issue in one transaction: the trip becomes
    /// disrupted with `issue_summary`, then either every revision is applied
    /// (and the affected days re-ordered by time), or, when there are none,
    /// `activity_id` is marked disrupted.
    ///
    /// Nothing is written if any revision names an activity that does not
    /// belong to the trip.
    pub fn record_disruption(
        &mut self,
        trip_id: u64,
        activity_id: u64,
        issue_summary: &str,
        revisions: &[ActivityRevision],
    ) -> Result<()> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(
                RECORD_TRIP_ISSUE_SQL,
                params![
                    TripStatus::Disrupted.as_str(),
                    issue_summary,
                    now.to_string(),
                    trip_id as i64
                ],
            )
            .db_context("Failed to record trip issue")?;
        if rows == 0 {
            return Err(NexstepError::TripNotFound { id: trip_id });
        }

        if revisions.is_empty() {
            if activity_trip_id(&tx, activity_id)? != Some(trip_id) {
                return Err(NexstepError::ActivityNotFound { id: activity_id });
            }
            tx.execute(MARK_ACTIVITY_DISRUPTED_SQL, params![activity_id as i64])
                .db_context("Failed to mark activity disrupted")?;
            tx.commit().db_context("Failed to commit transaction")?;
            return Ok(());
        }

        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1");
        let mut touched_days = Vec::new();
        for revision in revisions {
            if activity_trip_id(&tx, revision.id)? != Some(trip_id) {
                return Err(NexstepError::ActivityNotFound { id: revision.id });
            }
            let current = tx
                .query_row(&query, params![revision.id as i64], Self::build_activity_from_row)
                .db_context("Failed to query activity")?;

            // A revised activity is a fresh plan, so it is no longer disrupted
            tx.execute(
                UPDATE_ACTIVITY_SQL,
                params![
                    revision.title.as_deref().unwrap_or(&current.title),
                    time_text(revision.time.unwrap_or(current.time)),
                    revision.location.as_deref().or(current.location.as_deref()),
                    revision.notes.as_deref().or(current.notes.as_deref()),
                    false,
                    revision.id as i64
                ],
            )
            .db_context("Failed to apply activity revision")?;

            if !touched_days.contains(&current.day_id) {
                touched_days.push(current.day_id);
            }
        }

        for day_id in touched_days {
            renumber_day(&tx, day_id)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
