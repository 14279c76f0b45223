//! Result wrapper types for displaying operation outcomes.
//!
//! Create, update and delete results share one layout for every itinerary
//! entity; the entity only has to say what it is called (see [`Resource`]).

use std::fmt;

use crate::{
    agency::{DisruptionReport, RefreshReport},
    models::{Activity, Day, Flight, HotelStay, Trip},
};

/// An entity that can appear in an operation result.
pub trait Resource: fmt::Display {
    /// Lower-case noun used in messages, e.g. "trip"
    const KIND: &'static str;

    fn id(&self) -> u64;

    /// Short human name used in delete confirmations.
    fn label(&self) -> String;
}

impl Resource for Trip {
    const KIND: &'static str = "trip";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        format!("{} to {}", self.client_name, self.destination)
    }
}

impl Resource for Day {
    const KIND: &'static str = "day";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        format!("Day {}", self.day_number)
    }
}

impl Resource for Activity {
    const KIND: &'static str = "activity";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}

impl Resource for Flight {
    const KIND: &'static str = "flight";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        format!("{} flight on {}", self.kind, self.date)
    }
}

impl Resource for HotelStay {
    const KIND: &'static str = "hotel stay";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Resource> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::KIND, self.resource.id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of changes made.
///
/// # Examples
///
/// ```rust
/// use jiff::civil::time;
/// use nexstep_core::{display::UpdateResult, models::Activity};
///
/// let activity = Activity {
///     id: 4,
///     day_id: 1,
///     title: "Tile museum".to_string(),
///     time: time(15, 30, 0, 0),
///     location: None,
///     notes: None,
///     disrupted: false,
///     position: 2,
/// };
///
/// let output = UpdateResult::with_changes(activity, vec!["Time set to 15:30".to_string()])
///     .to_string();
/// assert!(output.starts_with("Updated activity with ID: 4"));
/// assert!(output.contains("- Time set to 15:30"));
/// ```
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: Resource> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::KIND, self.resource.id())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Resource> fmt::Display for DeleteResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} '{}' (ID: {})",
            T::KIND,
            self.resource.label(),
            self.resource.id()
        )
    }
}

impl fmt::Display for DisruptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Disruption recorded for activity {} on trip {}",
            self.activity_id, self.trip.id
        )?;
        writeln!(f)?;

        match &self.notification {
            None => {
                let ids = self
                    .revised
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "Itinerary re-planned; revised activities: {ids}")?;
            }
            Some(notification) => writeln!(f, "**Notice**: {notification}")?,
        }

        writeln!(f)?;
        write!(f, "{}", self.trip)
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checked {} trip(s)", self.checked)?;
        writeln!(f)?;

        if self.outcomes.is_empty() && self.in_flight == 0 {
            return writeln!(f, "All trip statuses are up to date.");
        }
        for outcome in &self.outcomes {
            let marker = if outcome.is_success() { "✓" } else { "✗" };
            writeln!(f, "- {marker} {}", outcome.message())?;
        }
        if self.in_flight > 0 {
            writeln!(f)?;
            writeln!(f, "{} status write(s) still in progress.", self.in_flight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{FlightKind, TripStatus};

    fn trip() -> Trip {
        Trip {
            id: 7,
            client_name: "Grace Hopper".to_string(),
            destination: "Kyoto".to_string(),
            dates: None,
            status: TripStatus::Upcoming,
            issue_summary: None,
            days: vec![],
            flights: vec![],
            hotels: vec![],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_create_result_names_the_resource() {
        let flight = Flight {
            id: 3,
            trip_id: 7,
            kind: FlightKind::Return,
            date: date(2025, 5, 19),
            airline: Some("JL".to_string()),
            flight_number: Some("44".to_string()),
            origin: Some("KIX".to_string()),
            destination: Some("LHR".to_string()),
        };
        let output = CreateResult::new(flight).to_string();
        assert!(output.starts_with("Created flight with ID: 3"));
        assert!(output.contains("Return on 2025-05-19, JL 44, KIX → LHR"));
    }

    #[test]
    fn test_delete_result_uses_label() {
        let output = DeleteResult::new(trip()).to_string();
        assert_eq!(output, "Deleted trip 'Grace Hopper to Kyoto' (ID: 7)\n");
    }

    #[test]
    fn test_disruption_report_shows_notice_on_fallback() {
        let report = DisruptionReport {
            trip: trip(),
            activity_id: 12,
            revised: vec![],
            notification: Some("Could not re-plan around 'Boat tour'".to_string()),
        };
        let output = report.to_string();
        assert!(output.contains("**Notice**: Could not re-plan"));
        assert!(!report.reoptimized());
    }

    #[test]
    fn test_empty_refresh_report() {
        let report = RefreshReport {
            checked: 4,
            outcomes: vec![],
            in_flight: 0,
        };
        let output = report.to_string();
        assert!(output.contains("Checked 4 trip(s)"));
        assert!(output.contains("up to date"));
    }

    #[test]
    fn test_refresh_report_mentions_writes_in_progress() {
        let report = RefreshReport {
            checked: 2,
            outcomes: vec![],
            in_flight: 1,
        };
        let output = report.to_string();
        assert!(!output.contains("up to date"));
        assert!(output.contains("1 status write(s) still in progress"));
    }
}
