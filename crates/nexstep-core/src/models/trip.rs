//! Trip model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Activity, Day, Flight, FlightKind, HotelStay, TripStatus};

/// A client's multi-day travel plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    /// Unique identifier for the trip
    pub id: u64,

    /// Name of the travelling client
    pub client_name: String,

    /// Destination shown to the client
    pub destination: String,

    /// Free-text date range ("12–19 May")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,

    /// Persisted lifecycle status
    #[serde(default)]
    pub status: TripStatus,

    /// Summary of the most recently reported issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_summary: Option<String>,

    /// Days ordered by day number (eagerly loaded)
    #[serde(default)]
    pub days: Vec<Day>,

    /// Flights ordered by date
    #[serde(default)]
    pub flights: Vec<Flight>,

    /// Hotel stays ordered by check-in date
    #[serde(default)]
    pub hotels: Vec<HotelStay>,

    /// Timestamp when the trip was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the trip was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Trip {
    /// Earliest departure flight date. Day 1 of the itinerary falls on it.
    pub fn anchor_date(&self) -> Option<Date> {
        self.flight_dates(FlightKind::Departure).min()
    }

    /// Latest return flight date.
    pub fn return_date(&self) -> Option<Date> {
        self.flight_dates(FlightKind::Return).max()
    }

    /// Whether any departure flight is dated on or before `date`.
    pub fn departs_by(&self, date: Date) -> bool {
        self.flight_dates(FlightKind::Departure).any(|d| d <= date)
    }

    fn flight_dates(&self, kind: FlightKind) -> impl Iterator<Item = Date> + '_ {
        self.flights
            .iter()
            .filter(move |f| f.kind == kind)
            .map(|f| f.date)
    }

    /// All activities across all days, in day order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days.iter().flat_map(|day| day.activities.iter())
    }

    /// Total number of activities across all days.
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    /// Finds an activity by ID together with its day.
    pub fn find_activity(&self, activity_id: u64) -> Option<(&Day, &Activity)> {
        self.days.iter().find_map(|day| {
            day.activities
                .iter()
                .find(|a| a.id == activity_id)
                .map(|a| (day, a))
        })
    }
}
