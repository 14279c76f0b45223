//! Status enumerations for trips and flights.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Persisted lifecycle status of a trip.
///
/// Automatic transitions only move forward: `Upcoming → Active →
/// Completed`, with `Disrupted` as a side branch of `Active` that is entered
/// by an explicit issue report. `Draft` is never left automatically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Trip is being drafted; automation leaves it alone
    #[default]
    Draft,

    /// Trip is booked and has not started yet
    Upcoming,

    /// Client is travelling
    Active,

    /// Trip is over
    Completed,

    /// An issue was reported against the trip
    Disrupted,
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(TripStatus::Draft),
            "upcoming" => Ok(TripStatus::Upcoming),
            "active" => Ok(TripStatus::Active),
            "completed" => Ok(TripStatus::Completed),
            "disrupted" => Ok(TripStatus::Disrupted),
            _ => Err(format!("Invalid trip status: {s}")),
        }
    }
}

impl TripStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Upcoming => "upcoming",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
            TripStatus::Disrupted => "disrupted",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nexstep_core::models::TripStatus;
    ///
    /// assert_eq!(TripStatus::Active.with_icon(), "➤ Active");
    /// assert_eq!(TripStatus::Completed.with_icon(), "✓ Completed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TripStatus::Draft => "✎ Draft",
            TripStatus::Upcoming => "○ Upcoming",
            TripStatus::Active => "➤ Active",
            TripStatus::Completed => "✓ Completed",
            TripStatus::Disrupted => "⚠ Disrupted",
        }
    }
}

/// Which leg of the trip a flight belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FlightKind {
    /// Outbound flight; its date anchors day 1 of the itinerary
    Departure,

    /// Homebound flight
    Return,
}

impl FromStr for FlightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "departure" | "outbound" => Ok(FlightKind::Departure),
            "return" | "inbound" => Ok(FlightKind::Return),
            _ => Err(format!("Invalid flight kind: {s}")),
        }
    }
}

impl FlightKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightKind::Departure => "departure",
            FlightKind::Return => "return",
        }
    }
}
