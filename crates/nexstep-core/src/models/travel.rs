//! Flight and hotel stay model definitions.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::FlightKind;

/// A flight leg attached to a trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    /// Unique identifier for the flight
    pub id: u64,

    /// ID of the parent trip
    pub trip_id: u64,

    /// Departure or return leg
    pub kind: FlightKind,

    /// Calendar date of the flight
    pub date: Date,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,

    /// Origin airport or city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Destination airport or city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// A hotel booking attached to a trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelStay {
    pub id: u64,
    pub trip_id: u64,
    pub name: String,
    pub check_in: Date,
    /// Never earlier than `check_in`
    pub check_out: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl HotelStay {
    /// Number of nights booked.
    pub fn nights(&self) -> i64 {
        i64::from(self.check_out.since(self.check_in).map_or(0, |span| span.get_days()))
    }
}
