//! Parameter structures for NexStep operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde and the optional JSON schema.
//! Interfaces wrap or convert into them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Times, dates and statuses arrive as strings and are parsed here, at the
//! boundary, so that the timeline builder and the classifier only ever see
//! valid values.

use jiff::civil::{Date, Time};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{NexstepError, Result},
    models::{FlightKind, TripStatus},
};

/// Parses a local time of day, accepting `HH:MM` and `HH:MM:SS`.
///
/// # Examples
///
/// ```rust
/// use jiff::civil::time;
/// use nexstep_core::params::parse_time;
///
/// assert_eq!(parse_time("time", "09:30")?, time(9, 30, 0, 0));
/// assert!(parse_time("time", "half past nine").is_err());
/// # Ok::<(), nexstep_core::NexstepError>(())
/// ```
pub fn parse_time(field: &str, input: &str) -> Result<Time> {
    let input = input.trim();
    Time::strptime("%H:%M", input)
        .or_else(|_| input.parse::<Time>())
        .map_err(|e| {
            NexstepError::invalid_input(field)
                .with_reason(format!("Invalid time '{input}': {e}. Expected HH:MM"))
        })
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, input: &str) -> Result<Date> {
    let input = input.trim();
    input.parse::<Date>().map_err(|e| {
        NexstepError::invalid_input(field)
            .with_reason(format!("Invalid date '{input}': {e}. Expected YYYY-MM-DD"))
    })
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NexstepError::invalid_input(field).with_reason("Must not be empty"));
    }
    Ok(())
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTrip {
    /// Name of the travelling client (required)
    pub client_name: String,
    /// Destination shown to the client (required)
    pub destination: String,
    /// Free-text date range, e.g. "12-19 May"
    pub dates: Option<String>,
    /// Initial status; defaults to draft
    pub status: Option<TripStatus>,
}

impl CreateTrip {
    pub fn validate(&self) -> Result<()> {
        require_text("client_name", &self.client_name)?;
        require_text("destination", &self.destination)
    }
}

/// Parameters for listing trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTrips {
    /// Only list trips in this status
    #[serde(default)]
    pub status: Option<TripStatus>,
    /// Case-insensitive client name filter
    #[serde(default)]
    pub client: Option<String>,
    /// Case-insensitive destination filter
    #[serde(default)]
    pub destination: Option<String>,
}

/// Parameters for a sparse trip update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateTrip {
    /// Trip ID to update (required)
    pub id: u64,
    pub client_name: Option<String>,
    pub destination: Option<String>,
    pub dates: Option<String>,
    /// New status ('draft', 'upcoming', 'active', 'completed', 'disrupted')
    pub status: Option<String>,
    pub issue_summary: Option<String>,
}

impl UpdateTrip {
    /// Validate the update and return the parsed status, if any.
    ///
    /// # Errors
    ///
    /// * `NexstepError::InvalidInput` - When the status string is unknown or
    ///   a provided name is blank
    pub fn validate(&self) -> Result<Option<TripStatus>> {
        if let Some(name) = &self.client_name {
            require_text("client_name", name)?;
        }
        if let Some(destination) = &self.destination {
            require_text("destination", destination)?;
        }

        self.status
            .as_deref()
            .map(|s| {
                s.parse::<TripStatus>().map_err(|_| {
                    NexstepError::invalid_input("status").with_reason(format!(
                        "Invalid status: {s}. Must be 'draft', 'upcoming', 'active', 'completed' or 'disrupted'"
                    ))
                })
            })
            .transpose()
    }
}

/// Parameters for a manual status change by an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetTripStatus {
    pub id: u64,
    /// New status ('draft', 'upcoming', 'active', 'completed', 'disrupted')
    pub status: String,
}

/// Parameters for permanently deleting a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteTrip {
    /// The ID of the trip to delete
    pub id: u64,
    /// Must be true; deletion cannot be undone
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for adding a day to a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddDay {
    pub trip_id: u64,
    /// 1-based day number
    pub day_number: u32,
    pub title: Option<String>,
}

impl AddDay {
    pub fn validate(&self) -> Result<()> {
        if self.day_number == 0 {
            return Err(NexstepError::invalid_input("day_number").with_reason("Day numbers start at 1"));
        }
        Ok(())
    }
}

/// Parameters for adding an activity to a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddActivity {
    pub day_id: u64,
    /// Local start time, HH:MM
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl AddActivity {
    /// Validate the activity and return its parsed start time.
    pub fn validate(&self) -> Result<Time> {
        require_text("title", &self.title)?;
        parse_time("time", &self.time)
    }
}

/// Parameters for a sparse activity update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateActivity {
    pub id: u64,
    pub title: Option<String>,
    /// Local start time, HH:MM
    pub time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// Set or clear the disruption marker
    pub disrupted: Option<bool>,
}

/// Parameters for adding a flight to a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddFlight {
    pub trip_id: u64,
    /// 'departure' or 'return'
    pub kind: FlightKind,
    /// Flight date, YYYY-MM-DD
    pub date: String,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl AddFlight {
    pub fn validate(&self) -> Result<Date> {
        parse_date("date", &self.date)
    }
}

/// Parameters for adding a hotel stay to a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddHotel {
    pub trip_id: u64,
    pub name: String,
    /// Check-in date, YYYY-MM-DD
    pub check_in: String,
    /// Check-out date, YYYY-MM-DD
    pub check_out: String,
    pub address: Option<String>,
}

impl AddHotel {
    /// Validate the stay and return its (check-in, check-out) dates.
    pub fn validate(&self) -> Result<(Date, Date)> {
        require_text("name", &self.name)?;
        let check_in = parse_date("check_in", &self.check_in)?;
        let check_out = parse_date("check_out", &self.check_out)?;
        if check_out < check_in {
            return Err(NexstepError::invalid_input("check_out")
                .with_reason(format!("Check-out {check_out} is before check-in {check_in}")));
        }
        Ok((check_in, check_out))
    }
}

/// Parameters for reporting a disruption against an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReportDisruption {
    /// Activity that cannot go ahead as planned
    pub activity_id: u64,
    /// Kind of disruption, e.g. "weather", "closure", "delay"
    pub disruption_type: String,
    /// What happened, in the agent's or client's words
    pub description: String,
}

impl ReportDisruption {
    pub fn validate(&self) -> Result<()> {
        require_text("disruption_type", &self.disruption_type)?;
        require_text("description", &self.description)
    }
}
