//! Trip summary types for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Trip, TripStatus};

/// Summary information about a trip with itinerary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: u64,
    pub client_name: String,
    pub destination: String,
    pub dates: Option<String>,
    pub status: TripStatus,
    pub issue_summary: Option<String>,
    pub updated_at: Timestamp,
    /// Number of itinerary days
    pub day_count: u32,
    /// Number of activities across all days
    pub activity_count: u32,
    /// Number of activities carrying a disruption marker
    pub disrupted_count: u32,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        let disrupted_count = trip.activities().filter(|a| a.disrupted).count() as u32;

        Self {
            id: trip.id,
            client_name: trip.client_name.clone(),
            destination: trip.destination.clone(),
            dates: trip.dates.clone(),
            status: trip.status,
            issue_summary: trip.issue_summary.clone(),
            updated_at: trip.updated_at,
            day_count: trip.days.len() as u32,
            activity_count: trip.activity_count() as u32,
            disrupted_count,
        }
    }
}
