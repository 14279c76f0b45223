//! Filter types for querying trips.

use super::TripStatus;

/// Filter options for querying trips.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    /// Only trips in this status
    pub status: Option<TripStatus>,

    /// Filter by client name (case-insensitive partial match)
    pub client_contains: Option<String>,

    /// Filter by destination (case-insensitive partial match)
    pub destination_contains: Option<String>,
}

impl From<&crate::params::ListTrips> for TripFilter {
    fn from(params: &crate::params::ListTrips) -> Self {
        Self {
            status: params.status,
            client_contains: params.client.clone(),
            destination_contains: params.destination.clone(),
        }
    }
}
