//! Request types for sparse updates of trips and activities.

use jiff::civil::Time;

use super::TripStatus;
use crate::params;

/// Sparse patch for a trip. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateTripRequest {
    pub client_name: Option<String>,
    pub destination: Option<String>,
    pub dates: Option<String>,
    pub status: Option<TripStatus>,
    pub issue_summary: Option<String>,
}

impl UpdateTripRequest {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.destination.is_none()
            && self.dates.is_none()
            && self.status.is_none()
            && self.issue_summary.is_none()
    }

    /// Human-readable list of the fields this patch touches.
    pub fn describe_changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(name) = &self.client_name {
            changes.push(format!("Client set to {name}"));
        }
        if let Some(destination) = &self.destination {
            changes.push(format!("Destination set to {destination}"));
        }
        if let Some(dates) = &self.dates {
            changes.push(format!("Dates set to {dates}"));
        }
        if let Some(status) = &self.status {
            changes.push(format!("Status changed to {}", status.as_str()));
        }
        if self.issue_summary.is_some() {
            changes.push("Issue summary updated".to_string());
        }
        changes
    }
}

impl TryFrom<params::UpdateTrip> for UpdateTripRequest {
    type Error = crate::NexstepError;

    /// Validates the status string and turns the parameters into a patch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nexstep_core::{models::{TripStatus, UpdateTripRequest}, params::UpdateTrip};
    ///
    /// let params = UpdateTrip {
    ///     id: 1,
    ///     status: Some("active".to_string()),
    ///     ..Default::default()
    /// };
    /// let request: UpdateTripRequest = params.try_into()?;
    /// assert_eq!(request.status, Some(TripStatus::Active));
    /// # Ok::<(), nexstep_core::NexstepError>(())
    /// ```
    fn try_from(params: params::UpdateTrip) -> Result<Self, Self::Error> {
        let status = params.validate()?;

        Ok(Self {
            client_name: params.client_name,
            destination: params.destination,
            dates: params.dates,
            status,
            issue_summary: params.issue_summary,
        })
    }
}

/// Sparse patch for an activity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub time: Option<Time>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub disrupted: Option<bool>,
}

impl TryFrom<params::UpdateActivity> for UpdateActivityRequest {
    type Error = crate::NexstepError;

    fn try_from(params: params::UpdateActivity) -> Result<Self, Self::Error> {
        let time = params
            .time
            .as_deref()
            .map(|t| params::parse_time("time", t))
            .transpose()?;

        Ok(Self {
            title: params.title,
            time,
            location: params.location,
            notes: params.notes,
            disrupted: params.disrupted,
        })
    }
}
