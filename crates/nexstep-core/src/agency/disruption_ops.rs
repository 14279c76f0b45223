//! Disruption reporting with re-optimization and manual fallback.

use log::{info, warn};

use super::Agency;
use crate::{
    error::{NexstepError, Result},
    models::{Activity, Trip},
    params::ReportDisruption,
    reoptimize::{parse_reoptimization, ActivityRevision, DisruptionRequest},
};

/// What happened to a reported disruption.
#[derive(Debug, Clone)]
pub struct DisruptionReport {
    /// The trip as stored after the report
    pub trip: Trip,
    pub activity_id: u64,
    /// Activities rewritten by the re-optimizer
    pub revised: Vec<u64>,
    /// Set when re-optimization failed and the activity was only marked
    pub notification: Option<String>,
}

impl DisruptionReport {
    pub fn reoptimized(&self) -> bool {
        self.notification.is_none()
    }
}

impl Agency {
    /// Records an issue against an activity.
    ///
    /// The trip always becomes disrupted with the issue as its summary. The
    /// rest of the activity's day is then handed to the re-optimizer; its
    /// revisions are applied in one transaction, or, if it fails for any
    /// reason, the activity alone is marked disrupted and the report carries
    /// a notification saying so.
    ///
    /// # Errors
    ///
    /// * `NexstepError::InvalidInput` - When the report is incomplete
    /// * `NexstepError::ActivityNotFound` - When the activity doesn't exist
    pub async fn report_disruption(&self, params: &ReportDisruption) -> Result<DisruptionReport> {
        params.validate()?;
        let activity_id = params.activity_id;

        let trip_id = self
            .with_database(move |db| db.get_activity_trip_id(activity_id))
            .await?
            .ok_or(NexstepError::ActivityNotFound { id: activity_id })?;
        let trip = self.require_trip(trip_id).await?;

        let (activity, remaining) = {
            let (day, activity) = trip
                .find_activity(activity_id)
                .ok_or(NexstepError::ActivityNotFound { id: activity_id })?;
            let mut remaining: Vec<Activity> = day
                .activities
                .iter()
                .filter(|a| a.id != activity_id)
                .cloned()
                .collect();
            remaining.sort_by_key(|a| a.time);
            (activity.clone(), remaining)
        };

        let issue_summary = format!(
            "{}: {} (affects '{}')",
            params.disruption_type.trim(),
            params.description.trim(),
            activity.title
        );
        let request = DisruptionRequest {
            disruption_type: params.disruption_type.trim().to_string(),
            description: params.description.trim().to_string(),
            activity,
            remaining_activities: remaining,
            destination: trip.destination.clone(),
        };

        let (revisions, notification) = match self.reoptimize(&request).await {
            Ok(revisions) => (revisions, None),
            Err(e) => {
                warn!("Re-optimization for activity {activity_id} failed: {e}");
                let notification = format!(
                    "Could not re-plan around '{}' ({e}). The activity has been marked as disrupted; please adjust the itinerary by hand.",
                    request.activity.title
                );
                (Vec::new(), Some(notification))
            }
        };

        let revised: Vec<u64> = revisions.iter().map(|r| r.id).collect();
        self.with_database(move |db| {
            db.record_disruption(trip_id, activity_id, &issue_summary, &revisions)
        })
        .await?;

        if notification.is_none() {
            info!("Trip {trip_id} re-planned around activity {activity_id}: revised {revised:?}");
        }

        Ok(DisruptionReport {
            trip: self.require_trip(trip_id).await?,
            activity_id,
            revised,
            notification,
        })
    }

    async fn reoptimize(&self, request: &DisruptionRequest) -> Result<Vec<ActivityRevision>> {
        let payload = self.reoptimizer.reoptimize(request).await?;
        parse_reoptimization(&payload, request)
    }
}
