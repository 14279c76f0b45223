//! Timeline views and lifecycle refreshes for the Agency.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

use super::Agency;
use crate::{
    display::TimelineView,
    error::Result,
    lifecycle::{LifecycleTransitioner, Transition, TripStore, WriteOutcome},
    models::Trip,
    params::Id,
};

/// Outcome of one lifecycle pass over every stored trip.
#[derive(Debug)]
pub struct RefreshReport {
    /// Number of trips evaluated
    pub checked: usize,
    /// One entry per attempted transition, in completion order
    pub outcomes: Vec<WriteOutcome>,
    /// Writes queued but not finished when the report was taken
    pub in_flight: usize,
}

impl RefreshReport {
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

impl Agency {
    /// Builds the per-day timeline of a trip with every activity classified
    /// at the current instant.
    ///
    /// # Errors
    ///
    /// * `NexstepError::TripNotFound` - When the trip doesn't exist
    pub async fn trip_timeline(&self, params: &Id) -> Result<TimelineView> {
        let trip = self.require_trip(params.id).await?;
        let view = TimelineView::new(trip, self.time_zone().clone(), self.now())?;

        let zero_width = view.zero_width_activities();
        if !zero_width.is_empty() {
            warn!(
                "Trip {} has activities sharing a start time; {:?} have zero duration",
                params.id, zero_width
            );
        }
        Ok(view)
    }

    /// Runs one lifecycle pass over all trips and waits for every status
    /// write it queued.
    pub async fn refresh_statuses(&self) -> Result<RefreshReport> {
        let mut session = self.status_session();
        session.refresh().await?;

        let mut outcomes = Vec::new();
        while session.in_flight() > 0 {
            let Some(outcome) = session.next_outcome().await else {
                break;
            };
            outcomes.push(outcome);
        }

        Ok(session.report(outcomes))
    }

    /// Starts a lifecycle session whose transitioner and outcome channel
    /// live as long as the returned value.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn status_session(&self) -> StatusSession {
        let store: Arc<dyn TripStore> = Arc::new(self.clone());
        StatusSession::new(self.clone(), store)
    }
}

/// One [`LifecycleTransitioner`] and its outcome receiver, held for the
/// lifetime of a long-running caller such as `watch` or the MCP server.
///
/// Refreshes queue writes without waiting on them. A trip whose write is
/// still in flight keeps its optimistic status in the held list and is
/// skipped by later refreshes until its outcome has been received.
pub struct StatusSession {
    agency: Agency,
    transitioner: LifecycleTransitioner,
    outcomes: mpsc::UnboundedReceiver<WriteOutcome>,
    trips: Vec<Trip>,
    in_flight: usize,
}

impl StatusSession {
    pub(crate) fn new(agency: Agency, store: Arc<dyn TripStore>) -> Self {
        let (transitioner, outcomes) =
            LifecycleTransitioner::spawn(store, agency.time_zone().clone());
        Self {
            agency,
            transitioner,
            outcomes,
            trips: Vec::new(),
            in_flight: 0,
        }
    }

    /// Reloads every trip and queues the transitions due at the agency's
    /// current instant.
    pub async fn refresh(&mut self) -> Result<Vec<Transition>> {
        let mut trips = self.agency.list_trips(None).await?;
        for trip in &mut trips {
            if !self.transitioner.is_pending(trip.id) {
                continue;
            }
            if let Some(held) = self.trips.iter().find(|held| held.id == trip.id) {
                trip.status = held.status;
            }
        }

        let queued = self.transitioner.refresh(&mut trips, self.agency.now());
        debug!(
            "Refresh queued {} transition(s) over {} trip(s); {} already in flight",
            queued.len(),
            trips.len(),
            self.in_flight
        );
        self.in_flight += queued.len();
        self.trips = trips;
        Ok(queued)
    }

    /// Waits for the next write outcome and reconciles the held trips with
    /// it. Cancel safe, so it can sit in a `select!` arm.
    ///
    /// Returns `None` once the write worker has stopped.
    pub async fn next_outcome(&mut self) -> Option<WriteOutcome> {
        let outcome = self.outcomes.recv().await?;
        self.settle(&outcome);
        Some(outcome)
    }

    /// Outcomes that have already arrived, without waiting for more.
    pub fn settled(&mut self) -> Vec<WriteOutcome> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.settle(&outcome);
            settled.push(outcome);
        }
        settled
    }

    /// Collects finished writes, refreshes, then waits up to `within` for
    /// the writes still in flight. Writes that outlast the wait stay pending
    /// and are reported by a later call.
    pub async fn refresh_and_settle(&mut self, within: Duration) -> Result<RefreshReport> {
        let mut outcomes = self.settled();
        self.refresh().await?;

        let deadline = Instant::now() + within;
        while self.in_flight > 0 {
            match time::timeout_at(deadline, self.next_outcome()).await {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => break,
                Err(_) => {
                    debug!("{} status write(s) still in flight", self.in_flight);
                    break;
                }
            }
        }

        Ok(self.report(outcomes))
    }

    /// Trips as of the last refresh, with received outcomes applied.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Number of queued writes whose outcome has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_pending(&self, trip_id: u64) -> bool {
        self.transitioner.is_pending(trip_id)
    }

    fn settle(&mut self, outcome: &WriteOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        outcome.reconcile(&mut self.trips);
    }

    fn report(&self, outcomes: Vec<WriteOutcome>) -> RefreshReport {
        RefreshReport {
            checked: self.trips.len(),
            outcomes,
            in_flight: self.in_flight,
        }
    }
}
