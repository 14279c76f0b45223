//! Trip-level lifecycle transitions.
//!
//! [`evaluate_trip`] is the pure decision. [`LifecycleTransitioner`] applies
//! decisions to an in-memory trip list and hands the persistence writes to a
//! single background worker, so writes for the same store are serialized and
//! the caller never waits on them.
//!
//! ```text
//!  Draft (manual only)
//!
//!  Upcoming ──departure date ≤ today──▶ Active ──all activities ended──▶ Completed
//!                                         │        (or return day over)    ▲
//!                                         ▼                                │
//!                                     Disrupted ───────────────────────────┘
//!                                    (issue report)
//! ```

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use jiff::{tz::TimeZone, Timestamp};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{
    error::{Result, TimeResultExt},
    models::{Trip, TripStatus},
    timeline::trip_timeline,
};

/// Why a transition fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// A departure flight is dated today or earlier
    DepartureReached,
    /// Every sequenced activity has ended
    ActivitiesEnded,
    /// No activity timeline is available and the return day is over
    ReturnDayOver,
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransitionReason::DepartureReached => "departure date reached",
            TransitionReason::ActivitiesEnded => "all activities have ended",
            TransitionReason::ReturnDayOver => "return flight day is over",
        };
        f.write_str(text)
    }
}

/// A decided status change for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub trip_id: u64,
    pub from: TripStatus,
    pub to: TripStatus,
    pub reason: TransitionReason,
}

/// Decides whether `trip` should move to another status at `now`.
///
/// At most one step is taken per evaluation; a trip that is both past its
/// departure and past its last activity becomes `Active` now and `Completed`
/// on the next evaluation.
///
/// # Errors
///
/// Fails only when an activity cannot be placed on the calendar (a day number
/// or time outside the representable range).
pub fn evaluate_trip(trip: &Trip, now: Timestamp, time_zone: &TimeZone) -> Result<Option<Transition>> {
    let transition = |to, reason| {
        Some(Transition {
            trip_id: trip.id,
            from: trip.status,
            to,
            reason,
        })
    };

    match trip.status {
        TripStatus::Upcoming => {
            let today = now.to_zoned(time_zone.clone()).date();
            if trip.departs_by(today) {
                return Ok(transition(TripStatus::Active, TransitionReason::DepartureReached));
            }
            Ok(None)
        }
        TripStatus::Active | TripStatus::Disrupted => {
            if let Some(ended) = activities_ended(trip, now, time_zone)? {
                return Ok(if ended {
                    transition(TripStatus::Completed, TransitionReason::ActivitiesEnded)
                } else {
                    None
                });
            }
            if return_day_over(trip, now, time_zone)? {
                return Ok(transition(TripStatus::Completed, TransitionReason::ReturnDayOver));
            }
            Ok(None)
        }
        TripStatus::Draft | TripStatus::Completed => Ok(None),
    }
}

/// `None` when no activity-based answer exists (no departure anchor or no
/// activities at all).
fn activities_ended(trip: &Trip, now: Timestamp, time_zone: &TimeZone) -> Result<Option<bool>> {
    let Some(days) = trip_timeline(trip, time_zone)? else {
        return Ok(None);
    };

    let mut entries = days.iter().flat_map(|day| day.entries.iter()).peekable();
    if entries.peek().is_none() {
        return Ok(None);
    }
    Ok(Some(entries.all(|entry| entry.end <= now)))
}

fn return_day_over(trip: &Trip, now: Timestamp, time_zone: &TimeZone) -> Result<bool> {
    let Some(date) = trip.return_date() else {
        return Ok(false);
    };
    let end_of_day = date
        .at(23, 59, 59, 999_999_999)
        .to_zoned(time_zone.clone())
        .time_context("Failed to resolve end of return day")?;
    Ok(end_of_day.timestamp() <= now)
}

/// The persistence side of a status transition.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Sets the trip's status to `to` only if it is still `from`.
    ///
    /// # Errors
    ///
    /// Must return `NexstepError::StatusConflict` when the stored status is
    /// no longer `from`.
    async fn transition_status(&self, trip_id: u64, from: TripStatus, to: TripStatus) -> Result<Trip>;
}

/// Result of one background status write.
#[derive(Debug)]
pub struct WriteOutcome {
    pub transition: Transition,
    /// The stored trip on success, or a message describing the failure
    pub result: std::result::Result<Trip, String>,
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Brings an in-memory trip list back in line with what was stored:
    /// adopts the stored status on success, rolls the optimistic update back
    /// on failure (unless the trip was changed again in the meantime).
    pub fn reconcile(&self, trips: &mut [Trip]) {
        let Some(trip) = trips.iter_mut().find(|t| t.id == self.transition.trip_id) else {
            return;
        };
        match &self.result {
            Ok(stored) => {
                trip.status = stored.status;
                trip.updated_at = stored.updated_at;
            }
            Err(_) if trip.status == self.transition.to => {
                trip.status = self.transition.from;
            }
            Err(_) => {}
        }
    }

    /// One-line notification for the user.
    pub fn message(&self) -> String {
        let t = &self.transition;
        match &self.result {
            Ok(_) => format!(
                "Trip {} moved from {} to {} ({})",
                t.trip_id,
                t.from.as_str(),
                t.to.as_str(),
                t.reason
            ),
            Err(e) => format!(
                "Trip {} could not move from {} to {}: {e}",
                t.trip_id,
                t.from.as_str(),
                t.to.as_str()
            ),
        }
    }
}

/// Applies lifecycle decisions and queues their persistence writes.
pub struct LifecycleTransitioner {
    time_zone: TimeZone,
    pending: Arc<Mutex<HashSet<u64>>>,
    writes: mpsc::UnboundedSender<Transition>,
}

impl LifecycleTransitioner {
    /// Spawns the write worker on the current Tokio runtime and returns the
    /// transitioner with the channel its outcomes are reported on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(
        store: Arc<dyn TripStore>,
        time_zone: TimeZone,
    ) -> (Self, mpsc::UnboundedReceiver<WriteOutcome>) {
        let (writes, mut queue) = mpsc::unbounded_channel::<Transition>();
        let (outcomes, outcome_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(Mutex::new(HashSet::new()));

        let worker_pending = pending.clone();
        tokio::spawn(async move {
            while let Some(transition) = queue.recv().await {
                let result = store
                    .transition_status(transition.trip_id, transition.from, transition.to)
                    .await
                    .map_err(|e| e.to_string());

                worker_pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&transition.trip_id);

                let outcome = WriteOutcome { transition, result };
                match &outcome.result {
                    Ok(_) => info!("{}", outcome.message()),
                    Err(_) => warn!("{}", outcome.message()),
                }
                if outcomes.send(outcome).is_err() {
                    debug!("Transition outcome dropped; no receiver");
                }
            }
            debug!("Transition worker stopped");
        });

        (
            Self {
                time_zone,
                pending,
                writes,
            },
            outcome_rx,
        )
    }

    /// Evaluates every trip, applies transitions optimistically in place and
    /// queues one write per transition. Does not wait for the writes.
    ///
    /// Trips with a write still in flight are skipped. A trip whose timeline
    /// cannot be built is logged and left unchanged.
    pub fn refresh(&self, trips: &mut [Trip], now: Timestamp) -> Vec<Transition> {
        let mut applied = Vec::new();

        for trip in &mut *trips {
            if self.is_pending(trip.id) {
                debug!("Trip {} has a pending status write; skipping", trip.id);
                continue;
            }

            let transition = match evaluate_trip(trip, now, &self.time_zone) {
                Ok(Some(transition)) => transition,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cannot evaluate trip {}: {e}", trip.id);
                    continue;
                }
            };

            trip.status = transition.to;
            self.pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(trip.id);

            if self.writes.send(transition.clone()).is_err() {
                warn!("Transition worker is gone; reverting trip {}", trip.id);
                trip.status = transition.from;
                self.pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&trip.id);
                continue;
            }
            applied.push(transition);
        }

        applied
    }

    /// Whether a status write for `trip_id` is still in flight.
    pub fn is_pending(&self, trip_id: u64) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&trip_id)
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }
}
