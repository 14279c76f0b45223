//! Sequential timeline construction.
//!
//! Activities only carry a start time. A timeline bounds each of them by the
//! start of its chronological successor, so that the intervals of one day are
//! sorted, contiguous and never overlap. The last activity has no successor
//! and receives [`DEFAULT_ACTIVITY_DURATION`].
//!
//! ```text
//!   10:00        12:00             15:00        17:00
//!     ├── tour ────┤── lunch ─────────┤── museum ──┤
//!                                        (+2h default)
//! ```

use jiff::{civil::Date, tz::TimeZone, SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Activity, Day, Trip},
};

/// Length given to the last activity of a timeline.
pub const DEFAULT_ACTIVITY_DURATION: SignedDuration = SignedDuration::from_hours(2);

/// An activity placed on the calendar at an absolute start instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedActivity {
    pub activity: Activity,
    pub start: Timestamp,
}

/// An activity bounded by a computed end instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedActivity {
    pub activity: Activity,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl SequencedActivity {
    /// Drops the computed end, keeping the original placement.
    pub fn into_placed(self) -> PlacedActivity {
        PlacedActivity {
            activity: self.activity,
            start: self.start,
        }
    }
}

/// Sorts activities by start and bounds each by its successor's start.
///
/// The sort is stable: activities sharing a start instant keep their input
/// order and all but the last of them get a zero-width interval. Empty input
/// yields an empty timeline.
///
/// # Examples
///
/// ```rust
/// use jiff::{civil::time, Timestamp};
/// use nexstep_core::{
///     models::Activity,
///     timeline::{sequence_activities, PlacedActivity},
/// };
///
/// let placed = |id: u64, start: &str| PlacedActivity {
///     activity: Activity {
///         id,
///         day_id: 1,
///         title: format!("Activity {id}"),
///         time: time(0, 0, 0, 0),
///         location: None,
///         notes: None,
///         disrupted: false,
///         position: 0,
///     },
///     start: start.parse::<Timestamp>().unwrap(),
/// };
///
/// let timeline = sequence_activities(vec![
///     placed(2, "2025-05-12T12:00:00Z"),
///     placed(1, "2025-05-12T10:00:00Z"),
/// ]);
/// assert_eq!(timeline[0].activity.id, 1);
/// assert_eq!(timeline[0].end, timeline[1].start);
/// ```
pub fn sequence_activities(mut activities: Vec<PlacedActivity>) -> Vec<SequencedActivity> {
    activities.sort_by_key(|placed| placed.start);

    let successor_starts: Vec<Option<Timestamp>> = activities
        .iter()
        .skip(1)
        .map(|next| Some(next.start))
        .chain(std::iter::once(None))
        .collect();

    activities
        .into_iter()
        .zip(successor_starts)
        .map(|(placed, next_start)| SequencedActivity {
            end: next_start.unwrap_or(placed.start + DEFAULT_ACTIVITY_DURATION),
            activity: placed.activity,
            start: placed.start,
        })
        .collect()
}

/// IDs of activities whose interval has zero width because they share a
/// start instant with their successor.
pub fn zero_width_activities(timeline: &[SequencedActivity]) -> Vec<u64> {
    timeline
        .iter()
        .filter(|entry| entry.end == entry.start)
        .map(|entry| entry.activity.id)
        .collect()
}

/// Places every activity of `day` on its calendar date.
pub fn place_day(day: &Day, anchor: Date, time_zone: &TimeZone) -> Result<Vec<PlacedActivity>> {
    let date = day.date_from(anchor)?;
    day.activities
        .iter()
        .map(|activity| {
            Ok(PlacedActivity {
                start: activity.start_on(date, time_zone)?,
                activity: activity.clone(),
            })
        })
        .collect()
}

/// The sequenced timeline of one itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTimeline {
    pub day_id: u64,
    pub day_number: u32,
    pub title: Option<String>,
    pub date: Date,
    pub entries: Vec<SequencedActivity>,
}

/// Builds one timeline per day of the trip, anchored on its departure date.
///
/// Returns `None` when the trip has no departure flight, since days cannot be
/// mapped to calendar dates without it.
pub fn trip_timeline(trip: &Trip, time_zone: &TimeZone) -> Result<Option<Vec<DayTimeline>>> {
    let Some(anchor) = trip.anchor_date() else {
        return Ok(None);
    };

    let mut days: Vec<&Day> = trip.days.iter().collect();
    days.sort_by_key(|day| day.day_number);

    days.into_iter()
        .map(|day| {
            Ok(DayTimeline {
                day_id: day.id,
                day_number: day.day_number,
                title: day.title.clone(),
                date: day.date_from(anchor)?,
                entries: sequence_activities(place_day(day, anchor, time_zone)?),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    fn activity(id: u64) -> Activity {
        Activity {
            id,
            day_id: 1,
            title: format!("Activity {id}"),
            time: time(0, 0, 0, 0),
            location: None,
            notes: None,
            disrupted: false,
            position: id as u32,
        }
    }

    fn at(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn placed(id: u64, start: &str) -> PlacedActivity {
        PlacedActivity {
            activity: activity(id),
            start: at(start),
        }
    }

    #[test]
    fn test_single_day_scenario() {
        let timeline = sequence_activities(vec![
            placed(1, "2025-05-12T10:00:00Z"),
            placed(2, "2025-05-12T12:00:00Z"),
            placed(3, "2025-05-12T15:00:00Z"),
        ]);

        let bounds: Vec<(u64, Timestamp, Timestamp)> = timeline
            .iter()
            .map(|e| (e.activity.id, e.start, e.end))
            .collect();
        assert_eq!(
            bounds,
            vec![
                (1, at("2025-05-12T10:00:00Z"), at("2025-05-12T12:00:00Z")),
                (2, at("2025-05-12T12:00:00Z"), at("2025-05-12T15:00:00Z")),
                (3, at("2025-05-12T15:00:00Z"), at("2025-05-12T17:00:00Z")),
            ]
        );
    }

    #[test]
    fn test_unsorted_input_is_sorted_and_contiguous() {
        let timeline = sequence_activities(vec![
            placed(4, "2025-05-12T18:30:00Z"),
            placed(1, "2025-05-12T08:00:00Z"),
            placed(3, "2025-05-12T13:15:00Z"),
            placed(2, "2025-05-12T09:45:00Z"),
        ]);

        let ids: Vec<u64> = timeline.iter().map(|e| e.activity.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        for pair in timeline.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn test_last_activity_gets_default_duration() {
        let timeline = sequence_activities(vec![
            placed(1, "2025-05-12T10:00:00Z"),
            placed(2, "2025-05-12T21:00:00Z"),
        ]);
        let last = timeline.last().unwrap();
        assert_eq!(last.end.duration_since(last.start), DEFAULT_ACTIVITY_DURATION);
    }

    #[test]
    fn test_empty_input_yields_empty_timeline() {
        assert!(sequence_activities(Vec::new()).is_empty());
    }

    #[test]
    fn test_resequencing_is_idempotent() {
        let first = sequence_activities(vec![
            placed(3, "2025-05-12T15:00:00Z"),
            placed(1, "2025-05-12T10:00:00Z"),
            placed(2, "2025-05-12T12:00:00Z"),
        ]);
        let second = sequence_activities(
            first
                .iter()
                .cloned()
                .map(SequencedActivity::into_placed)
                .collect(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_start_produces_zero_width_intervals() {
        let timeline = sequence_activities(vec![
            placed(7, "2025-05-12T10:00:00Z"),
            placed(5, "2025-05-12T10:00:00Z"),
            placed(6, "2025-05-12T10:00:00Z"),
        ]);

        // Stable sort keeps input order for ties.
        let ids: Vec<u64> = timeline.iter().map(|e| e.activity.id).collect();
        assert_eq!(ids, vec![7, 5, 6]);
        assert_eq!(zero_width_activities(&timeline), vec![7, 5]);
        assert_eq!(
            timeline[2].end,
            at("2025-05-12T10:00:00Z") + DEFAULT_ACTIVITY_DURATION
        );
    }

    #[test]
    fn test_place_day_maps_day_number_onto_anchor() {
        let mut morning = activity(1);
        morning.time = time(9, 30, 0, 0);
        let day = Day {
            id: 10,
            trip_id: 1,
            day_number: 2,
            title: None,
            activities: vec![morning],
        };

        let placed = place_day(&day, date(2025, 5, 12), &TimeZone::UTC).unwrap();
        assert_eq!(placed[0].start, at("2025-05-13T09:30:00Z"));
    }

    #[test]
    fn test_place_day_respects_time_zone() {
        let mut dinner = activity(1);
        dinner.time = time(20, 0, 0, 0);
        let day = Day {
            id: 10,
            trip_id: 1,
            day_number: 1,
            title: None,
            activities: vec![dinner],
        };

        let tokyo = TimeZone::fixed(jiff::tz::offset(9));
        let placed = place_day(&day, date(2025, 5, 12), &tokyo).unwrap();
        assert_eq!(placed[0].start, at("2025-05-12T11:00:00Z"));
    }
}
