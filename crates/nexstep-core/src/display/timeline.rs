//! The classified per-day timeline of a trip.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

use super::datetime::TimeRange;
use crate::{
    classifier::{classify_entry, ActivityStatus},
    error::Result,
    models::Trip,
    timeline::{trip_timeline, zero_width_activities, DayTimeline, SequencedActivity},
};

/// A trip's sequenced timeline, classified at one instant.
///
/// The sequencing is computed once; [`set_now`](Self::set_now) only moves
/// the instant stages and progress are derived from, which is what a live
/// view does on every clock tick.
#[derive(Debug, Clone)]
pub struct TimelineView {
    pub trip: Trip,
    /// `None` when the trip has no departure flight to anchor its days
    pub days: Option<Vec<DayTimeline>>,
    pub now: Timestamp,
    time_zone: TimeZone,
}

impl TimelineView {
    pub fn new(trip: Trip, time_zone: TimeZone, now: Timestamp) -> Result<Self> {
        let days = trip_timeline(&trip, &time_zone)?;
        Ok(Self {
            trip,
            days,
            now,
            time_zone,
        })
    }

    pub fn set_now(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Every sequenced activity with its status at [`now`](Self::now).
    pub fn statuses(&self) -> impl Iterator<Item = (&SequencedActivity, ActivityStatus)> + '_ {
        self.days
            .iter()
            .flatten()
            .flat_map(|day| day.entries.iter())
            .map(|entry| (entry, classify_entry(entry, self.now)))
    }

    /// Activities whose interval has zero width, across all days.
    pub fn zero_width_activities(&self) -> Vec<u64> {
        self.days
            .iter()
            .flatten()
            .flat_map(|day| zero_width_activities(&day.entries))
            .collect()
    }

    fn fmt_day(&self, f: &mut fmt::Formatter<'_>, day: &DayTimeline) -> fmt::Result {
        match &day.title {
            Some(title) => writeln!(f, "## Day {}: {title} ({})", day.day_number, day.date)?,
            None => writeln!(f, "## Day {} ({})", day.day_number, day.date)?,
        }
        writeln!(f)?;

        if day.entries.is_empty() {
            return writeln!(f, "No activities.");
        }
        for entry in &day.entries {
            let status = classify_entry(entry, self.now);
            let range = TimeRange {
                start: &entry.start,
                end: &entry.end,
                time_zone: &self.time_zone,
            };
            write!(
                f,
                "- **{range}** {}: {}",
                entry.activity.title,
                status.stage.with_icon()
            )?;
            if status.progress > 0.0 && status.progress < 100.0 {
                write!(f, " ({:.0}%)", status.progress)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for TimelineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {}. {}: {} ({})",
            self.trip.id,
            self.trip.client_name,
            self.trip.destination,
            self.trip.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- As of: {}",
            self.now
                .to_zoned(self.time_zone.clone())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )?;
        if let Some(issue) = &self.trip.issue_summary {
            writeln!(f, "- Issue: {issue}")?;
        }

        let Some(days) = &self.days else {
            writeln!(f)?;
            return writeln!(
                f,
                "No departure flight; the itinerary cannot be placed on the calendar."
            );
        };
        if days.is_empty() {
            writeln!(f)?;
            return writeln!(f, "No days planned for this trip.");
        }

        for day in days {
            writeln!(f)?;
            self.fmt_day(f, day)?;
        }

        let zero_width = self.zero_width_activities();
        if !zero_width.is_empty() {
            let ids = zero_width
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f)?;
            writeln!(
                f,
                "**Note**: activities {ids} share a start time with the next activity and have no duration."
            )?;
        }
        Ok(())
    }
}
