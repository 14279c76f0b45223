//! Time-derived lifecycle stage of a single activity.
//!
//! This is the only place that decides whether an activity is upcoming,
//! happening, or over. Everything that displays or aggregates activity state
//! goes through [`classify`].

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{NexstepError, Result},
    timeline::SequencedActivity,
};

/// Lifecycle stage of an activity relative to the current instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStage {
    Upcoming,
    NowHappening,
    Completed,
    /// Disrupted and still within (or before) its interval
    Disrupted,
    /// Disrupted and its interval has already elapsed
    MissedDisrupted,
}

impl ActivityStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStage::Upcoming => "upcoming",
            ActivityStage::NowHappening => "now_happening",
            ActivityStage::Completed => "completed",
            ActivityStage::Disrupted => "disrupted",
            ActivityStage::MissedDisrupted => "missed_disrupted",
        }
    }

    /// Get stage with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            ActivityStage::Upcoming => "○ Upcoming",
            ActivityStage::NowHappening => "➤ Now Happening",
            ActivityStage::Completed => "✓ Completed",
            ActivityStage::Disrupted => "⚠ Disrupted",
            ActivityStage::MissedDisrupted => "✗ Missed/Disrupted",
        }
    }

    /// Whether the activity is over, one way or another.
    pub fn is_finished(&self) -> bool {
        matches!(self, ActivityStage::Completed | ActivityStage::MissedDisrupted)
    }
}

impl fmt::Display for ActivityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated `[start, end]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: Timestamp,
    end: Timestamp,
}

impl Interval {
    /// Creates an interval, rejecting one that ends before it starts.
    ///
    /// # Errors
    ///
    /// * `NexstepError::InvalidInput` - When `end < start`
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end < start {
            return Err(NexstepError::invalid_input("end")
                .with_reason(format!("Interval ends at {end}, before it starts at {start}")));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }
}

impl From<&SequencedActivity> for Interval {
    /// Sequenced activities are bounded by their successor, so `end >= start`
    /// holds by construction.
    fn from(entry: &SequencedActivity) -> Self {
        Self {
            start: entry.start,
            end: entry.end,
        }
    }
}

/// Stage and elapsed fraction of an activity at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityStatus {
    pub stage: ActivityStage,
    /// Elapsed share of the interval, in percent (0.0–100.0)
    pub progress: f64,
}

/// Elapsed fraction of `interval` at `now`, in percent.
///
/// Exactly 0 at or before the start, exactly 100 at or after the end and
/// linear in between. A zero-width interval reads 0 at its single instant.
pub fn progress(interval: Interval, now: Timestamp) -> f64 {
    if now <= interval.start {
        return 0.0;
    }
    if now >= interval.end {
        return 100.0;
    }
    let elapsed = (now.as_nanosecond() - interval.start.as_nanosecond()) as f64;
    let total = (interval.end.as_nanosecond() - interval.start.as_nanosecond()) as f64;
    if total <= 0.0 {
        return 100.0;
    }
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Derives the stage of an activity. Rules are applied in order:
///
/// 1. disrupted and `now >= end` → [`ActivityStage::MissedDisrupted`]
/// 2. disrupted → [`ActivityStage::Disrupted`]
/// 3. `now < start` → [`ActivityStage::Upcoming`]
/// 4. `now >= end` → [`ActivityStage::Completed`]
/// 5. otherwise → [`ActivityStage::NowHappening`]
///
/// Progress ignores the disruption flag.
pub fn classify(interval: Interval, disrupted: bool, now: Timestamp) -> ActivityStatus {
    let stage = if disrupted && now >= interval.end {
        ActivityStage::MissedDisrupted
    } else if disrupted {
        ActivityStage::Disrupted
    } else if now < interval.start {
        ActivityStage::Upcoming
    } else if now >= interval.end {
        ActivityStage::Completed
    } else {
        ActivityStage::NowHappening
    };

    ActivityStatus {
        stage,
        progress: progress(interval, now),
    }
}

/// Classifies a sequenced activity using its own disruption marker.
pub fn classify_entry(entry: &SequencedActivity, now: Timestamp) -> ActivityStatus {
    classify(Interval::from(entry), entry.activity.disrupted, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn interval() -> Interval {
        Interval::new(at("2025-05-12T10:00:00Z"), at("2025-05-12T12:00:00Z")).unwrap()
    }

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        let err = Interval::new(at("2025-05-12T12:00:00Z"), at("2025-05-12T10:00:00Z")).unwrap_err();
        match err {
            NexstepError::InvalidInput { field, .. } => assert_eq!(field, "end"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_stages_without_disruption() {
        let cases = [
            ("2025-05-12T09:59:59Z", ActivityStage::Upcoming),
            ("2025-05-12T10:00:00Z", ActivityStage::NowHappening),
            ("2025-05-12T11:00:00Z", ActivityStage::NowHappening),
            ("2025-05-12T12:00:00Z", ActivityStage::Completed),
            ("2025-05-13T00:00:00Z", ActivityStage::Completed),
        ];
        for (now, expected) in cases {
            assert_eq!(classify(interval(), false, at(now)).stage, expected, "at {now}");
        }
    }

    #[test]
    fn test_elapsed_disruption_is_missed_not_completed() {
        let status = classify(interval(), true, at("2025-05-12T18:00:00Z"));
        assert_eq!(status.stage, ActivityStage::MissedDisrupted);
        assert!(status.stage.is_finished());
    }

    #[test]
    fn test_disruption_overrides_upcoming_and_happening() {
        assert_eq!(
            classify(interval(), true, at("2025-05-12T08:00:00Z")).stage,
            ActivityStage::Disrupted
        );
        assert_eq!(
            classify(interval(), true, at("2025-05-12T11:00:00Z")).stage,
            ActivityStage::Disrupted
        );
    }

    #[test]
    fn test_progress_boundaries_and_midpoint() {
        assert_eq!(progress(interval(), at("2025-05-12T09:00:00Z")), 0.0);
        assert_eq!(progress(interval(), at("2025-05-12T10:00:00Z")), 0.0);
        assert_eq!(progress(interval(), at("2025-05-12T11:00:00Z")), 50.0);
        assert_eq!(progress(interval(), at("2025-05-12T12:00:00Z")), 100.0);
        assert_eq!(progress(interval(), at("2025-05-14T12:00:00Z")), 100.0);
    }

    #[test]
    fn test_progress_stays_in_range() {
        let start = at("2025-05-12T10:00:00Z");
        let end = at("2025-05-12T10:00:07Z");
        let interval = Interval::new(start, end).unwrap();
        for offset_ms in (-5_000..12_000).step_by(333) {
            let now = Timestamp::from_millisecond(start.as_millisecond() + offset_ms).unwrap();
            let value = progress(interval, now);
            assert!((0.0..=100.0).contains(&value), "{value} at offset {offset_ms}");
        }
    }

    #[test]
    fn test_progress_of_sub_millisecond_interval() {
        let interval = Interval::new(
            at("2025-05-12T10:00:00.0001Z"),
            at("2025-05-12T10:00:00.0009Z"),
        )
        .unwrap();
        let value = progress(interval, at("2025-05-12T10:00:00.0005Z"));
        assert!((0.0..=100.0).contains(&value), "progress out of range: {value}");
        assert!((value - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_progress_ignores_disruption() {
        let now = at("2025-05-12T10:30:00Z");
        assert_eq!(
            classify(interval(), true, now).progress,
            classify(interval(), false, now).progress
        );
    }

    #[test]
    fn test_zero_width_interval() {
        let instant = at("2025-05-12T10:00:00Z");
        let interval = Interval::new(instant, instant).unwrap();
        let status = classify(interval, false, instant);
        assert_eq!(status.stage, ActivityStage::Completed);
        assert_eq!(status.progress, 0.0);
    }
}
