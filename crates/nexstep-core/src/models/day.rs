//! Day and activity model definitions.

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
    Timestamp, ToSpan,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeResultExt};

/// One scheduled item within a day (a tour, a meal, a transfer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity
    pub id: u64,

    /// ID of the parent day
    pub day_id: u64,

    /// Display title
    pub title: String,

    /// Local time of day the activity starts
    pub time: Time,

    /// Free-form location text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-form notes for the agent or client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Explicit disruption marker set by an issue report
    #[serde(default)]
    pub disrupted: bool,

    /// Order of the activity within its day (0-indexed)
    pub position: u32,
}

impl Activity {
    /// Absolute start instant of this activity when it happens on `date` in
    /// the given time zone.
    pub fn start_on(&self, date: Date, time_zone: &TimeZone) -> Result<Timestamp> {
        let zoned = date
            .to_datetime(self.time)
            .to_zoned(time_zone.clone())
            .time_context("Failed to place activity in time zone")?;
        Ok(zoned.timestamp())
    }
}

/// A numbered day of the itinerary with its activities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Day {
    /// Unique identifier for the day
    pub id: u64,

    /// ID of the parent trip
    pub trip_id: u64,

    /// 1-based day number within the trip
    pub day_number: u32,

    /// Optional heading such as "Arrival in Kyoto"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Activities in display order
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Day {
    /// Calendar date of this day given the trip's anchor date (day 1).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jiff::civil::date;
    /// use nexstep_core::models::Day;
    ///
    /// let day = Day {
    ///     id: 1,
    ///     trip_id: 1,
    ///     day_number: 3,
    ///     title: None,
    ///     activities: vec![],
    /// };
    /// assert_eq!(day.date_from(date(2025, 3, 30))?, date(2025, 4, 1));
    /// # Ok::<(), nexstep_core::NexstepError>(())
    /// ```
    pub fn date_from(&self, anchor: Date) -> Result<Date> {
        let offset = i64::from(self.day_number.saturating_sub(1));
        anchor
            .checked_add(offset.days())
            .time_context("Day number is out of calendar range")
    }
}
