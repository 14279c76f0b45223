//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::TripSummary;

/// Newtype wrapper for displaying a list of trip summaries.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use nexstep_core::{
///     display::TripSummaries,
///     models::{TripStatus, TripSummary},
/// };
///
/// let summary = TripSummary {
///     id: 1,
///     client_name: "Ada Lovelace".to_string(),
///     destination: "Lisbon".to_string(),
///     dates: Some("12-15 May".to_string()),
///     status: TripStatus::Upcoming,
///     issue_summary: None,
///     updated_at: Timestamp::now(),
///     day_count: 3,
///     activity_count: 7,
///     disrupted_count: 0,
/// };
///
/// let output = TripSummaries(vec![summary]).to_string();
/// assert!(output.contains("Ada Lovelace: Lisbon"));
/// assert!(output.contains("3 day(s), 7 activities"));
/// ```
pub struct TripSummaries(pub Vec<TripSummary>);

impl TripSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&TripSummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripSummary> {
        self.0.iter()
    }
}

impl Index<usize> for TripSummaries {
    type Output = TripSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for TripSummaries {
    type Item = TripSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TripSummaries {
    type Item = &'a TripSummary;
    type IntoIter = std::slice::Iter<'a, TripSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TripSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No trips found.");
        }
        for trip in &self.0 {
            write!(f, "{trip}")?;
        }
        Ok(())
    }
}
