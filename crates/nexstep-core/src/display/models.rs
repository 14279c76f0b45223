//! Display implementations for domain models.
//!
//! Kept apart from the model definitions. Everything renders as markdown
//! with status icons, and a model looks the same standalone or nested in a
//! trip.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Activity, Day, Flight, FlightKind, HotelStay, Trip, TripStatus, TripSummary,
};

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for FlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}: {}", self.id, self.client_name, self.destination)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        if let Some(dates) = &self.dates {
            writeln!(f, "- Dates: {dates}")?;
        }
        if let Some(issue) = &self.issue_summary {
            writeln!(f, "- Issue: {issue}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.flights.is_empty() {
            writeln!(f, "\n## Flights")?;
            writeln!(f)?;
            for flight in &self.flights {
                write!(f, "{flight}")?;
            }
        }

        if !self.hotels.is_empty() {
            writeln!(f, "\n## Hotels")?;
            writeln!(f)?;
            for hotel in &self.hotels {
                write!(f, "{hotel}")?;
            }
        }

        if self.days.is_empty() {
            writeln!(f, "\nNo days planned for this trip.")?;
        } else {
            writeln!(f, "\n## Itinerary")?;
            for day in &self.days {
                writeln!(f)?;
                write!(f, "{day}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => writeln!(f, "### Day {}: {title} (ID: {})", self.day_number, self.id)?,
            None => writeln!(f, "### Day {} (ID: {})", self.day_number, self.id)?,
        }
        writeln!(f)?;

        if self.activities.is_empty() {
            writeln!(f, "No activities.")?;
        }
        for activity in &self.activities {
            write!(f, "{activity}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}** {} (ID: {})", self.time.strftime("%H:%M"), self.title, self.id)?;
        if self.disrupted {
            write!(f, " ⚠ disrupted")?;
        }
        writeln!(f)?;

        if let Some(location) = &self.location {
            writeln!(f, "  - Location: {location}")?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "  - Notes: {notes}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            FlightKind::Departure => "Departure",
            FlightKind::Return => "Return",
        };
        write!(f, "- {label} on {}", self.date)?;

        let number = [self.airline.as_deref(), self.flight_number.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !number.is_empty() {
            write!(f, ", {number}")?;
        }
        match (&self.origin, &self.destination) {
            (Some(origin), Some(destination)) => write!(f, ", {origin} → {destination}")?,
            (Some(origin), None) => write!(f, ", from {origin}")?,
            (None, Some(destination)) => write!(f, ", to {destination}")?,
            (None, None) => {}
        }
        writeln!(f, " (ID: {})", self.id)
    }
}

impl fmt::Display for HotelStay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nights = self.nights();
        write!(
            f,
            "- {}: {} to {} ({nights} night{})",
            self.name,
            self.check_in,
            self.check_out,
            if nights == 1 { "" } else { "s" }
        )?;
        if let Some(address) = &self.address {
            write!(f, ", {address}")?;
        }
        writeln!(f, " (ID: {})", self.id)
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {}: {} (ID: {}) {}",
            self.client_name,
            self.destination,
            self.id,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if let Some(dates) = &self.dates {
            writeln!(f, "- **Dates**: {dates}")?;
        }
        writeln!(
            f,
            "- **Itinerary**: {} day(s), {} activit{}",
            self.day_count,
            self.activity_count,
            if self.activity_count == 1 { "y" } else { "ies" }
        )?;
        if self.disrupted_count > 0 {
            writeln!(f, "- **Disrupted activities**: {}", self.disrupted_count)?;
        }
        if let Some(issue) = &self.issue_summary {
            writeln!(f, "- **Issue**: {issue}")?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)?;

        Ok(())
    }
}
