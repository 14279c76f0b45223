//! Core library for the NexStep travel itinerary status engine.
//!
//! This crate tracks client trips (days, activities, flights, hotel stays)
//! and derives their live state from the current instant:
//!
//! - **Global clock** ([`clock`]): one shared ticking time source that views
//!   subscribe to
//! - **Timeline builder** ([`timeline`]): places each day's activities on
//!   the calendar and gives every activity an end bounded by its successor
//! - **Status classifier** ([`classifier`]): the single decision point for
//!   whether an activity is upcoming, happening, completed or disrupted
//! - **Lifecycle transitioner** ([`lifecycle`]): moves trips forward
//!   (`Upcoming → Active → Completed`) and persists the change in the
//!   background
//!
//! Persistence lives in [`db`], the high-level API in [`agency`], and
//! markdown rendering in [`display`].
//!
//! # Quick Start
//!
//! ```rust
//! use nexstep_core::{
//!     params::{AddFlight, CreateTrip, Id},
//!     AgencyBuilder, FlightKind,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let agency = AgencyBuilder::new()
//!     .with_database_path(Some("trips.db"))
//!     .build()
//!     .await?;
//!
//! let trip = agency
//!     .create_trip(&CreateTrip {
//!         client_name: "Ada Lovelace".to_string(),
//!         destination: "Lisbon".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! agency
//!     .add_flight(&AddFlight {
//!         trip_id: trip.id,
//!         kind: FlightKind::Departure,
//!         date: "2025-05-12".to_string(),
//!         airline: None,
//!         flight_number: None,
//!         origin: None,
//!         destination: None,
//!     })
//!     .await?;
//!
//! // The timeline is classified against the agency's clock
//! let view = agency.trip_timeline(&Id { id: trip.id }).await?;
//! println!("{view}");
//!
//! // Move any trip whose departure or end has passed
//! let report = agency.refresh_statuses().await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod agency;
pub mod classifier;
pub mod clock;
pub mod db;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod params;
pub mod reoptimize;
pub mod timeline;

// Re-export commonly used types
pub use agency::{Agency, AgencyBuilder, DisruptionReport, RefreshReport, StatusSession};
pub use classifier::{classify, ActivityStage, ActivityStatus, Interval};
pub use clock::{GlobalClock, ManualClock, SystemClock, TimeSource};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, OperationStatus, TimelineView, TripSummaries, UpdateResult,
};
pub use error::{NexstepError, Result};
pub use lifecycle::{evaluate_trip, LifecycleTransitioner, Transition, TransitionReason};
pub use models::{
    Activity, Day, Flight, FlightKind, HotelStay, Trip, TripFilter, TripStatus, TripSummary,
};
pub use reoptimize::{CommandReoptimizer, Reoptimizer};
pub use timeline::{trip_timeline, DayTimeline, SequencedActivity};
