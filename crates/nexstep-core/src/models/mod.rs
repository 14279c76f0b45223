//! Data models for trips, days, activities, flights and hotel stays.
//!
//! These are the persisted entities. Derived views (sequenced timelines,
//! activity stages) live in [`crate::timeline`] and [`crate::classifier`];
//! Display implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use jiff::{civil::date, Timestamp};
//! use nexstep_core::models::{Flight, FlightKind, Trip, TripStatus};
//!
//! let trip = Trip {
//!     id: 1,
//!     client_name: "Ada Lovelace".to_string(),
//!     destination: "Lisbon".to_string(),
//!     dates: Some("12–15 May".to_string()),
//!     status: TripStatus::Upcoming,
//!     issue_summary: None,
//!     days: vec![],
//!     flights: vec![Flight {
//!         id: 1,
//!         trip_id: 1,
//!         kind: FlightKind::Departure,
//!         date: date(2025, 5, 12),
//!         airline: None,
//!         flight_number: None,
//!         origin: None,
//!         destination: None,
//!     }],
//!     hotels: vec![],
//!     created_at: Timestamp::UNIX_EPOCH,
//!     updated_at: Timestamp::UNIX_EPOCH,
//! };
//! assert_eq!(trip.anchor_date(), Some(date(2025, 5, 12)));
//! ```

pub mod day;
pub mod filters;
pub mod requests;
pub mod status;
pub mod summary;
pub mod travel;
pub mod trip;


pub use day::{Activity, Day};
pub use filters::TripFilter;
pub use requests::{UpdateActivityRequest, UpdateTripRequest};
pub use status::{FlightKind, TripStatus};
pub use summary::TripSummary;
pub use travel::{Flight, HotelStay};
pub use trip::Trip;
