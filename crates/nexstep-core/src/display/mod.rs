//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds wrappers for collections, operation results and the
//! live timeline view, so the same data can be formatted differently
//! depending on context. Everything renders as markdown, which the CLI feeds
//! to its terminal renderer and the MCP server returns verbatim.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │   Formatted     │
//! │ (Trip, Activity)│───▶│ & Result Types  │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (TripSummaries)
//! - [`results`]: Operation result types (CreateResult, UpdateResult,
//!   DeleteResult) and reports (disruption, refresh)
//! - [`timeline`]: The classified per-day timeline of a trip
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use jiff::Timestamp;
//! use nexstep_core::{
//!     display::{CreateResult, OperationStatus},
//!     models::{Trip, TripStatus},
//! };
//!
//! let trip = Trip {
//!     id: 1,
//!     client_name: "Ada Lovelace".to_string(),
//!     destination: "Lisbon".to_string(),
//!     dates: None,
//!     status: TripStatus::Draft,
//!     issue_summary: None,
//!     days: vec![],
//!     flights: vec![],
//!     hotels: vec![],
//!     created_at: Timestamp::now(),
//!     updated_at: Timestamp::now(),
//! };
//!
//! let output = CreateResult::new(trip).to_string();
//! assert!(output.contains("Created trip with ID: 1"));
//!
//! let status = OperationStatus::success("Flight 3 removed".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;
pub mod timeline;

pub use collections::TripSummaries;
pub use datetime::{LocalDateTime, TimeRange};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, StatusLevel};
pub use timeline::TimelineView;
