//! Command-line argument wrappers and the command executor
//!
//! Every command has a clap-derived argument struct that converts into the
//! matching core parameter type, so clap attributes never leak into
//! `nexstep-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Agency → Display wrapper
//! ```
//!
//! [`Cli`] then runs the command against an [`Agency`] and renders the
//! markdown the core produces.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use nexstep_core::{
    display::OperationStatus,
    params::*,
    Agency, FlightKind, TripStatus,
};

use crate::{renderer::TerminalRenderer, watch};

// ============================================================================
// Trip arguments
// ============================================================================

/// Trip status as accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TripStatusArg {
    Draft,
    Upcoming,
    Active,
    Completed,
    Disrupted,
}

impl From<TripStatusArg> for TripStatus {
    fn from(val: TripStatusArg) -> Self {
        match val {
            TripStatusArg::Draft => TripStatus::Draft,
            TripStatusArg::Upcoming => TripStatus::Upcoming,
            TripStatusArg::Active => TripStatus::Active,
            TripStatusArg::Completed => TripStatus::Completed,
            TripStatusArg::Disrupted => TripStatus::Disrupted,
        }
    }
}

/// Create a new trip
#[derive(Args)]
pub struct CreateTripArgs {
    /// Name of the travelling client
    pub client: String,
    /// Destination shown to the client
    pub destination: String,
    /// Free-text date range, e.g. "12-19 May"
    #[arg(long)]
    pub dates: Option<String>,
    /// Initial status (defaults to draft)
    #[arg(short, long)]
    pub status: Option<TripStatusArg>,
}

impl From<CreateTripArgs> for CreateTrip {
    fn from(val: CreateTripArgs) -> Self {
        CreateTrip {
            client_name: val.client,
            destination: val.destination,
            dates: val.dates,
            status: val.status.map(Into::into),
        }
    }
}

/// List trips, newest first
#[derive(Args)]
pub struct ListTripsArgs {
    /// Only list trips in this status
    #[arg(short, long)]
    pub status: Option<TripStatusArg>,
    /// Only list trips whose client name contains this text
    #[arg(short, long)]
    pub client: Option<String>,
    /// Only list trips whose destination contains this text
    #[arg(short, long)]
    pub destination: Option<String>,
}

impl From<ListTripsArgs> for ListTrips {
    fn from(val: ListTripsArgs) -> Self {
        ListTrips {
            status: val.status.map(Into::into),
            client: val.client,
            destination: val.destination,
        }
    }
}

/// Identifies a single record
#[derive(Args)]
pub struct IdArgs {
    /// Unique identifier of the record
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Update a trip's details
#[derive(Args)]
pub struct UpdateTripArgs {
    /// Unique identifier of the trip to update
    pub id: u64,
    #[arg(short, long, help = "New client name")]
    pub client: Option<String>,
    #[arg(short, long, help = "New destination")]
    pub destination: Option<String>,
    #[arg(long, help = "New free-text date range")]
    pub dates: Option<String>,
    #[arg(long, help = "Replace the issue summary")]
    pub issue: Option<String>,
}

impl From<UpdateTripArgs> for UpdateTrip {
    fn from(val: UpdateTripArgs) -> Self {
        UpdateTrip {
            id: val.id,
            client_name: val.client,
            destination: val.destination,
            dates: val.dates,
            status: None,
            issue_summary: val.issue,
        }
    }
}

/// Set a trip's status by hand
///
/// Manual changes may move in any direction. Automatic transitions (see
/// `refresh`) only ever move a trip forward.
#[derive(Args)]
pub struct SetStatusArgs {
    /// Unique identifier of the trip
    pub id: u64,
    /// The new status
    pub status: TripStatusArg,
}

impl From<SetStatusArgs> for SetTripStatus {
    fn from(val: SetStatusArgs) -> Self {
        SetTripStatus {
            id: val.id,
            status: TripStatus::from(val.status).as_str().to_string(),
        }
    }
}

/// Delete a trip permanently
#[derive(Args)]
pub struct DeleteTripArgs {
    /// Unique identifier of the trip to permanently delete
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteTripArgs> for DeleteTrip {
    fn from(val: DeleteTripArgs) -> Self {
        DeleteTrip {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum TripCommands {
    /// Create a new trip
    #[command(alias = "c")]
    Create(CreateTripArgs),
    /// List trips
    #[command(aliases = ["l", "ls"])]
    List(ListTripsArgs),
    /// Show a trip with flights, hotels and its full itinerary
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update a trip's details
    #[command(alias = "u")]
    Update(UpdateTripArgs),
    /// Set a trip's status by hand
    Status(SetStatusArgs),
    /// Delete a trip permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTripArgs),
}

// ============================================================================
// Day and activity arguments
// ============================================================================

/// Add a numbered day to a trip
#[derive(Args)]
pub struct AddDayArgs {
    /// Unique identifier of the trip
    pub trip_id: u64,
    /// Day number, starting at 1 on the departure date
    pub day_number: u32,
    /// Optional heading such as "Arrival in Kyoto"
    #[arg(short, long)]
    pub title: Option<String>,
}

impl From<AddDayArgs> for AddDay {
    fn from(val: AddDayArgs) -> Self {
        AddDay {
            trip_id: val.trip_id,
            day_number: val.day_number,
            title: val.title,
        }
    }
}

#[derive(Subcommand)]
pub enum DayCommands {
    /// Add a numbered day to a trip
    #[command(alias = "a")]
    Add(AddDayArgs),
    /// Delete a day together with its activities
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

/// Add an activity to a day
#[derive(Args)]
pub struct AddActivityArgs {
    /// Unique identifier of the day
    pub day_id: u64,
    /// Local start time, HH:MM
    pub time: String,
    /// Title of the activity
    pub title: String,
    #[arg(short, long, help = "Where the activity takes place")]
    pub location: Option<String>,
    #[arg(short, long, help = "Notes for the agent or client")]
    pub notes: Option<String>,
}

impl From<AddActivityArgs> for AddActivity {
    fn from(val: AddActivityArgs) -> Self {
        AddActivity {
            day_id: val.day_id,
            time: val.time,
            title: val.title,
            location: val.location,
            notes: val.notes,
        }
    }
}

/// Update an activity
#[derive(Args)]
pub struct UpdateActivityArgs {
    /// Unique identifier of the activity
    pub id: u64,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(long, help = "New local start time, HH:MM")]
    pub time: Option<String>,
    #[arg(short, long, help = "New location")]
    pub location: Option<String>,
    #[arg(short, long, help = "New notes")]
    pub notes: Option<String>,
    #[arg(long, help = "Mark the activity as disrupted")]
    pub disrupted: bool,
    #[arg(long, conflicts_with = "disrupted", help = "Clear the disruption marker")]
    pub restored: bool,
}

impl From<UpdateActivityArgs> for UpdateActivity {
    fn from(val: UpdateActivityArgs) -> Self {
        let disrupted = match (val.disrupted, val.restored) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        UpdateActivity {
            id: val.id,
            title: val.title,
            time: val.time,
            location: val.location,
            notes: val.notes,
            disrupted,
        }
    }
}

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Add an activity to a day
    #[command(alias = "a")]
    Add(AddActivityArgs),
    /// Show a single activity
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update an activity
    #[command(alias = "u")]
    Update(UpdateActivityArgs),
    /// Delete an activity
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Flight and hotel arguments
// ============================================================================

/// Leg of the trip a flight belongs to
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FlightKindArg {
    /// Outbound flight; its date is day 1 of the itinerary
    #[value(alias = "outbound")]
    Departure,
    /// Homebound flight
    #[value(alias = "inbound")]
    Return,
}

impl From<FlightKindArg> for FlightKind {
    fn from(val: FlightKindArg) -> Self {
        match val {
            FlightKindArg::Departure => FlightKind::Departure,
            FlightKindArg::Return => FlightKind::Return,
        }
    }
}

/// Add a flight to a trip
#[derive(Args)]
pub struct AddFlightArgs {
    /// Unique identifier of the trip
    pub trip_id: u64,
    /// Departure or return leg
    pub kind: FlightKindArg,
    /// Flight date, YYYY-MM-DD
    pub date: String,
    #[arg(long)]
    pub airline: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long, help = "Origin airport or city")]
    pub from: Option<String>,
    #[arg(long, help = "Destination airport or city")]
    pub to: Option<String>,
}

impl From<AddFlightArgs> for AddFlight {
    fn from(val: AddFlightArgs) -> Self {
        AddFlight {
            trip_id: val.trip_id,
            kind: val.kind.into(),
            date: val.date,
            airline: val.airline,
            flight_number: val.number,
            origin: val.from,
            destination: val.to,
        }
    }
}

#[derive(Subcommand)]
pub enum FlightCommands {
    /// Add a flight to a trip
    #[command(alias = "a")]
    Add(AddFlightArgs),
    /// Remove a flight
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

/// Add a hotel stay to a trip
#[derive(Args)]
pub struct AddHotelArgs {
    /// Unique identifier of the trip
    pub trip_id: u64,
    /// Hotel name
    pub name: String,
    /// Check-in date, YYYY-MM-DD
    pub check_in: String,
    /// Check-out date, YYYY-MM-DD
    pub check_out: String,
    #[arg(short, long)]
    pub address: Option<String>,
}

impl From<AddHotelArgs> for AddHotel {
    fn from(val: AddHotelArgs) -> Self {
        AddHotel {
            trip_id: val.trip_id,
            name: val.name,
            check_in: val.check_in,
            check_out: val.check_out,
            address: val.address,
        }
    }
}

#[derive(Subcommand)]
pub enum HotelCommands {
    /// Add a hotel stay to a trip
    #[command(alias = "a")]
    Add(AddHotelArgs),
    /// Remove a hotel stay
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Timeline, disruption and watch arguments
// ============================================================================

/// Show a trip's timeline
#[derive(Args)]
pub struct TimelineArgs {
    /// Unique identifier of the trip
    pub trip_id: u64,
}

/// Report an issue against an activity
///
/// The trip becomes disrupted. If a re-optimizer is configured, the rest of
/// the day is re-planned around the issue; otherwise the activity is only
/// marked as disrupted.
#[derive(Args)]
pub struct ReportDisruptionArgs {
    /// Unique identifier of the affected activity
    pub activity_id: u64,
    /// Kind of issue, e.g. weather, closure, delay
    #[arg(short, long)]
    pub kind: String,
    /// What happened
    #[arg(short, long)]
    pub description: String,
}

impl From<ReportDisruptionArgs> for ReportDisruption {
    fn from(val: ReportDisruptionArgs) -> Self {
        ReportDisruption {
            activity_id: val.activity_id,
            disruption_type: val.kind,
            description: val.description,
        }
    }
}

#[derive(Subcommand)]
pub enum DisruptionCommands {
    /// Report an issue against an activity
    #[command(alias = "r")]
    Report(ReportDisruptionArgs),
}

/// Follow a trip's timeline live
#[derive(Args)]
pub struct WatchArgs {
    /// Unique identifier of the trip
    pub trip_id: u64,
    /// Seconds between clock ticks
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_seconds: u64,
    /// Seconds between trip status refreshes
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_seconds: u64,
}

// ============================================================================
// Command executor
// ============================================================================

/// Runs parsed commands against an agency and renders the result.
pub struct Cli {
    agency: Agency,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(agency: Agency, renderer: TerminalRenderer) -> Self {
        Self { agency, renderer }
    }

    pub async fn handle_trip_command(self, command: TripCommands) -> Result<()> {
        let output = match command {
            TripCommands::Create(args) => self
                .agency
                .create_trip_result(&args.into())
                .await
                .context("Failed to create trip")?
                .to_string(),
            TripCommands::List(args) => return self.list_trips(&args.into()).await,
            TripCommands::Show(args) => {
                let id: Id = args.into();
                self.agency
                    .show_trip(&id)
                    .await
                    .context("Failed to get trip")?
                    .ok_or_else(|| anyhow!("Trip with ID {} not found", id.id))?
                    .to_string()
            }
            TripCommands::Update(args) => self
                .agency
                .update_trip_result(&args.into())
                .await
                .context("Failed to update trip")?
                .to_string(),
            TripCommands::Status(args) => self
                .agency
                .set_trip_status_result(&args.into())
                .await
                .context("Failed to set trip status")?
                .to_string(),
            TripCommands::Delete(args) => self
                .agency
                .delete_trip_result(&args.into())
                .await
                .context("Failed to delete trip")?
                .to_string(),
        };
        self.renderer.render(&output)
    }

    pub async fn handle_day_command(self, command: DayCommands) -> Result<()> {
        let output = match command {
            DayCommands::Add(args) => self
                .agency
                .add_day_result(&args.into())
                .await
                .context("Failed to add day")?
                .to_string(),
            DayCommands::Delete(args) => {
                let id: Id = args.into();
                self.agency
                    .delete_day(&id)
                    .await
                    .context("Failed to delete day")?;
                OperationStatus::success(format!("Deleted day with ID {}", id.id)).to_string()
            }
        };
        self.renderer.render(&output)
    }

    pub async fn handle_activity_command(self, command: ActivityCommands) -> Result<()> {
        let output = match command {
            ActivityCommands::Add(args) => self
                .agency
                .add_activity_result(&args.into())
                .await
                .context("Failed to add activity")?
                .to_string(),
            ActivityCommands::Show(args) => {
                let id: Id = args.into();
                self.agency
                    .get_activity(&id)
                    .await
                    .context("Failed to get activity")?
                    .ok_or_else(|| anyhow!("Activity with ID {} not found", id.id))?
                    .to_string()
            }
            ActivityCommands::Update(args) => self
                .agency
                .update_activity_result(&args.into())
                .await
                .context("Failed to update activity")?
                .to_string(),
            ActivityCommands::Delete(args) => self
                .agency
                .delete_activity_result(&args.into())
                .await
                .context("Failed to delete activity")?
                .to_string(),
        };
        self.renderer.render(&output)
    }

    pub async fn handle_flight_command(self, command: FlightCommands) -> Result<()> {
        let output = match command {
            FlightCommands::Add(args) => self
                .agency
                .add_flight_result(&args.into())
                .await
                .context("Failed to add flight")?
                .to_string(),
            FlightCommands::Delete(args) => {
                let id: Id = args.into();
                let trip_id = self
                    .agency
                    .delete_flight(&id)
                    .await
                    .context("Failed to delete flight")?;
                OperationStatus::success(format!(
                    "Removed flight with ID {} from trip {trip_id}",
                    id.id
                ))
                .to_string()
            }
        };
        self.renderer.render(&output)
    }

    pub async fn handle_hotel_command(self, command: HotelCommands) -> Result<()> {
        let output = match command {
            HotelCommands::Add(args) => self
                .agency
                .add_hotel_result(&args.into())
                .await
                .context("Failed to add hotel stay")?
                .to_string(),
            HotelCommands::Delete(args) => {
                let id: Id = args.into();
                let trip_id = self
                    .agency
                    .delete_hotel(&id)
                    .await
                    .context("Failed to delete hotel stay")?;
                OperationStatus::success(format!(
                    "Removed hotel stay with ID {} from trip {trip_id}",
                    id.id
                ))
                .to_string()
            }
        };
        self.renderer.render(&output)
    }

    pub async fn handle_disruption_command(self, command: DisruptionCommands) -> Result<()> {
        match command {
            DisruptionCommands::Report(args) => {
                let report = self
                    .agency
                    .report_disruption(&args.into())
                    .await
                    .context("Failed to report disruption")?;
                self.renderer.render(&report.to_string())
            }
        }
    }

    pub async fn show_timeline(self, args: TimelineArgs) -> Result<()> {
        let view = self
            .agency
            .trip_timeline(&Id { id: args.trip_id })
            .await
            .context("Failed to build timeline")?;
        self.renderer.render(&view.to_string())
    }

    pub async fn refresh(self) -> Result<()> {
        let report = self
            .agency
            .refresh_statuses()
            .await
            .context("Failed to refresh trip statuses")?;
        self.renderer.render(&report.to_string())
    }

    pub async fn watch(self, args: WatchArgs) -> Result<()> {
        watch::run(
            self.agency,
            self.renderer,
            args.trip_id,
            Duration::from_secs(args.tick_seconds),
            Duration::from_secs(args.refresh_seconds),
        )
        .await
    }

    pub async fn list_trips(self, params: &ListTrips) -> Result<()> {
        let summaries = self
            .agency
            .list_trips_summary(params)
            .await
            .context("Failed to list trips")?;

        let title = match params.status {
            Some(status) => format!("{} trips", status.with_icon()),
            None => "Trips".to_string(),
        };
        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }
}
