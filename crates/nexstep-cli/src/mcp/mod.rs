//! MCP server implementation for NexStep
//!
//! Exposes trips, their live timelines and the disruption flow to AI
//! assistants over the Model Context Protocol. Every tool delegates to
//! [`handlers::McpHandlers`], which renders the same markdown the CLI prints.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use nexstep_core::{Agency, StatusSession};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use handlers::{
    AddActivity, AddDay, AddFlight, AddHotel, CreateTrip, Id, ListTrips, McpResult,
    ReportDisruption, SetTripStatus, UpdateActivity,
};

/// MCP server for NexStep
#[derive(Clone)]
pub struct NexstepMcpServer {
    agency: Agency,
    status: Arc<Mutex<StatusSession>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NexstepMcpServer {
    /// Create a new NexStep MCP server. Must be called inside a Tokio
    /// runtime; the server's status session spawns its write worker there.
    pub fn new(agency: Agency) -> Self {
        let status = Arc::new(Mutex::new(agency.status_session()));
        Self {
            agency,
            status,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.agency.clone(), self.status.clone())
    }

    #[tool(
        name = "list_trips",
        description = "List trips, newest first. Optionally filter by status ('draft', 'upcoming', 'active', 'completed', 'disrupted'), by a substring of the client name, or by a substring of the destination. Returns trip IDs with day and activity counts."
    )]
    async fn list_trips(&self, params: Parameters<ListTrips>) -> McpResult {
        self.handlers().list_trips(params).await
    }

    #[tool(
        name = "show_trip",
        description = "Show one trip in full: status, issue summary, flights, hotel stays and every day with its activities in order. Use the trip ID from list_trips."
    )]
    async fn show_trip(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_trip(params).await
    }

    #[tool(
        name = "show_timeline",
        description = "Show a trip's timeline as of now. Every activity is placed on the calendar from the departure flight date and gets a live stage (upcoming, now happening, completed, disrupted, missed) with percent progress for the activity in progress. Trips without a departure flight cannot be placed on the calendar."
    )]
    async fn show_timeline(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_timeline(params).await
    }

    #[tool(
        name = "create_trip",
        description = "Create a new trip for a client. Requires client_name and destination; dates is free text such as '12-19 May'. Trips start as 'draft' unless a status is given. Flights and days are added separately."
    )]
    async fn create_trip(&self, params: Parameters<CreateTrip>) -> McpResult {
        self.handlers().create_trip(params).await
    }

    #[tool(
        name = "set_trip_status",
        description = "Set a trip's status by hand to one of 'draft', 'upcoming', 'active', 'completed' or 'disrupted'. Manual changes may go in any direction; use refresh_statuses to apply the automatic departure and completion transitions."
    )]
    async fn set_trip_status(&self, params: Parameters<SetTripStatus>) -> McpResult {
        self.handlers().set_trip_status(params).await
    }

    #[tool(
        name = "add_day",
        description = "Add a numbered day to a trip. Day 1 falls on the departure flight date, day 2 on the next calendar date, and so on. Day numbers are unique within a trip."
    )]
    async fn add_day(&self, params: Parameters<AddDay>) -> McpResult {
        self.handlers().add_day(params).await
    }

    #[tool(
        name = "add_activity",
        description = "Add an activity to a day. 'time' is the local start time as HH:MM. An activity ends when the next activity of the day starts; the last one of a day runs for two hours."
    )]
    async fn add_activity(&self, params: Parameters<AddActivity>) -> McpResult {
        self.handlers().add_activity(params).await
    }

    #[tool(
        name = "update_activity",
        description = "Update an activity's title, start time (HH:MM), location or notes, or set 'disrupted' to mark or clear a disruption. Only the fields provided are changed."
    )]
    async fn update_activity(&self, params: Parameters<UpdateActivity>) -> McpResult {
        self.handlers().update_activity(params).await
    }

    #[tool(
        name = "add_flight",
        description = "Add a flight to a trip. 'kind' is 'departure' or 'return' and 'date' is YYYY-MM-DD. The earliest departure flight anchors day 1 of the itinerary."
    )]
    async fn add_flight(&self, params: Parameters<AddFlight>) -> McpResult {
        self.handlers().add_flight(params).await
    }

    #[tool(
        name = "add_hotel",
        description = "Add a hotel stay to a trip with check_in and check_out dates (YYYY-MM-DD). Check-out must not be before check-in."
    )]
    async fn add_hotel(&self, params: Parameters<AddHotel>) -> McpResult {
        self.handlers().add_hotel(params).await
    }

    #[tool(
        name = "refresh_statuses",
        description = "Evaluate every trip against the current time and apply due transitions: upcoming trips become active on their departure date, and active or disrupted trips become completed once their last activity has ended. Returns one line per applied or failed transition."
    )]
    async fn refresh_statuses(&self) -> McpResult {
        self.handlers().refresh_statuses().await
    }

    #[tool(
        name = "report_disruption",
        description = "Report an issue (disruption_type such as 'weather', 'closure', 'delay', plus a description) against an activity. The trip becomes 'disrupted'. If a re-optimizer is configured the rest of that day is re-planned; otherwise the activity is only marked as disrupted and a notice explains why."
    )]
    async fn report_disruption(&self, params: Parameters<ReportDisruption>) -> McpResult {
        self.handlers().report_disruption(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for NexstepMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nexstep".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"NexStep keeps client travel itineraries and derives their live state from the clock.

## Core Concepts
- **Trips**: a client, a destination and a status (draft, upcoming, active, completed, disrupted)
- **Days**: numbered from 1; day 1 is the date of the earliest departure flight
- **Activities**: a local start time on a day; each runs until the next one starts, the last one of a day for two hours

## Workflow Examples

### Building an itinerary
1. `create_trip`, then `add_flight` with kind 'departure' to anchor the calendar
2. `add_day` for each day and `add_activity` for each stop
3. `show_timeline` to check the placement

### Following a trip
1. `refresh_statuses` moves trips forward as their departure and end pass
2. `show_timeline` shows which activity is happening now and how far along it is
3. `report_disruption` when something goes wrong on the ground

## Tool Categories
- **Trips**: list_trips, show_trip, create_trip, set_trip_status
- **Itinerary**: add_day, add_activity, update_activity, add_flight, add_hotel
- **Live state**: show_timeline, refresh_statuses, report_disruption"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: NexstepMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting NexStep MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
