//! MCP tool handlers implementation

use std::{sync::Arc, time::Duration};

use log::debug;
use nexstep_core::{display::OperationStatus, params as core, Agency, StatusSession};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types only derive `JsonSchema` behind the `schema` feature.
// The wrapper is `#[serde(transparent)]` so the JSON shape is exactly that of
// the wrapped type, while the MCP-facing trait bounds stay in this crate.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type ListTrips = McpParams<core::ListTrips>;
pub type CreateTrip = McpParams<core::CreateTrip>;
pub type SetTripStatus = McpParams<core::SetTripStatus>;
pub type AddDay = McpParams<core::AddDay>;
pub type AddActivity = McpParams<core::AddActivity>;
pub type UpdateActivity = McpParams<core::UpdateActivity>;
pub type AddFlight = McpParams<core::AddFlight>;
pub type AddHotel = McpParams<core::AddHotel>;
pub type ReportDisruption = McpParams<core::ReportDisruption>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(markdown: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        markdown.to_string(),
    )]))
}

/// How long `refresh_statuses` waits for its writes before answering.
const STATUS_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Handler implementations for the MCP server
pub struct McpHandlers {
    agency: Agency,
    status: Arc<Mutex<StatusSession>>,
}

impl McpHandlers {
    pub fn new(agency: Agency, status: Arc<Mutex<StatusSession>>) -> Self {
        Self { agency, status }
    }

    pub async fn list_trips(&self, Parameters(params): Parameters<ListTrips>) -> McpResult {
        debug!("list_trips: {params:?}");

        let summaries = self
            .agency
            .list_trips_summary(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list trips", &e))?;

        if summaries.is_empty() {
            return text(OperationStatus::success("No trips found.".to_string()));
        }
        text(format!("# Trips\n\n{summaries}"))
    }

    pub async fn show_trip(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_trip: {params:?}");

        let trip = self
            .agency
            .show_trip(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get trip", &e))?;

        match trip {
            Some(trip) => text(trip),
            None => text(OperationStatus::failure(format!(
                "Trip with ID {} not found",
                params.as_ref().id
            ))),
        }
    }

    pub async fn show_timeline(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_timeline: {params:?}");

        let view = self
            .agency
            .trip_timeline(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to build timeline", &e))?;
        text(view)
    }

    pub async fn create_trip(&self, Parameters(params): Parameters<CreateTrip>) -> McpResult {
        debug!("create_trip: {params:?}");

        let result = self
            .agency
            .create_trip_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create trip", &e))?;
        text(result)
    }

    pub async fn set_trip_status(
        &self,
        Parameters(params): Parameters<SetTripStatus>,
    ) -> McpResult {
        debug!("set_trip_status: {params:?}");

        let result = self
            .agency
            .set_trip_status_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to set trip status", &e))?;
        text(result)
    }

    pub async fn add_day(&self, Parameters(params): Parameters<AddDay>) -> McpResult {
        debug!("add_day: {params:?}");

        let result = self
            .agency
            .add_day_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add day", &e))?;
        text(result)
    }

    pub async fn add_activity(&self, Parameters(params): Parameters<AddActivity>) -> McpResult {
        debug!("add_activity: {params:?}");

        let result = self
            .agency
            .add_activity_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add activity", &e))?;
        text(result)
    }

    pub async fn update_activity(
        &self,
        Parameters(params): Parameters<UpdateActivity>,
    ) -> McpResult {
        debug!("update_activity: {params:?}");

        let result = self
            .agency
            .update_activity_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update activity", &e))?;
        text(result)
    }

    pub async fn add_flight(&self, Parameters(params): Parameters<AddFlight>) -> McpResult {
        debug!("add_flight: {params:?}");

        let result = self
            .agency
            .add_flight_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add flight", &e))?;
        text(result)
    }

    pub async fn add_hotel(&self, Parameters(params): Parameters<AddHotel>) -> McpResult {
        debug!("add_hotel: {params:?}");

        let result = self
            .agency
            .add_hotel_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add hotel stay", &e))?;
        text(result)
    }

    pub async fn refresh_statuses(&self) -> McpResult {
        debug!("refresh_statuses");

        let report = self
            .status
            .lock()
            .await
            .refresh_and_settle(STATUS_SETTLE_TIMEOUT)
            .await
            .map_err(|e| to_mcp_error("Failed to refresh trip statuses", &e))?;
        text(report)
    }

    pub async fn report_disruption(
        &self,
        Parameters(params): Parameters<ReportDisruption>,
    ) -> McpResult {
        debug!("report_disruption: {params:?}");

        let report = self
            .agency
            .report_disruption(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to report disruption", &e))?;
        text(report)
    }
}
