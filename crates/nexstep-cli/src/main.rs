//! NexStep CLI Application
//!
//! Command-line interface and MCP server for the NexStep itinerary status
//! engine.

mod args;
mod cli;
mod mcp;
mod renderer;
mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, NexstepMcpServer};
use nexstep_core::{params::ListTrips, AgencyBuilder, CommandReoptimizer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        time_zone,
        reoptimizer,
        command,
    } = Args::parse();

    let mut builder = AgencyBuilder::new()
        .with_database_path(database_file)
        .with_time_zone_name(time_zone);
    if let Some(command) = reoptimizer {
        info!("Using re-optimizer command: {command}");
        builder = builder.with_reoptimizer(Arc::new(CommandReoptimizer::new(command)));
    }
    let agency = builder
        .build()
        .await
        .context("Failed to initialize agency")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(agency.clone(), renderer);

    match command {
        Some(Trip { command }) => cli.handle_trip_command(command).await,
        Some(Day { command }) => cli.handle_day_command(command).await,
        Some(Activity { command }) => cli.handle_activity_command(command).await,
        Some(Flight { command }) => cli.handle_flight_command(command).await,
        Some(Hotel { command }) => cli.handle_hotel_command(command).await,
        Some(Timeline(args)) => cli.show_timeline(args).await,
        Some(Refresh) => cli.refresh().await,
        Some(Disruption { command }) => cli.handle_disruption_command(command).await,
        Some(Watch(args)) => cli.watch(args).await,
        Some(Serve) => {
            info!("Starting NexStep MCP server");
            run_stdio_server(NexstepMcpServer::new(agency))
                .await
                .context("MCP server failed")
        }
        None => cli.list_trips(&ListTrips::default()).await,
    }
}
