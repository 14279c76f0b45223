use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    ActivityCommands, DayCommands, DisruptionCommands, FlightCommands, HotelCommands,
    TimelineArgs, TripCommands, WatchArgs,
};

/// Live status engine for client travel itineraries
///
/// NexStep keeps trips (days, activities, flights and hotel stays) and
/// derives their live state from the clock: which activity is happening
/// now, how far along it is, and whether a trip has started or ended. It
/// can be used directly from the command line or run as an MCP (Model
/// Context Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "nexstep")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/nexstep/nexstep.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// IANA time zone activities are placed in, e.g. Europe/Lisbon.
    /// Defaults to the system time zone
    #[arg(long, global = true)]
    pub time_zone: Option<String>,

    /// Shell command that re-plans a disrupted day. It receives the
    /// disruption as JSON on stdin and must print the revised activities as
    /// JSON on stdout
    #[arg(long, global = true)]
    pub reoptimizer: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the NexStep CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage trips
    #[command(alias = "t")]
    Trip {
        #[command(subcommand)]
        command: TripCommands,
    },
    /// Manage the numbered days of a trip
    #[command(alias = "d")]
    Day {
        #[command(subcommand)]
        command: DayCommands,
    },
    /// Manage the activities of a day
    #[command(alias = "a")]
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    /// Manage flights
    #[command(alias = "f")]
    Flight {
        #[command(subcommand)]
        command: FlightCommands,
    },
    /// Manage hotel stays
    #[command(alias = "h")]
    Hotel {
        #[command(subcommand)]
        command: HotelCommands,
    },
    /// Show a trip's timeline with the live stage of every activity
    #[command(alias = "tl")]
    Timeline(TimelineArgs),
    /// Move every trip whose departure or end has passed to its next status
    Refresh,
    /// Report issues against activities
    Disruption {
        #[command(subcommand)]
        command: DisruptionCommands,
    },
    /// Follow a trip's timeline live until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),
    /// Start the MCP server
    Serve,
}
