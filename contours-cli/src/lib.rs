//! Command-line front end for fetching and exporting building contours.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fetch;
pub mod pipeline;
pub mod render;
mod service;
mod session;
pub mod shell;

pub use error::CliError;

use fetch::{FetchArgs, run_fetch};
use session::{SessionArgs, run_session};

const ARG_LAT: &str = "lat";
const ARG_LON: &str = "lon";
const ARG_RADIUS: &str = "radius";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";

/// Latitude searched when none is configured (Tel Aviv).
const DEFAULT_LAT: f64 = 32.0853;
/// Longitude searched when none is configured (Tel Aviv).
const DEFAULT_LON: f64 = 34.7818;

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Fetch(args) => run_fetch(args),
        Command::Session(args) => run_session(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "building-contours",
    about = "Fetch OpenStreetMap building footprints and export them as KML and Shapefile",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search once around a point and save the map and downloads.
    Fetch(FetchArgs),
    /// Search repeatedly for points read from standard input.
    Session(SessionArgs),
}

#[cfg(test)]
mod tests;
