//! `session` command: repeated searches read from standard input.
//!
//! Each `LAT LON` line triggers a fresh [`Shell`], so no state survives from
//! one search to the next. Malformed lines are reported and skipped; `quit`
//! or end of input ends the session.

use std::io::{BufRead, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use contours_core::QueryPoint;
use contours_export::TempDirExporter;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::service::{OverpassSourceBuilder, ServiceConfig, SourceBuilder};
use crate::shell::Shell;
use crate::{ARG_OUTPUT_DIR, ARG_OVERPASS_URL, ARG_RADIUS, ARG_TIMEOUT_SECS, CliError};

/// Prompt written before each line is read.
pub(crate) const PROMPT: &str = "Enter latitude and longitude (or 'quit'):";

/// CLI arguments for the `session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read `LAT LON` pairs from standard input and run one \
                 building contour search per line, saving the latest map \
                 and downloads into the output directory. Type `quit` or \
                 close the input to stop.",
    about = "Run building contour searches interactively"
)]
#[ortho_config(prefix = "BUILDING_CONTOURS")]
pub(crate) struct SessionArgs {
    /// Search radius in metres (default 800).
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Directory receiving the map and downloads (default: current directory).
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Request timeout in seconds (default 180).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<ServiceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServiceConfig::try_from(merged)
    }
}

impl TryFrom<SessionArgs> for ServiceConfig {
    type Error = CliError;

    fn try_from(args: SessionArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.radius,
            args.output_dir,
            args.overpass_url,
            args.timeout_secs,
        )
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionInput {
    /// Nothing to do.
    Blank,
    /// End the session.
    Quit,
    /// Search around a point.
    Search(QueryPoint),
    /// The line could not be understood; the message explains why.
    Invalid(String),
}

/// Interpret one line of input. Coordinates may be separated by whitespace
/// or a comma.
pub(crate) fn parse_line(line: &str, radius_metres: f64) -> SessionInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return SessionInput::Blank;
    }
    if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        return SessionInput::Quit;
    }

    let parts: Vec<&str> = trimmed
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [lat, lon] = parts.as_slice() else {
        return SessionInput::Invalid(format!("expected `LAT LON`, got {trimmed:?}"));
    };
    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return SessionInput::Invalid(format!("could not read coordinates from {trimmed:?}"));
    };
    match QueryPoint::with_radius(lat, lon, radius_metres) {
        Ok(query) => SessionInput::Search(query),
        Err(err) => SessionInput::Invalid(err.to_string()),
    }
}

pub(crate) fn run_session(args: SessionArgs) -> Result<(), CliError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout().lock();
    run_session_with(args, &OverpassSourceBuilder, &mut input, &mut stdout)
}

pub(crate) fn run_session_with(
    args: SessionArgs,
    builder: &dyn SourceBuilder,
    input: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.prepare_output_dir()?;
    let source = builder.build(&config.overpass)?;
    let exporter = TempDirExporter::new();

    let mut searches = 0_usize;
    let mut line = String::new();
    loop {
        writeln!(writer, "{PROMPT}").map_err(CliError::WriteOutput)?;
        writer.flush().map_err(CliError::WriteOutput)?;
        line.clear();
        if input.read_line(&mut line).map_err(CliError::ReadInput)? == 0 {
            break;
        }
        match parse_line(&line, config.radius_metres) {
            SessionInput::Blank => {}
            SessionInput::Quit => break,
            SessionInput::Invalid(message) => {
                writeln!(writer, "Invalid input: {message}").map_err(CliError::WriteOutput)?;
            }
            SessionInput::Search(query) => {
                let mut shell = Shell::new(source.as_ref(), &exporter, config.output_dir.clone());
                shell.trigger(&query, writer)?;
                searches += 1;
            }
        }
    }
    info!("session ended after {searches} searches");
    Ok(())
}

#[cfg(test)]
pub(crate) fn session_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ServiceConfig, CliError> {
    let merged = SessionArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ServiceConfig::try_from(merged)
}
