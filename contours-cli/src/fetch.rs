//! `fetch` command: one search, one result.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use contours_core::QueryPoint;
use contours_export::TempDirExporter;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::service::{OverpassSourceBuilder, ServiceConfig, SourceBuilder};
use crate::shell::Shell;
use crate::{
    ARG_LAT, ARG_LON, ARG_OUTPUT_DIR, ARG_OVERPASS_URL, ARG_RADIUS, ARG_TIMEOUT_SECS, CliError,
    DEFAULT_LAT, DEFAULT_LON,
};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch every building footprint within a radius of a point \
                 from OpenStreetMap, then save an interactive map together \
                 with KML and zipped Shapefile downloads. Settings can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Fetch building contours around a point"
)]
#[ortho_config(prefix = "BUILDING_CONTOURS")]
pub(crate) struct FetchArgs {
    /// Latitude of the search centre in decimal degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre in decimal degrees.
    #[arg(long = ARG_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
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

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FetchConfig {
    /// Validated search centre and radius.
    pub(crate) query: QueryPoint,
    /// Output and endpoint settings.
    pub(crate) service: ServiceConfig,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let service =
            ServiceConfig::resolve(args.radius, args.output_dir, args.overpass_url, args.timeout_secs)?;
        let query = QueryPoint::with_radius(
            args.lat.unwrap_or(DEFAULT_LAT),
            args.lon.unwrap_or(DEFAULT_LON),
            service.radius_metres,
        )?;
        Ok(Self { query, service })
    }
}

pub(crate) fn run_fetch(args: FetchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fetch_with(args, &OverpassSourceBuilder, &mut stdout)
}

pub(crate) fn run_fetch_with(
    args: FetchArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.service.prepare_output_dir()?;
    let source = builder.build(&config.service.overpass)?;
    let exporter = TempDirExporter::new();
    let mut shell = Shell::new(source.as_ref(), &exporter, config.service.output_dir);
    shell.trigger(&config.query, writer)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}
