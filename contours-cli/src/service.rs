//! Settings shared by the `fetch` and `session` commands.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use contours_core::{BuildingSource, DEFAULT_RADIUS_METRES, QueryPointError};
use contours_data::{OverpassBuildingSource, OverpassConfig};

use crate::{ARG_TIMEOUT_SECS, CliError};

/// Resolved service settings: where to search, how far, and where to save.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceConfig {
    /// Search radius in metres.
    pub(crate) radius_metres: f64,
    /// Directory receiving the map and downloads.
    pub(crate) output_dir: Utf8PathBuf,
    /// Overpass endpoint settings.
    pub(crate) overpass: OverpassConfig,
}

impl ServiceConfig {
    /// Apply defaults to the optional layered settings and validate them.
    pub(crate) fn resolve(
        radius: Option<f64>,
        output_dir: Option<Utf8PathBuf>,
        overpass_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let radius_metres = radius.unwrap_or(DEFAULT_RADIUS_METRES);
        if !(radius_metres.is_finite() && radius_metres > 0.0) {
            return Err(QueryPointError::InvalidRadius(radius_metres).into());
        }

        let mut overpass = OverpassConfig::default();
        if let Some(url) = overpass_url {
            overpass.url = url;
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(CliError::InvalidTimeout {
                    field: ARG_TIMEOUT_SECS,
                });
            }
            overpass = overpass.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            radius_metres,
            output_dir: output_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
            overpass,
        })
    }

    /// Make sure the output directory exists, creating it when missing.
    pub(crate) fn prepare_output_dir(&self) -> Result<(), CliError> {
        prepare_dir(&self.output_dir)
    }
}

fn prepare_dir(path: &Utf8Path) -> Result<(), CliError> {
    match contours_fs::open_utf8_dir(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => contours_fs::ensure_dir(path)
            .map_err(|source| CliError::PrepareOutputDirectory {
                path: path.to_path_buf(),
                source,
            }),
        Err(source) => match contours_fs::dir_is_dir(path) {
            Ok(false) => Err(CliError::OutputDirectoryNotDirectory {
                path: path.to_path_buf(),
            }),
            _ => Err(CliError::PrepareOutputDirectory {
                path: path.to_path_buf(),
                source,
            }),
        },
    }
}

/// Builds the building source for the current invocation.
pub(crate) trait SourceBuilder {
    fn build(&self, config: &OverpassConfig) -> Result<Box<dyn BuildingSource>, CliError>;
}

/// Builds the Overpass-backed source.
pub(crate) struct OverpassSourceBuilder;

impl SourceBuilder for OverpassSourceBuilder {
    fn build(&self, config: &OverpassConfig) -> Result<Box<dyn BuildingSource>, CliError> {
        let source = OverpassBuildingSource::with_config(config.clone()).map_err(|source| {
            CliError::BuildSource {
                url: config.url.clone(),
                source,
            }
        })?;
        Ok(Box::new(source))
    }
}
