//! One fetch → filter → render → export pass.
//!
//! Failures are folded into [`PipelineOutcome::Failed`] so callers present
//! them as messages instead of unwinding.

use camino::Utf8PathBuf;
use contours_core::{BuildingContours, BuildingSource, FetchError, QueryPoint, filter_polygons};
use contours_export::{ContourExporter, ExportError, ExportedFiles};
use log::{debug, info, warn};
use thiserror::Error;

use crate::render::MapView;

/// Failures that end an interaction without ending the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching map data failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Producing the downloads failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Saving the map or a download into the output directory failed.
    #[error("failed to save {path}: {source}")]
    SaveArtefact {
        /// Destination of the artefact.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An artefact left by an earlier search could not be removed.
    #[error("failed to remove stale {path}: {source}")]
    RemoveArtefact {
        /// Location of the stale artefact.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The result of a single interaction.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Footprints were found, rendered and exported.
    Found {
        /// The filtered footprints.
        contours: BuildingContours,
        /// Map centred on the query point.
        map: MapView,
        /// KML and zipped Shapefile downloads.
        files: ExportedFiles,
    },
    /// The area holds no polygon footprints; nothing was rendered or exported.
    Empty,
    /// A stage failed.
    Failed(PipelineError),
}

/// Run the pipeline for `query`.
pub fn run_pipeline(
    query: &QueryPoint,
    source: &dyn BuildingSource,
    exporter: &dyn ContourExporter,
) -> PipelineOutcome {
    match try_run(query, source, exporter) {
        Ok(Some((contours, map, files))) => PipelineOutcome::Found {
            contours,
            map,
            files,
        },
        Ok(None) => PipelineOutcome::Empty,
        Err(err) => {
            warn!("building contour pipeline failed: {err}");
            PipelineOutcome::Failed(err)
        }
    }
}

fn try_run(
    query: &QueryPoint,
    source: &dyn BuildingSource,
    exporter: &dyn ContourExporter,
) -> Result<Option<(BuildingContours, MapView, ExportedFiles)>, PipelineError> {
    let records = source.fetch_buildings(query)?;
    let fetched = records.len();
    let contours = filter_polygons(records);
    debug!(
        "kept {} of {fetched} records as building contours",
        contours.len()
    );
    if contours.is_empty() {
        info!("no building contours around {query}");
        return Ok(None);
    }

    let map = MapView::new(&contours, query);
    let files = exporter.export(&contours)?;
    Ok(Some((contours, map, files)))
}
