//! Presentation shell: Idle → Fetching → Result.
//!
//! A [`Shell`] handles exactly one search. Starting another search means
//! building a fresh shell, the command-line analogue of reloading the page.
//!
//! The output directory only ever holds the artefacts of the latest search:
//! artefacts from an earlier search are removed before fetching, and a
//! search whose artefacts cannot all be saved leaves none behind.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use contours_core::{BuildingSource, QueryPoint};
use contours_export::{ContourExporter, ExportedFiles, KML_FILE_NAME, ZIP_FILE_NAME};
use log::{debug, warn};

use crate::CliError;
use crate::pipeline::{PipelineError, PipelineOutcome, run_pipeline};
use crate::render::MapView;

/// File name of the rendered map.
pub const MAP_FILE_NAME: &str = "building_contours_map.html";

/// Warning shown when the area holds no footprints.
pub const EMPTY_WARNING: &str = "No building contours found for the specified location.";

/// Prefix of the message shown when a stage fails.
pub const ERROR_PREFIX: &str = "An error occurred while fetching building contours";

/// Every file a search may leave in the output directory.
const ARTEFACT_FILE_NAMES: [&str; 3] = [MAP_FILE_NAME, KML_FILE_NAME, ZIP_FILE_NAME];

/// Where a shell is in its single interaction.
#[derive(Debug)]
pub enum ShellState {
    /// Waiting for a trigger.
    Idle,
    /// A search is in flight.
    Fetching,
    /// The search finished; the shell is spent.
    Result(PipelineOutcome),
}

/// Front end for a single search, writing messages to a text stream and
/// saving artefacts into an output directory.
pub struct Shell<'a> {
    source: &'a dyn BuildingSource,
    exporter: &'a dyn ContourExporter,
    output_dir: Utf8PathBuf,
    state: ShellState,
}

impl<'a> Shell<'a> {
    /// Create an idle shell.
    pub fn new(
        source: &'a dyn BuildingSource,
        exporter: &'a dyn ContourExporter,
        output_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            source,
            exporter,
            output_dir: output_dir.into(),
            state: ShellState::Idle,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &ShellState {
        &self.state
    }

    /// Run the search for `query` and present its outcome on `out`.
    ///
    /// Fetch, export and save failures become a [`PipelineOutcome::Failed`]
    /// result presented as a message. Only a spent shell or unwritable `out`
    /// are errors.
    pub fn trigger(
        &mut self,
        query: &QueryPoint,
        out: &mut dyn Write,
    ) -> Result<&ShellState, CliError> {
        if !matches!(self.state, ShellState::Idle) {
            return Err(CliError::ShellNotIdle);
        }
        writeln!(out, "Fetching building contours around {query}...")
            .map_err(CliError::WriteOutput)?;
        self.state = ShellState::Fetching;
        debug!("shell fetching around {query}");

        let outcome = match clear_artefacts(&self.output_dir) {
            Ok(()) => {
                let outcome = run_pipeline(query, self.source, self.exporter);
                save_artefacts(outcome, &self.output_dir)
            }
            Err(err) => PipelineOutcome::Failed(err),
        };
        self.state = ShellState::Result(outcome);

        if let ShellState::Result(outcome) = &self.state {
            present(outcome, &self.output_dir, out)?;
        }
        Ok(&self.state)
    }
}

fn present(
    outcome: &PipelineOutcome,
    output_dir: &Utf8Path,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match outcome {
        PipelineOutcome::Found {
            contours, files, ..
        } => {
            writeln!(out, "Found {} building contours.", contours.len())
                .map_err(CliError::WriteOutput)?;
            writeln!(out, "Map: {}", output_dir.join(MAP_FILE_NAME))
                .map_err(CliError::WriteOutput)?;
            for download in files.iter() {
                writeln!(out, "Download: {}", output_dir.join(&download.file_name))
                    .map_err(CliError::WriteOutput)?;
            }
        }
        PipelineOutcome::Empty => {
            writeln!(out, "{EMPTY_WARNING}").map_err(CliError::WriteOutput)?;
        }
        PipelineOutcome::Failed(err) => {
            writeln!(out, "{ERROR_PREFIX}: {err}").map_err(CliError::WriteOutput)?;
        }
    }
    Ok(())
}

/// Save the map and downloads of a `Found` outcome, turning it into a
/// failure when any artefact cannot be written.
fn save_artefacts(outcome: PipelineOutcome, output_dir: &Utf8Path) -> PipelineOutcome {
    let PipelineOutcome::Found { map, files, .. } = &outcome else {
        return outcome;
    };
    match write_all(output_dir, map, files) {
        Ok(()) => outcome,
        Err(err) => {
            if let Err(cleanup) = clear_artefacts(output_dir) {
                warn!("partial artefacts left in {output_dir}: {cleanup}");
            }
            PipelineOutcome::Failed(err)
        }
    }
}

fn write_all(
    output_dir: &Utf8Path,
    map: &MapView,
    files: &ExportedFiles,
) -> Result<(), PipelineError> {
    save(output_dir, MAP_FILE_NAME, map.to_html().as_bytes())?;
    for download in files.iter() {
        save(output_dir, &download.file_name, &download.bytes)?;
    }
    Ok(())
}

fn save(output_dir: &Utf8Path, file_name: &str, bytes: &[u8]) -> Result<(), PipelineError> {
    let path = output_dir.join(file_name);
    contours_fs::write_utf8_file(&path, bytes)
        .map_err(|source| PipelineError::SaveArtefact { path, source })
}

/// Remove whatever an earlier search saved into `output_dir`.
fn clear_artefacts(output_dir: &Utf8Path) -> Result<(), PipelineError> {
    for name in ARTEFACT_FILE_NAMES {
        let path = output_dir.join(name);
        match contours_fs::remove_utf8_file(&path) {
            Ok(true) => debug!("removed stale {path}"),
            Ok(false) => {}
            Err(source) => return Err(PipelineError::RemoveArtefact { path, source }),
        }
    }
    Ok(())
}
