//! Error types emitted by the building-contours CLI.
//!
//! Pipeline failures (fetch, export, saving artefacts) are not represented
//! here: they are shown to the user as messages and never abort the process.
//! `CliError` covers arguments, configuration, the output directory and the
//! terminal streams only.

use std::sync::Arc;

use camino::Utf8PathBuf;
use contours_core::QueryPointError;
use contours_data::SourceBuildError;
use thiserror::Error;

/// Errors emitted by the building-contours CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The configured search point or radius is out of range.
    #[error("invalid search area: {0}")]
    InvalidQuery(#[from] QueryPointError),
    /// The configured request timeout is zero.
    #[error("{field} must be at least one second")]
    InvalidTimeout { field: &'static str },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory { path: Utf8PathBuf },
    /// The output directory could not be inspected or created.
    #[error("failed to prepare output directory {path:?}: {source}")]
    PrepareOutputDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing the Overpass client failed.
    #[error("failed to build building source for {url:?}: {source}")]
    BuildSource {
        url: String,
        #[source]
        source: SourceBuildError,
    },
    /// The shell was triggered after it had already produced a result.
    #[error("the shell has already run; start a fresh shell for a new search")]
    ShellNotIdle,
    /// Writing user-facing messages failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Reading interactive input failed.
    #[error("failed to read input: {0}")]
    ReadInput(#[source] std::io::Error),
}
