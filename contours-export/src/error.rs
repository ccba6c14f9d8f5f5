//! Error types for contour export.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while producing export artefacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export was requested for a collection without footprints.
    #[error("no building contours to export")]
    EmptyCollection,
    /// The temporary working directory could not be created.
    #[error("failed to create temporary export directory")]
    TempDir {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The temporary directory path is not valid UTF-8.
    #[error("temporary export directory {path:?} is not valid UTF-8")]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },
    /// Reading or writing an artefact failed.
    #[error("failed to access {path}")]
    Io {
        /// File or directory being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// KML serialisation failed.
    #[error("failed to write KML document")]
    Kml {
        /// Underlying XML writer error.
        #[source]
        source: quick_xml::Error,
    },
    /// Shapefile serialisation failed.
    #[error("failed to write shapefile {path}")]
    Shapefile {
        /// Path of the `.shp` file being written.
        path: Utf8PathBuf,
        /// Underlying shapefile error.
        #[source]
        source: shapefile::Error,
    },
    /// A derived attribute column name was rejected by the dBASE writer.
    #[error("invalid attribute column name {name:?}")]
    FieldName {
        /// Rejected column name.
        name: String,
    },
    /// Packaging the Shapefile set failed.
    #[error("failed to write ZIP archive {path}")]
    Zip {
        /// Archive being written.
        path: Utf8PathBuf,
        /// Underlying ZIP error.
        #[source]
        source: zip::result::ZipError,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
