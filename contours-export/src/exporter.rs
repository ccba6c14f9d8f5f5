//! Scoped export of building footprints into downloadable artefacts.

use camino::{Utf8Path, Utf8PathBuf};
use contours_core::BuildingContours;
use log::{debug, info};
use tempfile::TempDir;

use crate::archive::zip_matching;
use crate::kml::kml_document;
use crate::shp::write_shapefile;
use crate::{ExportError, FILE_PREFIX, KML_FILE_NAME, SHAPEFILE_DIR, ZIP_FILE_NAME};

/// MIME type of KML documents.
pub const KML_MEDIA_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// MIME type of ZIP archives.
pub const ZIP_MEDIA_TYPE: &str = "application/zip";

/// A named in-memory file offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the contents.
    pub media_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// The two downloads produced for a non-empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    /// `building_contours.kml`.
    pub kml: Download,
    /// `building_contours_shp.zip`.
    pub shapefile_zip: Download,
}

impl ExportedFiles {
    /// Iterate over both downloads, KML first.
    pub fn iter(&self) -> impl Iterator<Item = &Download> {
        [&self.kml, &self.shapefile_zip].into_iter()
    }
}

/// Turns a filtered collection into downloadable files.
pub trait ContourExporter {
    /// Produce the KML document and zipped Shapefile for `contours`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyCollection`] when `contours` is empty, or
    /// another [`ExportError`] variant when an artefact cannot be produced.
    fn export(&self, contours: &BuildingContours) -> Result<ExportedFiles, ExportError>;
}

/// Exporter writing through a fresh temporary directory per call.
///
/// The directory is removed when the call returns, whether it succeeds or
/// not; only the in-memory [`Download`]s survive.
#[derive(Debug, Clone, Default)]
pub struct TempDirExporter {
    parent: Option<Utf8PathBuf>,
}

impl TempDirExporter {
    /// Create an exporter using the system temporary directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { parent: None }
    }

    /// Create an exporter placing its scratch directories under `parent`.
    #[must_use]
    pub fn in_dir(parent: impl Into<Utf8PathBuf>) -> Self {
        Self {
            parent: Some(parent.into()),
        }
    }

    fn scratch_dir(&self) -> Result<TempDir, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("building-contours-");
        let scratch = match &self.parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        scratch.map_err(|source| ExportError::TempDir { source })
    }
}

impl ContourExporter for TempDirExporter {
    fn export(&self, contours: &BuildingContours) -> Result<ExportedFiles, ExportError> {
        if contours.is_empty() {
            return Err(ExportError::EmptyCollection);
        }

        let scratch = self.scratch_dir()?;
        let root = Utf8Path::from_path(scratch.path()).ok_or_else(|| ExportError::NonUtf8Path {
            path: scratch.path().to_path_buf(),
        })?;
        debug!("exporting {} contours via {root}", contours.len());

        let kml_bytes = kml_document(contours)?;
        let kml_path = root.join(KML_FILE_NAME);
        contours_fs::write_utf8_file(&kml_path, &kml_bytes)
            .map_err(|source| ExportError::io(&kml_path, source))?;

        let shp_dir = root.join(SHAPEFILE_DIR);
        contours_fs::ensure_dir(&shp_dir).map_err(|source| ExportError::io(&shp_dir, source))?;
        write_shapefile(&shp_dir, FILE_PREFIX, contours)?;

        let zip_bytes = zip_matching(&shp_dir, FILE_PREFIX)?;
        let zip_path = root.join(ZIP_FILE_NAME);
        contours_fs::write_utf8_file(&zip_path, &zip_bytes)
            .map_err(|source| ExportError::io(&zip_path, source))?;

        let files = ExportedFiles {
            kml: read_download(&kml_path, KML_FILE_NAME, KML_MEDIA_TYPE)?,
            shapefile_zip: read_download(&zip_path, ZIP_FILE_NAME, ZIP_MEDIA_TYPE)?,
        };
        info!(
            "exported {} contours ({} byte KML, {} byte ZIP)",
            contours.len(),
            files.kml.bytes.len(),
            files.shapefile_zip.bytes.len()
        );
        Ok(files)
    }
}

fn read_download(
    path: &Utf8Path,
    file_name: &str,
    media_type: &'static str,
) -> Result<Download, ExportError> {
    let bytes = contours_fs::read_utf8_file(path).map_err(|source| ExportError::io(path, source))?;
    Ok(Download {
        file_name: file_name.to_owned(),
        media_type,
        bytes,
    })
}
