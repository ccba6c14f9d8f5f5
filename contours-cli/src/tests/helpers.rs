//! Test doubles for the building source and exporter seams.

use std::cell::Cell;

use camino::Utf8PathBuf;
use contours_core::test_support::StubBuildingSource;
use contours_core::{BuildingContours, BuildingSource};
use contours_data::OverpassConfig;
use contours_export::{ContourExporter, ExportError, ExportedFiles, TempDirExporter};
use tempfile::TempDir;

use crate::CliError;
use crate::service::SourceBuilder;

/// Hands out clones of a pre-configured stub source.
#[derive(Debug, Clone)]
pub(super) struct StubSourceBuilder {
    pub(super) source: StubBuildingSource,
}

impl SourceBuilder for StubSourceBuilder {
    fn build(&self, _config: &OverpassConfig) -> Result<Box<dyn BuildingSource>, CliError> {
        Ok(Box::new(self.source.clone()))
    }
}

/// Counts export calls while delegating to the real exporter.
#[derive(Debug, Default)]
pub(super) struct CountingExporter {
    inner: TempDirExporter,
    calls: Cell<usize>,
}

impl CountingExporter {
    pub(super) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ContourExporter for CountingExporter {
    fn export(&self, contours: &BuildingContours) -> Result<ExportedFiles, ExportError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.export(contours)
    }
}

/// Fails every export with an I/O error on the archive.
#[derive(Debug, Default)]
pub(super) struct FailingExporter;

impl ContourExporter for FailingExporter {
    fn export(&self, _contours: &BuildingContours) -> Result<ExportedFiles, ExportError> {
        Err(ExportError::Io {
            path: Utf8PathBuf::from("/tmp/building-contours-x/building_contours_shp.zip"),
            source: std::io::Error::other("disk full"),
        })
    }
}

/// A temporary output directory with its UTF-8 path.
pub(super) fn scratch_dir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}
