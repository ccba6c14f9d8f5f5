//! Facade crate for the building-contours toolkit.
//!
//! This crate re-exports the core domain types and exposes the Overpass
//! source and the KML/Shapefile exporter behind feature flags.

#![forbid(unsafe_code)]

pub use contours_core::{
    BuildingContour, BuildingContours, BuildingSource, DEFAULT_RADIUS_METRES, ElementId,
    ElementKind, FetchError, GeoRecord, QueryPoint, QueryPointError, Tags, filter_polygons,
};

#[cfg(feature = "test-support")]
pub use contours_core::test_support;

#[cfg(feature = "overpass")]
pub use contours_data::{OverpassBuildingSource, OverpassConfig, SourceBuildError};

#[cfg(feature = "export")]
pub use contours_export::{
    ContourExporter, Download, ExportError, ExportedFiles, KML_FILE_NAME, TempDirExporter,
    ZIP_FILE_NAME,
};
