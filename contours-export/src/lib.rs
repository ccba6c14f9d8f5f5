//! KML and zipped Shapefile export for building footprints.
//!
//! [`TempDirExporter`] writes `building_contours.kml` and a Shapefile set into
//! a fresh temporary directory, packages the Shapefile into
//! `building_contours_shp.zip` and hands both back as in-memory
//! [`Download`]s. The directory is gone once the call returns.
//!
//! # Example
//!
//! ```
//! use contours_core::filter_polygons;
//! use contours_core::test_support::StubBuildingSource;
//! use contours_export::{ContourExporter, TempDirExporter};
//!
//! let contours = filter_polygons(StubBuildingSource::sample_records());
//! let files = TempDirExporter::new().export(&contours)?;
//! assert_eq!(files.kml.file_name, "building_contours.kml");
//! assert_eq!(files.shapefile_zip.file_name, "building_contours_shp.zip");
//! # Ok::<(), contours_export::ExportError>(())
//! ```

#![forbid(unsafe_code)]

mod archive;
mod error;
mod exporter;
pub mod kml;
pub mod shp;

pub use archive::zip_matching;
pub use error::ExportError;
pub use exporter::{
    ContourExporter, Download, ExportedFiles, KML_MEDIA_TYPE, TempDirExporter, ZIP_MEDIA_TYPE,
};

/// Stem shared by every exported file.
pub const FILE_PREFIX: &str = "building_contours";

/// Name of the KML download.
pub const KML_FILE_NAME: &str = "building_contours.kml";

/// Name of the zipped Shapefile download.
pub const ZIP_FILE_NAME: &str = "building_contours_shp.zip";

/// Subdirectory of the scratch directory holding the Shapefile set.
pub const SHAPEFILE_DIR: &str = "shp";
