//! Core domain types for building contour extraction.
//!
//! The crate models the request/transform half of the pipeline:
//! - [`QueryPoint`] validates the search centre and radius;
//! - [`BuildingSource`] fetches [`GeoRecord`]s of any geometry type;
//! - [`filter_polygons`] narrows them to [`BuildingContours`].
//!
//! Constructors return `Result` to surface invalid input early. Nothing
//! here performs I/O; HTTP and file formats live in sibling crates.

#![forbid(unsafe_code)]

mod contours;
mod query;
mod record;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use contours::{BuildingContour, BuildingContours, filter_polygons};
pub use query::{DEFAULT_RADIUS_METRES, QueryPoint, QueryPointError};
pub use record::{ElementId, ElementKind, GeoRecord, Tags};
pub use source::{BuildingSource, FetchError};
