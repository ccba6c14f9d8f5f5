//! Map data access for building contour extraction.
//!
//! Responsibilities:
//! - Query the Overpass API for objects tagged `building`.
//! - Decode Overpass JSON into `contours_core::GeoRecord`s.
//!
//! Boundaries:
//! - Do not filter by geometry type (lives in `contours-core`).
//! - Keep the async HTTP client behind the synchronous
//!   `contours_core::BuildingSource` trait.
//!
//! Invariants:
//! - No global mutable state.
//! - Coordinates use `x` for longitude and `y` for latitude.

#![forbid(unsafe_code)]

pub mod overpass;

pub use overpass::{
    DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT, OverpassBuildingSource, OverpassConfig,
    SourceBuildError, build_query, parse_records,
};
