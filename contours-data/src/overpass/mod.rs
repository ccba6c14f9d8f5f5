//! Overpass-backed [`BuildingSource`](contours_core::BuildingSource).
//!
//! This module provides [`OverpassBuildingSource`], which posts an Overpass
//! QL radius query and converts the returned nodes, ways and multipolygon
//! relations into [`GeoRecord`](contours_core::GeoRecord)s.
//!
//! # Example
//!
//! ```no_run
//! use contours_core::{BuildingSource, QueryPoint};
//! use contours_data::{OverpassBuildingSource, OverpassConfig};
//! use std::time::Duration;
//!
//! let config = OverpassConfig::default()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let source = OverpassBuildingSource::with_config(config)?;
//!
//! let query = QueryPoint::new(32.0853, 34.7818)?;
//! let records = source.fetch_buildings(&query)?;
//! println!("fetched {} records", records.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod geometry;
mod query;
mod response;
mod source;

pub use geometry::records_from_elements;
pub use query::build_query;
pub use response::{Element, LatLon, Member, OverpassResponse};
pub use source::{
    DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT, OverpassBuildingSource, OverpassConfig,
    SourceBuildError, parse_records,
};
