//! Test-only `BuildingSource` double used by unit and behaviour tests.

use geo::{LineString, Point, Polygon};

use crate::{BuildingSource, ElementId, FetchError, GeoRecord, QueryPoint, Tags};

/// Stub `BuildingSource` returning pre-configured responses.
///
/// This source never touches the network, allowing the pipeline to be
/// exercised deterministically.
#[derive(Debug, Clone)]
pub struct StubBuildingSource {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Records(Vec<GeoRecord>),
    Error(FetchError),
}

impl StubBuildingSource {
    /// Create a source that returns the given records for any query.
    #[must_use]
    pub const fn with_records(records: Vec<GeoRecord>) -> Self {
        Self {
            response: StubResponse::Records(records),
        }
    }

    /// Create a source that fails with the given error for any query.
    #[must_use]
    pub const fn with_error(error: FetchError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Create a source that finds nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    /// Three building polygons and two non-polygon records near
    /// (32.0853, 34.7818).
    #[must_use]
    pub fn sample_records() -> Vec<GeoRecord> {
        vec![
            GeoRecord::new(
                ElementId::way(1001),
                footprint(34.7810, 32.0850),
                tags(&[("building", "yes"), ("name", "Dizengoff House")]),
            ),
            GeoRecord::new(
                ElementId::node(1002),
                Point::new(34.7818, 32.0853),
                tags(&[("building", "kiosk")]),
            ),
            GeoRecord::new(
                ElementId::way(1003),
                footprint(34.7820, 32.0856),
                tags(&[("building", "apartments"), ("building:levels", "4")]),
            ),
            GeoRecord::new(
                ElementId::way(1004),
                LineString::from(vec![(34.7800, 32.0840), (34.7805, 32.0845)]),
                tags(&[("building", "wall")]),
            ),
            GeoRecord::new(
                ElementId::way(1005),
                footprint(34.7830, 32.0860),
                tags(&[("building", "house")]),
            ),
        ]
    }
}

impl BuildingSource for StubBuildingSource {
    fn fetch_buildings(&self, _query: &QueryPoint) -> Result<Vec<GeoRecord>, FetchError> {
        match &self.response {
            StubResponse::Records(records) => Ok(records.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

/// A small square footprint with its south-west corner at (`lon`, `lat`).
#[must_use]
pub fn footprint(lon: f64, lat: f64) -> Polygon<f64> {
    let size = 0.0002;
    Polygon::new(
        LineString::from(vec![
            (lon, lat),
            (lon + size, lat),
            (lon + size, lat + size),
            (lon, lat + size),
            (lon, lat),
        ]),
        Vec::new(),
    )
}

/// Build a tag map from string pairs.
#[must_use]
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}
