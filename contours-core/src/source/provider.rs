//! Building source trait for radius queries.

use crate::{GeoRecord, QueryPoint};

use super::error::FetchError;

/// Fetch every object tagged as a building around a point.
///
/// Implementations return records of any geometry type; narrowing to
/// polygons is the caller's job (see [`crate::filter_polygons`]).
///
/// # Examples
///
/// ```rust
/// use contours_core::{
///     BuildingSource, ElementId, FetchError, GeoRecord, QueryPoint, Tags,
/// };
/// use geo::Point;
///
/// struct SingleNode;
///
/// impl BuildingSource for SingleNode {
///     fn fetch_buildings(&self, query: &QueryPoint) -> Result<Vec<GeoRecord>, FetchError> {
///         Ok(vec![GeoRecord::new(
///             ElementId::node(1),
///             Point::from(query.coord()),
///             Tags::new(),
///         )])
///     }
/// }
///
/// let query = QueryPoint::new(32.0853, 34.7818).expect("valid point");
/// let records = SingleNode.fetch_buildings(&query)?;
/// assert_eq!(records.len(), 1);
/// # Ok::<(), FetchError>(())
/// ```
pub trait BuildingSource {
    /// Return the records tagged `building` within `query`'s radius.
    fn fetch_buildings(&self, query: &QueryPoint) -> Result<Vec<GeoRecord>, FetchError>;
}
