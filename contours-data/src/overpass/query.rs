//! Overpass QL for building radius queries.

use contours_core::QueryPoint;

/// Build the Overpass QL selecting every node, way and relation tagged
/// `building` within the query radius, with inline geometry.
///
/// # Examples
///
/// ```
/// use contours_core::QueryPoint;
/// use contours_data::build_query;
///
/// let point = QueryPoint::new(32.0853, 34.7818).expect("valid point");
/// let query = build_query(&point, 180);
/// assert!(query.starts_with("[out:json][timeout:180];"));
/// assert!(query.ends_with("out body geom;"));
/// ```
#[must_use]
pub fn build_query(point: &QueryPoint, timeout_secs: u64) -> String {
    let around = format!(
        "(around:{},{},{})",
        point.radius_metres(),
        point.lat(),
        point.lon()
    );
    format!(
        "[out:json][timeout:{timeout_secs}];\
         (node[\"building\"]{around};\
         way[\"building\"]{around};\
         relation[\"building\"]{around};);\
         out body geom;"
    )
}
