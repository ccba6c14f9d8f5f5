//! Overpass API JSON response types for `out body geom` queries.
//!
//! With the `geom` modifier, ways carry their node coordinates inline and
//! relation members carry the geometry of the referenced ways, so no second
//! lookup is needed to build footprints.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#Print_(out)>

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements in output order.
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Server remark, present when the query hit a runtime error such as a
    /// server-side timeout or memory exhaustion.
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Return the remark when it reports a runtime error.
    #[must_use]
    pub fn runtime_error(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|remark| remark.contains("error"))
    }
}

/// A single OSM element.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A node with its coordinate.
    Node {
        /// Node identifier.
        id: i64,
        /// Latitude; absent for nodes without a location.
        lat: Option<f64>,
        /// Longitude; absent for nodes without a location.
        lon: Option<f64>,
        /// Element tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    /// A way with inline geometry.
    Way {
        /// Way identifier.
        id: i64,
        /// Node coordinates; entries may be `null` when a node is missing.
        #[serde(default)]
        geometry: Vec<Option<LatLon>>,
        /// Element tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    /// A relation with inline member geometry.
    Relation {
        /// Relation identifier.
        id: i64,
        /// Relation members.
        #[serde(default)]
        members: Vec<Member>,
        /// Element tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
}

/// A relation member.
#[derive(Debug, Deserialize)]
pub struct Member {
    /// Member element type (`node`, `way` or `relation`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Role within the relation, e.g. `outer` or `inner`.
    #[serde(default)]
    pub role: String,
    /// Inline geometry of way members.
    #[serde(default)]
    pub geometry: Vec<Option<LatLon>>,
}

/// A coordinate pair as emitted by Overpass.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_mixed_elements() {
        let json = r#"{
            "version": 0.6,
            "generator": "Overpass API 0.7.62",
            "elements": [
                {"type": "node", "id": 1, "lat": 32.0853, "lon": 34.7818,
                 "tags": {"building": "kiosk"}},
                {"type": "way", "id": 2, "nodes": [10, 11, 12, 10],
                 "geometry": [{"lat": 1.0, "lon": 2.0}, null, {"lat": 1.5, "lon": 2.5}],
                 "tags": {"building": "yes"}},
                {"type": "relation", "id": 3,
                 "members": [{"type": "way", "ref": 20, "role": "outer",
                              "geometry": [{"lat": 0.0, "lon": 0.0}]}],
                 "tags": {"type": "multipolygon", "building": "school"}}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(response.elements.len(), 3);
        assert!(response.runtime_error().is_none());
        match &response.elements[1] {
            Element::Way { id, geometry, tags } => {
                assert_eq!(*id, 2);
                assert_eq!(geometry.len(), 3);
                assert!(geometry[1].is_none());
                assert_eq!(tags.get("building").map(String::as_str), Some("yes"));
            }
            other => panic!("expected way, got {other:?}"),
        }
        match &response.elements[2] {
            Element::Relation { members, .. } => {
                assert_eq!(members[0].role, "outer");
                assert_eq!(members[0].kind, "way");
            }
            other => panic!("expected relation, got {other:?}"),
        }
    }

    #[test]
    fn deserialise_untagged_node() {
        let json = r#"{"elements": [{"type": "node", "id": 5, "lat": 1.0, "lon": 2.0}]}"#;

        let response: OverpassResponse = serde_json::from_str(json).expect("should deserialise");

        match &response.elements[0] {
            Element::Node { tags, .. } => assert!(tags.is_empty()),
            other => panic!("expected node, got {other:?}"),
        }
    }

    #[test]
    fn runtime_error_remark_is_detected() {
        let json = r#"{
            "elements": [],
            "remark": "runtime error: Query timed out in \"query\" at line 3 after 26 seconds."
        }"#;

        let response: OverpassResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(
            response
                .runtime_error()
                .is_some_and(|remark| remark.contains("timed out"))
        );
    }
}
