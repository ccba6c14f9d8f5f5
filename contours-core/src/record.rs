//! Geographic records returned by a [`BuildingSource`](crate::BuildingSource).

use std::collections::BTreeMap;
use std::fmt;

use geo::Geometry;

/// OpenStreetMap-style key/value attributes, ordered by key.
pub type Tags = BTreeMap<String, String>;

/// The OpenStreetMap element type a record was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// A single tagged node.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A relation between other elements, such as a multipolygon.
    Relation,
}

impl ElementKind {
    /// Lower-case name used by the OpenStreetMap API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// Identifier of a source element, e.g. `way/123`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    /// Element type.
    pub kind: ElementKind,
    /// Numeric identifier, unique per element type.
    pub id: i64,
}

impl ElementId {
    /// Identifier of a node.
    #[must_use]
    pub const fn node(id: i64) -> Self {
        Self {
            kind: ElementKind::Node,
            id,
        }
    }

    /// Identifier of a way.
    #[must_use]
    pub const fn way(id: i64) -> Self {
        Self {
            kind: ElementKind::Way,
            id,
        }
    }

    /// Identifier of a relation.
    #[must_use]
    pub const fn relation(id: i64) -> Self {
        Self {
            kind: ElementKind::Relation,
            id,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.id)
    }
}

/// A fetched map object: any geometry plus its tags.
///
/// Coordinates use `x` for longitude and `y` for latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    /// Source element identifier.
    pub id: ElementId,
    /// Geometry derived from the source element.
    pub geometry: Geometry<f64>,
    /// Source attributes.
    pub tags: Tags,
}

impl GeoRecord {
    /// Construct a record from its parts.
    #[must_use]
    pub fn new(id: ElementId, geometry: impl Into<Geometry<f64>>, tags: Tags) -> Self {
        Self {
            id,
            geometry: geometry.into(),
            tags,
        }
    }

    /// Name of the geometry type, e.g. `"Polygon"` or `"MultiPolygon"`.
    #[must_use]
    pub fn geometry_type(&self) -> &'static str {
        match self.geometry {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
            Geometry::Rect(_) => "Rect",
            Geometry::Triangle(_) => "Triangle",
        }
    }
}
