//! Building footprints: the polygon-only subset of fetched records.
//!
//! [`filter_polygons`] is the only way to build a [`BuildingContours`]
//! collection, so every member is guaranteed to carry a single simple
//! polygon. Multi-polygons, lines and points are discarded rather than
//! converted.

use geo::{Coord, Geometry, Polygon};

use crate::{ElementId, GeoRecord, Tags};

/// A single building footprint with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingContour {
    /// Source element identifier.
    pub id: ElementId,
    /// Footprint outline (`x` = longitude, `y` = latitude).
    pub polygon: Polygon<f64>,
    /// Source attributes.
    pub tags: Tags,
}

impl From<BuildingContour> for GeoRecord {
    fn from(contour: BuildingContour) -> Self {
        Self {
            id: contour.id,
            geometry: Geometry::Polygon(contour.polygon),
            tags: contour.tags,
        }
    }
}

/// The filtered polygon collection handed to rendering and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingContours {
    contours: Vec<BuildingContour>,
}

impl BuildingContours {
    /// Number of footprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Whether no footprints were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Iterate over the footprints in fetch order.
    pub fn iter(&self) -> std::slice::Iter<'_, BuildingContour> {
        self.contours.iter()
    }

    /// Sorted union of every tag key present on any footprint.
    #[must_use]
    pub fn tag_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .contours
            .iter()
            .flat_map(|contour| contour.tags.keys().map(String::as_str))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Every exterior and interior ring coordinate, for bounds and fitting.
    pub fn coords(&self) -> impl Iterator<Item = &Coord> + '_ {
        self.contours.iter().flat_map(|contour| {
            std::iter::once(contour.polygon.exterior())
                .chain(contour.polygon.interiors())
                .flat_map(|ring| ring.0.iter())
        })
    }

    /// Convert back into generic records, e.g. to filter again.
    #[must_use]
    pub fn into_records(self) -> Vec<GeoRecord> {
        self.contours.into_iter().map(GeoRecord::from).collect()
    }
}

impl<'a> IntoIterator for &'a BuildingContours {
    type Item = &'a BuildingContour;
    type IntoIter = std::slice::Iter<'a, BuildingContour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.iter()
    }
}

/// Keep only the records whose geometry is exactly a `Polygon`.
///
/// The function is pure: empty input yields an empty collection and applying
/// it to its own output returns the same collection.
///
/// # Examples
///
/// ```
/// use contours_core::{ElementId, GeoRecord, Tags, filter_polygons};
/// use geo::{Point, polygon};
///
/// let records = vec![
///     GeoRecord::new(
///         ElementId::way(1),
///         polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
///         Tags::new(),
///     ),
///     GeoRecord::new(ElementId::node(2), Point::new(0.5, 0.5), Tags::new()),
/// ];
/// let contours = filter_polygons(records);
/// assert_eq!(contours.len(), 1);
/// ```
pub fn filter_polygons<I>(records: I) -> BuildingContours
where
    I: IntoIterator<Item = GeoRecord>,
{
    let contours = records
        .into_iter()
        .filter_map(|record| match record.geometry {
            Geometry::Polygon(polygon) => Some(BuildingContour {
                id: record.id,
                polygon,
                tags: record.tags,
            }),
            _ => None,
        })
        .collect();
    BuildingContours { contours }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Point, polygon};
    use rstest::{fixture, rstest};

    fn square(origin: f64) -> Polygon<f64> {
        polygon![
            (x: origin, y: origin),
            (x: origin + 1.0, y: origin),
            (x: origin + 1.0, y: origin + 1.0),
            (x: origin, y: origin + 1.0),
        ]
    }

    fn tagged(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[fixture]
    fn mixed_records() -> Vec<GeoRecord> {
        vec![
            GeoRecord::new(ElementId::way(1), square(0.0), tagged(&[("building", "yes")])),
            GeoRecord::new(ElementId::node(2), Point::new(0.5, 0.5), tagged(&[("building", "hut")])),
            GeoRecord::new(
                ElementId::way(3),
                square(2.0),
                tagged(&[("building", "house"), ("name", "Beit")]),
            ),
            GeoRecord::new(
                ElementId::way(4),
                LineString::from(vec![(0.0, 0.0), (3.0, 3.0)]),
                tagged(&[("building", "wall")]),
            ),
            GeoRecord::new(
                ElementId::relation(5),
                MultiPolygon::new(vec![square(4.0), square(6.0)]),
                tagged(&[("building", "school")]),
            ),
        ]
    }

    #[rstest]
    fn keeps_only_polygons(mixed_records: Vec<GeoRecord>) {
        let input_len = mixed_records.len();
        let contours = filter_polygons(mixed_records);

        assert_eq!(contours.len(), 2);
        assert!(contours.len() <= input_len);
        let ids: Vec<ElementId> = contours.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ElementId::way(1), ElementId::way(3)]);
    }

    #[rstest]
    fn filter_is_idempotent(mixed_records: Vec<GeoRecord>) {
        let once = filter_polygons(mixed_records);
        let twice = filter_polygons(once.clone().into_records());
        assert_eq!(once, twice);
    }

    #[rstest]
    fn empty_input_yields_empty_output() {
        let contours = filter_polygons(Vec::new());
        assert!(contours.is_empty());
    }

    #[rstest]
    fn tag_keys_are_sorted_and_unique(mixed_records: Vec<GeoRecord>) {
        let contours = filter_polygons(mixed_records);
        assert_eq!(contours.tag_keys(), vec!["building", "name"]);
    }

    #[rstest]
    fn coords_cover_every_ring() {
        let with_hole = Polygon::new(
            square(0.0).exterior().clone(),
            vec![LineString::from(vec![
                (0.2, 0.2),
                (0.4, 0.2),
                (0.4, 0.4),
                (0.2, 0.2),
            ])],
        );
        let contours = filter_polygons(vec![GeoRecord::new(
            ElementId::way(9),
            with_hole,
            Tags::new(),
        )]);
        // 5 closed exterior coordinates plus 4 interior coordinates.
        assert_eq!(contours.coords().count(), 9);
    }
}
