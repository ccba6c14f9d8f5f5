//! Convert Overpass elements into typed geometries.
//!
//! Ways become polygons only when their coordinate list closes on itself.
//! Multipolygon relations are reassembled from member ways; member ways may
//! be split arbitrarily, so open segments are stitched end to end before
//! inner rings are attached to the outer ring that contains them.

use contours_core::{ElementId, GeoRecord, Tags};
use geo::{Contains, Coord, Geometry, InteriorPoint, LineString, MultiPolygon, Point, Polygon};
use log::debug;

use super::response::{Element, LatLon, Member};

/// Minimum coordinate count of a closed ring (a triangle plus closure).
const MIN_RING_COORDS: usize = 4;

/// Convert decoded elements into records, skipping those without usable
/// geometry.
pub fn records_from_elements(elements: Vec<Element>) -> Vec<GeoRecord> {
    elements.into_iter().filter_map(element_to_record).collect()
}

fn element_to_record(element: Element) -> Option<GeoRecord> {
    match element {
        Element::Node { id, lat, lon, tags } => match (lat, lon) {
            (Some(lat), Some(lon)) => Some(GeoRecord::new(
                ElementId::node(id),
                Point::new(lon, lat),
                tags,
            )),
            _ => {
                debug!("skipping node/{id}: no location");
                None
            }
        },
        Element::Way { id, geometry, tags } => {
            let geometry = way_geometry(&geometry);
            if geometry.is_none() {
                debug!("skipping way/{id}: fewer than two coordinates");
            }
            geometry.map(|geometry| GeoRecord::new(ElementId::way(id), geometry, tags))
        }
        Element::Relation { id, members, tags } => relation_to_record(id, &members, tags),
    }
}

fn relation_to_record(id: i64, members: &[Member], tags: Tags) -> Option<GeoRecord> {
    if tags.get("type").map(String::as_str) != Some("multipolygon") {
        debug!("skipping relation/{id}: not a multipolygon");
        return None;
    }
    let geometry = multipolygon_geometry(members);
    if geometry.is_none() {
        debug!("skipping relation/{id}: no closed outer ring");
    }
    geometry.map(|geometry| GeoRecord::new(ElementId::relation(id), geometry, tags))
}

fn to_coords(points: &[Option<LatLon>]) -> Vec<Coord> {
    points
        .iter()
        .flatten()
        .map(|point| Coord {
            x: point.lon,
            y: point.lat,
        })
        .collect()
}

fn is_closed_ring(coords: &[Coord]) -> bool {
    coords.len() >= MIN_RING_COORDS && coords.first() == coords.last()
}

fn way_geometry(points: &[Option<LatLon>]) -> Option<Geometry<f64>> {
    let coords = to_coords(points);
    if coords.len() < 2 {
        return None;
    }
    let line = LineString::from(coords);
    if is_closed_ring(&line.0) {
        Some(Geometry::Polygon(Polygon::new(line, Vec::new())))
    } else {
        Some(Geometry::LineString(line))
    }
}

fn member_segments(members: &[Member], role: &str) -> Vec<Vec<Coord>> {
    members
        .iter()
        .filter(|member| member.kind == "way" && member.role == role)
        .map(|member| to_coords(&member.geometry))
        .filter(|coords| coords.len() >= 2)
        .collect()
}

fn multipolygon_geometry(members: &[Member]) -> Option<Geometry<f64>> {
    let outers = assemble_rings(member_segments(members, "outer"));
    let inners = assemble_rings(member_segments(members, "inner"));

    let mut polygons: Vec<Polygon<f64>> = outers
        .into_iter()
        .map(|ring| Polygon::new(ring, Vec::new()))
        .collect();
    for inner in inners {
        // Inner rings may share nodes with their outer ring; test a point
        // strictly inside the inner ring.
        let Some(inside) = Polygon::new(inner.clone(), Vec::new()).interior_point() else {
            debug!("dropping degenerate inner ring");
            continue;
        };
        let host = polygons
            .iter_mut()
            .find(|polygon| polygon.contains(&inside));
        match host {
            Some(polygon) => polygon.interiors_push(inner),
            None => debug!("dropping inner ring outside every outer ring"),
        }
    }

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

/// Join open segments sharing endpoints into closed rings.
///
/// Segments are consumed greedily; a chain that cannot be closed in either
/// direction is dropped.
fn assemble_rings(mut pending: Vec<Vec<Coord>>) -> Vec<LineString<f64>> {
    let mut rings = Vec::new();
    while let Some(mut current) = pending.pop() {
        let mut flipped = false;
        loop {
            if is_closed_ring(&current) {
                rings.push(LineString::from(current));
                break;
            }
            if extend_chain(&mut current, &mut pending) {
                continue;
            }
            if flipped {
                debug!("dropping unclosed ring of {} coordinates", current.len());
                break;
            }
            current.reverse();
            flipped = true;
        }
    }
    rings
}

/// Append the first pending segment touching the chain's tail.
fn extend_chain(chain: &mut Vec<Coord>, pending: &mut Vec<Vec<Coord>>) -> bool {
    let Some(tail) = chain.last().copied() else {
        return false;
    };
    let Some(index) = pending
        .iter()
        .position(|segment| segment.first() == Some(&tail) || segment.last() == Some(&tail))
    else {
        return false;
    };
    let mut segment = pending.swap_remove(index);
    if segment.first() != Some(&tail) {
        segment.reverse();
    }
    chain.extend(segment.into_iter().skip(1));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn latlon(points: &[(f64, f64)]) -> Vec<Option<LatLon>> {
        points
            .iter()
            .map(|&(lon, lat)| Some(LatLon { lat, lon }))
            .collect()
    }

    fn way(id: i64, points: &[(f64, f64)]) -> Element {
        Element::Way {
            id,
            geometry: latlon(points),
            tags: Tags::new(),
        }
    }

    fn member(role: &str, points: &[(f64, f64)]) -> Member {
        Member {
            kind: "way".to_owned(),
            role: role.to_owned(),
            geometry: latlon(points),
        }
    }

    fn multipolygon(id: i64, members: Vec<Member>) -> Element {
        let mut tags = Tags::new();
        tags.insert("type".to_owned(), "multipolygon".to_owned());
        tags.insert("building".to_owned(), "yes".to_owned());
        Element::Relation { id, members, tags }
    }

    const SQUARE: [(f64, f64); 5] = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)];
    const HOLE: [(f64, f64); 4] = [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)];

    #[rstest]
    fn closed_way_becomes_polygon() {
        let records = records_from_elements(vec![way(1, &SQUARE)]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].geometry_type(), "Polygon");
        assert_eq!(records[0].id, ElementId::way(1));
    }

    #[rstest]
    #[case(&[(0.0, 0.0), (1.0, 1.0)], "LineString")]
    #[case(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)], "LineString")]
    #[case(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], "LineString")]
    fn open_or_degenerate_way_becomes_line(#[case] points: &[(f64, f64)], #[case] kind: &str) {
        let records = records_from_elements(vec![way(2, points)]);

        assert_eq!(records[0].geometry_type(), kind);
    }

    #[rstest]
    fn way_with_single_coordinate_is_skipped() {
        let records = records_from_elements(vec![way(3, &[(0.0, 0.0)])]);

        assert!(records.is_empty());
    }

    #[rstest]
    fn null_way_coordinates_are_ignored() {
        let mut geometry = latlon(&SQUARE);
        geometry.insert(2, None);
        let element = Element::Way {
            id: 4,
            geometry,
            tags: Tags::new(),
        };

        let records = records_from_elements(vec![element]);

        assert_eq!(records[0].geometry_type(), "Polygon");
    }

    #[rstest]
    fn node_without_location_is_skipped() {
        let element = Element::Node {
            id: 5,
            lat: None,
            lon: Some(1.0),
            tags: Tags::new(),
        };

        assert!(records_from_elements(vec![element]).is_empty());
    }

    #[rstest]
    fn node_maps_lon_to_x() {
        let element = Element::Node {
            id: 6,
            lat: Some(32.0),
            lon: Some(34.0),
            tags: Tags::new(),
        };

        let records = records_from_elements(vec![element]);

        assert_eq!(records[0].geometry, Geometry::Point(Point::new(34.0, 32.0)));
    }

    #[rstest]
    fn multipolygon_stitches_split_outer_ways() {
        let relation = multipolygon(
            7,
            vec![
                member("outer", &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]),
                // Reversed direction on purpose.
                member("outer", &[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0)]),
                member("inner", &HOLE),
            ],
        );

        let records = records_from_elements(vec![relation]);

        let Geometry::Polygon(polygon) = &records[0].geometry else {
            panic!("expected polygon, got {:?}", records[0].geometry);
        };
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[rstest]
    fn courtyard_touching_the_outer_ring_is_kept() {
        // The inner ring starts on the outer ring's edge at (0, 2).
        let courtyard = [(0.0, 2.0), (2.0, 1.0), (2.0, 3.0), (0.0, 2.0)];
        let relation = multipolygon(
            11,
            vec![member("outer", &SQUARE), member("inner", &courtyard)],
        );

        let records = records_from_elements(vec![relation]);

        let Geometry::Polygon(polygon) = &records[0].geometry else {
            panic!("expected polygon, got {:?}", records[0].geometry);
        };
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[rstest]
    fn inner_ring_outside_every_outer_is_dropped() {
        let far: Vec<(f64, f64)> = HOLE.iter().map(|&(x, y)| (x + 10.0, y)).collect();
        let relation = multipolygon(12, vec![member("outer", &SQUARE), member("inner", &far)]);

        let records = records_from_elements(vec![relation]);

        let Geometry::Polygon(polygon) = &records[0].geometry else {
            panic!("expected polygon, got {:?}", records[0].geometry);
        };
        assert!(polygon.interiors().is_empty());
    }

    #[rstest]
    fn multipolygon_with_two_outers_is_multi() {
        let far: Vec<(f64, f64)> = SQUARE.iter().map(|&(x, y)| (x + 10.0, y)).collect();
        let relation = multipolygon(8, vec![member("outer", &SQUARE), member("outer", &far)]);

        let records = records_from_elements(vec![relation]);

        assert_eq!(records[0].geometry_type(), "MultiPolygon");
    }

    #[rstest]
    fn multipolygon_without_closed_outer_is_skipped() {
        let relation = multipolygon(9, vec![member("outer", &[(0.0, 0.0), (1.0, 1.0)])]);

        assert!(records_from_elements(vec![relation]).is_empty());
    }

    #[rstest]
    fn non_multipolygon_relation_is_skipped() {
        let mut tags = Tags::new();
        tags.insert("type".to_owned(), "building".to_owned());
        let relation = Element::Relation {
            id: 10,
            members: vec![member("outer", &SQUARE)],
            tags,
        };

        assert!(records_from_elements(vec![relation]).is_empty());
    }
}
