//! Behavioural tests for [`TempDirExporter`].
//!
//! The exported bytes are read back with independent parsers: `quick-xml`
//! for the KML document and `shapefile` for the unpacked archive.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use contours_core::test_support::StubBuildingSource;
use contours_core::{BuildingContours, filter_polygons};
use contours_export::{ContourExporter, ExportError, ExportedFiles, TempDirExporter};
use quick_xml::Reader;
use quick_xml::events::Event;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use shapefile::dbase::{FieldValue, Record};
use tempfile::TempDir;

/// Result cell holding the outcome of an export.
type ResultCell = RefCell<Option<Result<ExportedFiles, ExportError>>>;

const TOLERANCE: f64 = 1.0e-9;

#[fixture]
fn contours() -> RefCell<BuildingContours> {
    RefCell::new(BuildingContours::default())
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

/// A placemark read back from a KML document.
#[derive(Debug, Default)]
struct Placemark {
    name: String,
    keys: BTreeSet<String>,
    rings: Vec<Vec<(f64, f64)>>,
}

fn parse_placemarks(kml: &str) -> Vec<Placemark> {
    let mut reader = Reader::from_str(kml);
    reader.trim_text(true);
    let mut placemarks: Vec<Placemark> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if tag == "Placemark" {
                    placemarks.push(Placemark::default());
                }
                if tag == "SimpleData" {
                    let key = start
                        .try_get_attribute("name")
                        .expect("attribute should parse")
                        .expect("SimpleData should be named")
                        .unescape_value()
                        .expect("attribute should unescape")
                        .into_owned();
                    if let Some(current) = placemarks.last_mut() {
                        current.keys.insert(key);
                    }
                }
                path.push(tag);
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) => {
                let value = text.unescape().expect("text should unescape").into_owned();
                let Some(current) = placemarks.last_mut() else {
                    continue;
                };
                let parent = path.get(path.len().saturating_sub(2)).map(String::as_str);
                match (path.last().map(String::as_str), parent) {
                    (Some("name"), Some("Placemark")) => current.name = value,
                    (Some("coordinates"), _) => current.rings.push(parse_ring(&value)),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => panic!("invalid KML at {}: {err}", reader.buffer_position()),
        }
    }
    placemarks
}

fn parse_ring(text: &str) -> Vec<(f64, f64)> {
    text.split_whitespace()
        .map(|tuple| {
            let (lon, lat) = tuple.split_once(',').expect("tuple should be lon,lat");
            (
                lon.parse().expect("longitude should parse"),
                lat.parse().expect("latitude should parse"),
            )
        })
        .collect()
}

fn exported(result: &ResultCell) -> ExportedFiles {
    result
        .borrow()
        .as_ref()
        .expect("export should have run")
        .as_ref()
        .expect("export should succeed")
        .clone()
}

fn unpack(zip: &[u8]) -> (TempDir, Vec<String>) {
    let dir = TempDir::new().expect("create temp dir");
    let mut archive = zip::ZipArchive::new(Cursor::new(zip)).expect("archive should open");
    let mut names = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry should open");
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).expect("entry should read");
        std::fs::write(dir.path().join(entry.name()), bytes).expect("entry should unpack");
        names.push(entry.name().to_owned());
    }
    names.sort();
    (dir, names)
}

// --- Given steps ---

#[given("the footprints filtered from three polygons and two non-polygons")]
fn sample_footprints(#[from(contours)] contours: &RefCell<BuildingContours>) {
    *contours.borrow_mut() = filter_polygons(StubBuildingSource::sample_records());
}

#[given("an empty footprint collection")]
fn empty_footprints(#[from(contours)] contours: &RefCell<BuildingContours>) {
    *contours.borrow_mut() = BuildingContours::default();
}

// --- When steps ---

#[when("I export the footprints")]
fn export(#[from(contours)] contours: &RefCell<BuildingContours>, #[from(result)] result: &ResultCell) {
    *result.borrow_mut() = Some(TempDirExporter::new().export(&contours.borrow()));
}

// --- Then steps ---

#[then("the KML document holds three placemarks")]
fn three_placemarks(#[from(result)] result: &ResultCell) {
    let files = exported(result);
    assert_eq!(files.kml.file_name, "building_contours.kml");
    let kml = String::from_utf8(files.kml.bytes).expect("KML should be UTF-8");
    assert_eq!(parse_placemarks(&kml).len(), 3);
}

#[then("the KML round-trips coordinates and attribute keys")]
fn kml_round_trip(
    #[from(contours)] contours: &RefCell<BuildingContours>,
    #[from(result)] result: &ResultCell,
) {
    let kml = String::from_utf8(exported(result).kml.bytes).expect("KML should be UTF-8");
    let placemarks = parse_placemarks(&kml);
    let contours = contours.borrow();

    for (contour, placemark) in contours.iter().zip(&placemarks) {
        assert_eq!(placemark.name, contour.id.to_string());
        let expected_keys: BTreeSet<String> = contour.tags.keys().cloned().collect();
        assert_eq!(placemark.keys, expected_keys);

        let exterior = placemark.rings.first().expect("outer ring present");
        assert_eq!(exterior.len(), contour.polygon.exterior().0.len());
        for (coord, (lon, lat)) in contour.polygon.exterior().coords().zip(exterior) {
            assert!((coord.x - lon).abs() < TOLERANCE, "lon {lon} vs {}", coord.x);
            assert!((coord.y - lat).abs() < TOLERANCE, "lat {lat} vs {}", coord.y);
        }
    }
}

#[then("the archive holds a complete Shapefile set named building_contours")]
fn complete_archive(#[from(result)] result: &ResultCell) {
    let files = exported(result);
    assert_eq!(files.shapefile_zip.file_name, "building_contours_shp.zip");
    assert_eq!(files.shapefile_zip.media_type, "application/zip");

    let (_dir, names) = unpack(&files.shapefile_zip.bytes);
    assert_eq!(
        names,
        vec![
            "building_contours.cpg",
            "building_contours.dbf",
            "building_contours.prj",
            "building_contours.shp",
            "building_contours.shx",
        ]
    );
}

#[then("the Shapefile holds three shapes with their identifiers")]
fn three_shapes(
    #[from(contours)] contours: &RefCell<BuildingContours>,
    #[from(result)] result: &ResultCell,
) {
    let (dir, _names) = unpack(&exported(result).shapefile_zip.bytes);
    let shapes = shapefile::read_as::<_, shapefile::Polygon, Record>(
        dir.path().join("building_contours.shp"),
    )
    .expect("shapefile should read");
    assert_eq!(shapes.len(), 3);

    let ids: Vec<String> = shapes
        .iter()
        .map(|(_, record)| match record.get("osm_id") {
            Some(FieldValue::Character(Some(id))) => id.trim().to_owned(),
            other => panic!("unexpected osm_id value {other:?}"),
        })
        .collect();
    let expected: Vec<String> = contours
        .borrow()
        .iter()
        .map(|contour| contour.id.to_string())
        .collect();
    assert_eq!(ids, expected);
}

#[then("the export is rejected as empty")]
fn rejected_as_empty(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(ExportError::EmptyCollection))),
        "expected empty collection error, got {borrowed:?}"
    );
}

// --- Scenario registrations ---

#[scenario(path = "tests/features/export.feature", index = 0)]
fn exporting_sample_neighbourhood(contours: RefCell<BuildingContours>, result: ResultCell) {
    let _ = (contours, result);
}

#[scenario(path = "tests/features/export.feature", index = 1)]
fn exporting_nothing(contours: RefCell<BuildingContours>, result: ResultCell) {
    let _ = (contours, result);
}
