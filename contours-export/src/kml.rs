//! KML serialisation of building footprints.
//!
//! The layout mirrors what GDAL's KML driver emits: a `Schema` declaring
//! every attribute column, then one `Placemark` per footprint inside a
//! single `Folder`, with attributes stored as `SchemaData/SimpleData`.

use contours_core::{BuildingContour, BuildingContours};
use geo::LineString;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::ExportError;

/// KML 2.2 namespace.
const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Name of the schema and folder holding the footprints.
const LAYER_NAME: &str = "building_contours";

type XmlResult = Result<(), quick_xml::Error>;

/// Serialise `contours` into a KML document.
///
/// # Errors
///
/// Returns [`ExportError::Kml`] if the XML writer fails.
pub fn kml_document(contours: &BuildingContours) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, contours).map_err(|source| ExportError::Kml { source })?;
    Ok(writer.into_inner())
}

fn write_document(writer: &mut Writer<Vec<u8>>, contours: &BuildingContours) -> XmlResult {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(
        BytesStart::new("Document").with_attributes([("id", "root_doc")]),
    ))?;

    write_schema(writer, &contours.tag_keys())?;

    start(writer, "Folder")?;
    text_element(writer, "name", LAYER_NAME)?;
    for contour in contours {
        write_placemark(writer, contour)?;
    }
    end(writer, "Folder")?;

    end(writer, "Document")?;
    end(writer, "kml")
}

fn write_schema(writer: &mut Writer<Vec<u8>>, keys: &[&str]) -> XmlResult {
    writer.write_event(Event::Start(
        BytesStart::new("Schema").with_attributes([("name", LAYER_NAME), ("id", LAYER_NAME)]),
    ))?;
    for key in keys {
        writer.write_event(Event::Empty(
            BytesStart::new("SimpleField").with_attributes([("name", *key), ("type", "string")]),
        ))?;
    }
    end(writer, "Schema")
}

fn write_placemark(writer: &mut Writer<Vec<u8>>, contour: &BuildingContour) -> XmlResult {
    start(writer, "Placemark")?;
    text_element(writer, "name", &contour.id.to_string())?;

    if !contour.tags.is_empty() {
        start(writer, "ExtendedData")?;
        let schema_url = format!("#{LAYER_NAME}");
        writer.write_event(Event::Start(
            BytesStart::new("SchemaData").with_attributes([("schemaUrl", schema_url.as_str())]),
        ))?;
        for (key, value) in &contour.tags {
            writer.write_event(Event::Start(
                BytesStart::new("SimpleData").with_attributes([("name", key.as_str())]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            end(writer, "SimpleData")?;
        }
        end(writer, "SchemaData")?;
        end(writer, "ExtendedData")?;
    }

    start(writer, "Polygon")?;
    write_boundary(writer, "outerBoundaryIs", contour.polygon.exterior())?;
    for interior in contour.polygon.interiors() {
        write_boundary(writer, "innerBoundaryIs", interior)?;
    }
    end(writer, "Polygon")?;

    end(writer, "Placemark")
}

fn write_boundary(writer: &mut Writer<Vec<u8>>, tag: &str, ring: &LineString<f64>) -> XmlResult {
    start(writer, tag)?;
    start(writer, "LinearRing")?;
    text_element(writer, "coordinates", &format_coordinates(ring))?;
    end(writer, "LinearRing")?;
    end(writer, tag)
}

/// Format a ring as whitespace-separated `lon,lat` tuples.
fn format_coordinates(ring: &LineString<f64>) -> String {
    ring.coords()
        .map(|coord| format!("{},{}", coord.x, coord.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn start(writer: &mut Writer<Vec<u8>>, tag: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(tag)))
}

fn end(writer: &mut Writer<Vec<u8>>, tag: &str) -> XmlResult {
    writer.write_event(Event::End(BytesEnd::new(tag)))
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> XmlResult {
    start(writer, tag)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contours_core::filter_polygons;
    use contours_core::test_support::StubBuildingSource;
    use rstest::{fixture, rstest};

    #[fixture]
    fn contours() -> BuildingContours {
        filter_polygons(StubBuildingSource::sample_records())
    }

    fn document(contours: &BuildingContours) -> String {
        let bytes = kml_document(contours).expect("document should serialise");
        String::from_utf8(bytes).expect("document should be UTF-8")
    }

    #[rstest]
    fn document_has_one_placemark_per_contour(contours: BuildingContours) {
        let kml = document(&contours);

        assert_eq!(kml.matches("<Placemark>").count(), 3);
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
    }

    #[rstest]
    fn schema_declares_every_tag_key(contours: BuildingContours) {
        let kml = document(&contours);

        for key in ["building", "building:levels", "name"] {
            assert!(
                kml.contains(&format!("<SimpleField name=\"{key}\" type=\"string\"/>")),
                "missing field {key}"
            );
        }
    }

    #[rstest]
    fn coordinates_are_lon_lat(contours: BuildingContours) {
        let kml = document(&contours);

        assert!(kml.contains("<coordinates>34.781,32.085 "), "{kml}");
    }

    #[rstest]
    fn attribute_values_are_escaped() {
        let mut records = StubBuildingSource::sample_records();
        if let Some(first) = records.first_mut() {
            first
                .tags
                .insert("name".to_owned(), "Café <Bar> & Grill".to_owned());
        }

        let kml = document(&filter_polygons(records));

        assert!(kml.contains("Café &lt;Bar&gt; &amp; Grill"), "{kml}");
    }

    #[rstest]
    fn ring_formatting_joins_tuples() {
        let ring = LineString::from(vec![(1.5, 2.0), (3.0, 4.25)]);

        assert_eq!(format_coordinates(&ring), "1.5,2 3,4.25");
    }
}
