//! Interactive map rendering for building footprints.
//!
//! [`MapView`] holds the footprints as a GeoJSON `FeatureCollection` centred
//! on the search point; [`MapView::to_html`] renders a standalone Leaflet
//! page with OpenStreetMap tiles. Panning, zooming and feature popups are
//! left to Leaflet.

use contours_core::{BuildingContour, BuildingContours, QueryPoint};
use geo::Coord;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

/// Zoom level every map opens at.
pub const DEFAULT_ZOOM: u8 = 16;

/// Property carrying the source element identifier.
pub const ID_PROPERTY: &str = "osm_id";

const LEAFLET_VERSION: &str = "1.9.4";
const MAP_WIDTH_PX: u32 = 700;
const MAP_HEIGHT_PX: u32 = 500;

/// A renderable map of building footprints.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: Coord,
    zoom: u8,
    features: FeatureCollection,
}

impl MapView {
    /// Build a map of `contours` centred on `query` at [`DEFAULT_ZOOM`].
    #[must_use]
    pub fn new(contours: &BuildingContours, query: &QueryPoint) -> Self {
        let features = contours.iter().map(to_feature).collect();
        Self {
            center: query.coord(),
            zoom: DEFAULT_ZOOM,
            features: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        }
    }

    /// Map centre (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn center(&self) -> Coord {
        self.center
    }

    /// Initial zoom level.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The footprint layer.
    #[must_use]
    pub const fn features(&self) -> &FeatureCollection {
        &self.features
    }

    /// Render a standalone HTML page showing the map.
    #[must_use]
    pub fn to_html(&self) -> String {
        // `</` inside a script block would end it early.
        let data = self.features.to_string().replace("</", "<\\/");
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Building contours</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
  <style>#map {{ width: {width}px; height: {height}px; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    const map = L.map("map").setView([{lat}, {lon}], {zoom});
    L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
      maxZoom: 19,
      attribution: "&copy; OpenStreetMap contributors"
    }}).addTo(map);
    const contours = {data};
    L.geoJSON(contours, {{
      onEachFeature: (feature, layer) => {{
        const rows = Object.entries(feature.properties || {{}})
          .map(([key, value]) => `<b>${{key}}</b>: ${{value}}`);
        layer.bindPopup(rows.join("<br>"));
      }}
    }}).addTo(map);
  </script>
</body>
</html>
"#,
            version = LEAFLET_VERSION,
            width = MAP_WIDTH_PX,
            height = MAP_HEIGHT_PX,
            lat = self.center.y,
            lon = self.center.x,
            zoom = self.zoom,
        )
    }
}

fn to_feature(contour: &BuildingContour) -> Feature {
    let mut properties: JsonObject = contour
        .tags
        .iter()
        .map(|(key, value)| (key.clone(), JsonValue::from(value.as_str())))
        .collect();
    properties.insert(
        ID_PROPERTY.to_owned(),
        JsonValue::from(contour.id.to_string()),
    );
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&contour.polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
