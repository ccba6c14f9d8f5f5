//! ESRI Shapefile serialisation of building footprints.
//!
//! dBASE imposes narrow limits on the attribute table, so tag keys are mapped
//! to column names the way GDAL's Shapefile driver does it: truncated to ten
//! characters, restricted to ASCII alphanumerics and `_`, and de-duplicated
//! with numeric suffixes.

use std::collections::HashSet;

use camino::Utf8Path;
use contours_core::{BuildingContour, BuildingContours};
use geo::LineString;
use log::warn;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};

use crate::ExportError;

/// Column holding the source element identifier.
pub const ID_COLUMN: &str = "osm_id";

/// Maximum length of a dBASE column name.
const MAX_FIELD_NAME_LEN: usize = 10;

/// Width of every character column, in bytes.
const FIELD_WIDTH: u8 = 254;

/// Longest attribute value stored, in bytes.
pub const MAX_VALUE_LEN: usize = FIELD_WIDTH as usize;

/// Maximum number of columns in a dBASE table.
const MAX_COLUMNS: usize = 255;

/// WGS 84 geographic coordinate system, as written by GDAL.
pub const WGS84_PRJ: &str = concat!(
    "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",",
    "SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],",
    "PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]"
);

/// Code page declaration for the `.dbf` file.
pub const UTF8_CPG: &str = "UTF-8";

/// An attribute column: the tag key it reads and its dBASE name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Source tag key, or [`ID_COLUMN`] for the identifier column.
    pub key: String,
    /// Sanitised dBASE column name.
    pub field: String,
}

/// Derive the attribute table layout for `tag_keys`.
///
/// The identifier column comes first; columns beyond the dBASE limit are
/// dropped with a warning.
#[must_use]
pub fn columns(tag_keys: &[&str]) -> Vec<Column> {
    let mut taken = HashSet::new();
    let mut columns = Vec::with_capacity(tag_keys.len().saturating_add(1));
    for key in std::iter::once(ID_COLUMN).chain(tag_keys.iter().copied()) {
        if columns.len() == MAX_COLUMNS {
            warn!("dropping attribute {key:?}: dBASE tables hold at most {MAX_COLUMNS} columns");
            continue;
        }
        let field = unique_field_name(&sanitise(key), &mut taken);
        columns.push(Column {
            key: key.to_owned(),
            field,
        });
    }
    columns
}

fn sanitise(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .take(MAX_FIELD_NAME_LEN)
        .collect();
    if name.is_empty() {
        "field".to_owned()
    } else {
        name
    }
}

fn unique_field_name(base: &str, taken: &mut HashSet<String>) -> String {
    let lowered = base.to_ascii_lowercase();
    if taken.insert(lowered) {
        return base.to_owned();
    }
    let mut counter = 1_u32;
    loop {
        let suffix = format!("_{counter}");
        let keep = MAX_FIELD_NAME_LEN.saturating_sub(suffix.len());
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if taken.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }
        counter = counter.saturating_add(1);
    }
}

/// Truncate `value` to at most [`MAX_VALUE_LEN`] bytes on a character
/// boundary.
#[must_use]
pub fn truncate_value(value: &str) -> &str {
    if value.len() <= MAX_VALUE_LEN {
        return value;
    }
    let mut end = MAX_VALUE_LEN;
    while !value.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    value.get(..end).unwrap_or_default()
}

/// Write `contours` as `<stem>.shp`, `.shx`, `.dbf`, `.prj` and `.cpg` in
/// `dir`.
///
/// # Errors
///
/// Returns [`ExportError`] if any file cannot be written.
pub fn write_shapefile(
    dir: &Utf8Path,
    stem: &str,
    contours: &BuildingContours,
) -> Result<(), ExportError> {
    let shp_path = dir.join(format!("{stem}.shp"));
    let layout = columns(&contours.tag_keys());

    let mut table = TableWriterBuilder::new();
    for column in &layout {
        let name = FieldName::try_from(column.field.as_str()).map_err(|_| {
            ExportError::FieldName {
                name: column.field.clone(),
            }
        })?;
        table = table.add_character_field(name, FIELD_WIDTH);
    }

    let shapefile_error = |source| ExportError::Shapefile {
        path: shp_path.clone(),
        source,
    };
    let mut writer =
        shapefile::Writer::from_path(shp_path.as_std_path(), table).map_err(shapefile_error)?;
    for contour in contours {
        writer
            .write_shape_and_record(&to_shape(contour), &to_record(contour, &layout))
            .map_err(shapefile_error)?;
    }
    drop(writer);

    let prj_path = dir.join(format!("{stem}.prj"));
    contours_fs::write_utf8_file(&prj_path, WGS84_PRJ.as_bytes())
        .map_err(|source| ExportError::io(&prj_path, source))?;
    let cpg_path = dir.join(format!("{stem}.cpg"));
    contours_fs::write_utf8_file(&cpg_path, UTF8_CPG.as_bytes())
        .map_err(|source| ExportError::io(&cpg_path, source))?;
    Ok(())
}

fn to_ring(ring: &LineString<f64>) -> Vec<Point> {
    ring.coords()
        .map(|coord| Point::new(coord.x, coord.y))
        .collect()
}

fn to_shape(contour: &BuildingContour) -> Polygon {
    let rings = std::iter::once(PolygonRing::Outer(to_ring(contour.polygon.exterior())))
        .chain(
            contour
                .polygon
                .interiors()
                .iter()
                .map(|ring| PolygonRing::Inner(to_ring(ring))),
        )
        .collect();
    Polygon::with_rings(rings)
}

fn to_record(contour: &BuildingContour, layout: &[Column]) -> Record {
    let mut record = Record::default();
    for column in layout {
        let value = if column.key == ID_COLUMN {
            Some(contour.id.to_string())
        } else {
            contour
                .tags
                .get(&column.key)
                .map(|value| truncate_value(value).to_owned())
        };
        record.insert(column.field.clone(), FieldValue::Character(value));
    }
    record
}
