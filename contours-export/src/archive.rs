//! ZIP packaging for the Shapefile set.

use std::io::{Cursor, Write};

use camino::Utf8Path;
use log::debug;
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::ExportError;

/// Package every file in `dir` whose name starts with `prefix` into an
/// in-memory ZIP archive.
///
/// Entries are stored flat, in name order, so the archive unpacks into a
/// loadable Shapefile set.
///
/// # Errors
///
/// Returns [`ExportError`] if `dir` cannot be listed or read, or if the
/// archive cannot be written.
pub fn zip_matching(dir: &Utf8Path, prefix: &str) -> Result<Vec<u8>, ExportError> {
    let names = contours_fs::list_file_names(dir).map_err(|source| ExportError::io(dir, source))?;
    let zip_error = |source| ExportError::Zip {
        path: dir.to_owned(),
        source,
    };

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for name in names.iter().filter(|name| name.starts_with(prefix)) {
        let path = dir.join(name);
        let contents =
            contours_fs::read_utf8_file(&path).map_err(|source| ExportError::io(&path, source))?;
        debug!("adding {name} ({} bytes) to archive", contents.len());
        archive.start_file(name.as_str(), options).map_err(zip_error)?;
        archive
            .write_all(&contents)
            .map_err(|source| ExportError::io(&path, source))?;
    }
    let cursor = archive.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}
