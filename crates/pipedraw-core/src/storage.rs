//! Document persistence to JSON files on disk.

use crate::document::Document;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Write the document to `path` as pretty-printed JSON.
pub fn save(document: &Document, path: &Path) -> Result<(), StorageError> {
    let json = document
        .to_json_pretty()
        .map_err(|e| StorageError::Malformed(e.to_string()))?;
    fs::write(path, json)?;
    log::info!(
        "saved document to {} ({} shapes, {} connectors)",
        path.display(),
        document.shape_count(),
        document.connector_count(),
    );
    Ok(())
}

/// Read a document from `path`, repairing what [`Document::from_json`] can.
pub fn load(path: &Path) -> Result<Document, StorageError> {
    let json = fs::read_to_string(path)?;
    let document =
        Document::from_json(&json).map_err(|e| StorageError::Malformed(e.to_string()))?;
    log::info!(
        "loaded document from {} ({} shapes, {} connectors)",
        path.display(),
        document.shape_count(),
        document.connector_count(),
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.json");

        let mut doc = Document::new();
        let a = doc.create_shape(ShapeKind::Rect, None, 0.0, 0.0, 100.0, 60.0);
        let b = doc.create_shape(ShapeKind::Ellipse, None, 200.0, 0.0, 80.0, 80.0);
        doc.create_connector(a, b).unwrap();
        doc.set_text(a, "feed".to_string());

        save(&doc, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.to_json().unwrap(), doc.to_json().unwrap());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn load_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json at all").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
    }
}
