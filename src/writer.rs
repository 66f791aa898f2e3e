// Writes the aggregated products to disk as one pretty-printed JSON array.

use crate::error::WriteError;
use crate::pages::Product;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What `save_products` did.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was written; holds its absolute path.
    Saved(PathBuf),
    /// There were no products, so no file was touched.
    NothingToSave,
}

/// Serialize `products` to `path`. An empty slice leaves the filesystem
/// alone. Non-ASCII text is written as-is (UTF-8), indented by two spaces.
pub fn save_products(products: &[Product], path: &Path) -> Result<SaveOutcome, WriteError> {
    if products.is_empty() {
        return Ok(SaveOutcome::NothingToSave);
    }

    let json = serde_json::to_vec_pretty(products)?;
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, json).map_err(io_err)?;
    let absolute = std::path::absolute(path).map_err(io_err)?;
    debug!(path = %absolute.display(), count = products.len(), "products saved");
    Ok(SaveOutcome::Saved(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn round_trips_records_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let products = vec![
            json!({ "gtin": "0001", "brand": "Acme" }),
            json!({ "gtin": "0002", "certificates": [1, 2] }),
            json!({ "gtin": "0003", "nested": { "ok": true } }),
        ];

        let outcome = save_products(&products, &path).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(std::path::absolute(&path).unwrap()));

        let read: Vec<Product> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, products);
    }

    #[test]
    fn empty_result_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");

        assert_eq!(save_products(&[], &path).unwrap(), SaveOutcome::NothingToSave);
        assert!(!path.exists());
    }

    #[test]
    fn empty_result_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "previous run").unwrap();

        save_products(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run");
    }

    #[test]
    fn output_is_indented_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");

        save_products(&[json!({ "name": "Skärm" })], &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n  {\n    \"name\": \"Skärm\"\n  }\n]");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("products.json");

        let err = save_products(&[json!({})], &path).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(err.to_string().contains("no-such-dir"));
    }
}
