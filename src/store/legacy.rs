//! Read-only access to the flat key-value layout
//!
//! The old layout kept the whole list as one JSON-encoded string under a
//! fixed key: `{ "barcodes": "[{\"name\":..,\"data\":..}]" }`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::constants::store::{LEGACY_FILENAME, LEGACY_KEY};
use crate::types::BarcodeEntry;

/// Entries from the legacy blob in `dir`, or empty when there is none
pub fn read_entries(dir: &Path) -> Result<Vec<BarcodeEntry>> {
    let path = dir.join(LEGACY_FILENAME);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read legacy store {}", path.display()))?;
    let items: HashMap<String, String> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse legacy store {}", path.display()))?;

    let Some(blob) = items.get(LEGACY_KEY) else {
        return Ok(Vec::new());
    };

    let entries: Vec<BarcodeEntry> = serde_json::from_str(blob)
        .with_context(|| format!("Failed to parse '{LEGACY_KEY}' value in {}", path.display()))?;

    let total = entries.len();
    let valid: Vec<BarcodeEntry> = entries
        .into_iter()
        .filter(|e| !e.name.is_empty() && !e.data.is_empty())
        .collect();
    if valid.len() != total {
        warn!(skipped = total - valid.len(), "Skipped legacy entries with empty name or data");
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("barcode-wallet-legacy-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = scratch_dir("missing");
        assert!(read_entries(&dir).unwrap().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reads_blob_and_skips_invalid() {
        let dir = scratch_dir("blob");
        let blob = r#"[{"name":"Gym","data":"1234567890"},{"name":"","data":"9"},{"name":"Library","data":"A-77"}]"#;
        let file = serde_json::json!({ "barcodes": blob, "theme": "dark" });
        fs::write(dir.join(LEGACY_FILENAME), file.to_string()).unwrap();

        let entries = read_entries(&dir).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Gym");
        assert_eq!(entries[1].data, "A-77");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_without_key_is_empty() {
        let dir = scratch_dir("nokey");
        fs::write(dir.join(LEGACY_FILENAME), r#"{"theme":"dark"}"#).unwrap();
        assert!(read_entries(&dir).unwrap().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_blob_is_error() {
        let dir = scratch_dir("corrupt");
        fs::write(dir.join(LEGACY_FILENAME), r#"{"barcodes":"[oops"}"#).unwrap();
        assert!(read_entries(&dir).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
