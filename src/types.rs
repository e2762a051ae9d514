//! Core domain types

use serde::{Deserialize, Serialize};

/// One stored barcode: a display name and the raw value to encode
///
/// `name` doubles as the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeEntry {
    pub name: String,
    pub data: String,
}

impl BarcodeEntry {
    /// Build an entry, or `None` when either field is empty
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let data = data.into();
        if name.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self { name, data })
    }
}
