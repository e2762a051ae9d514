//! Local persistence of the barcode list
//!
//! The keyed JSON store is canonical; the legacy single-blob layout is only
//! read for one-time import. All writes go through the single-writer queue
//! in [`queue`], so overlapping saves never interleave.

use anyhow::Result;

use crate::types::BarcodeEntry;

mod json_store;
mod legacy;
pub mod queue;

pub use json_store::JsonStore;
pub use queue::{StoreHandle, StoreStatus};

/// Durable mapping from barcode name to entry
pub trait BarcodeStore: Send {
    /// All stored entries in stored order; empty on first run.
    /// Creates the backing storage when absent.
    fn load_all(&mut self) -> Result<Vec<BarcodeEntry>>;

    /// Upsert every entry keyed by name; the save strategy decides what
    /// happens to stored keys missing from `entries`
    fn save_all(&mut self, entries: &[BarcodeEntry]) -> Result<()>;

    /// Upsert every entry and never remove a stored key
    fn upsert_all(&mut self, entries: &[BarcodeEntry]) -> Result<()>;
}
