//! Configuration management for Barcode Wallet
//!
//! A single JSON settings file; the barcode list itself lives in the store.

pub mod settings;

// Re-export commonly used types
pub use settings::{Config, SaveStrategy};
