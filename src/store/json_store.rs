//! Keyed barcode store backed by a JSON document
//!
//! Layout: `{ "version": 1, "barcodes": [ {"name": .., "data": ..}, .. ] }`.
//! The array is the object store, keyed by `name`; records keep the position
//! where their key was first inserted.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{BarcodeStore, legacy};
use crate::config::SaveStrategy;
use crate::constants::store::{FILENAME, TMP_FILENAME, VERSION};
use crate::types::BarcodeEntry;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    /// Set once the legacy blob has been checked, so it is never re-imported
    #[serde(default)]
    legacy_imported: bool,
    #[serde(default)]
    barcodes: Vec<BarcodeEntry>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: VERSION,
            legacy_imported: false,
            barcodes: Vec::new(),
        }
    }
}

impl StoreFile {
    /// Insert or replace by name; a replaced record keeps its position
    fn upsert(&mut self, entry: &BarcodeEntry) {
        match self.barcodes.iter_mut().find(|r| r.name == entry.name) {
            Some(existing) => existing.data = entry.data.clone(),
            None => self.barcodes.push(entry.clone()),
        }
    }
}

pub struct JsonStore {
    dir: PathBuf,
    strategy: SaveStrategy,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>, strategy: SaveStrategy) -> Self {
        Self {
            dir: dir.into(),
            strategy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self) -> PathBuf {
        self.dir.join(FILENAME)
    }

    /// Create the directory and an empty store file if missing (idempotent)
    fn ensure_created(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory {}", self.dir.display()))?;
        if !self.path().exists() {
            info!(path = %self.path().display(), "Creating empty barcode store");
            self.write(&StoreFile::default())?;
        }
        Ok(())
    }

    fn read(&self) -> Result<StoreFile> {
        let path = self.path();
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store {}", path.display()))?;
        let file: StoreFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store {}", path.display()))?;
        if file.version > VERSION {
            bail!(
                "Store {} has version {} (newest supported: {})",
                path.display(),
                file.version,
                VERSION
            );
        }
        Ok(file)
    }

    /// Write via a scratch file and rename so readers never see a partial store
    fn write(&self, file: &StoreFile) -> Result<()> {
        let tmp = self.dir.join(TMP_FILENAME);
        let json = serde_json::to_vec_pretty(file).context("Failed to serialize store")?;
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, self.path())
            .with_context(|| format!("Failed to replace store {}", self.path().display()))?;
        Ok(())
    }

    fn save_with(&mut self, entries: &[BarcodeEntry], strategy: SaveStrategy) -> Result<()> {
        self.ensure_created()?;
        let mut file = self.read()?;

        for entry in entries {
            file.upsert(entry);
        }

        if strategy == SaveStrategy::Mirror {
            let keep: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            let before = file.barcodes.len();
            file.barcodes.retain(|r| keep.contains(r.name.as_str()));
            if file.barcodes.len() != before {
                debug!(removed = before - file.barcodes.len(), "Removed keys absent from saved list");
            }
        }

        self.write(&file)?;
        debug!(count = file.barcodes.len(), strategy = ?strategy, "Saved barcodes");
        Ok(())
    }
}

impl BarcodeStore for JsonStore {
    fn load_all(&mut self) -> Result<Vec<BarcodeEntry>> {
        self.ensure_created()?;
        let mut file = self.read()?;

        if !file.legacy_imported {
            // An unreadable legacy blob must not make the keyed store unloadable;
            // it stays unimported and is retried on the next load
            match legacy::read_entries(&self.dir) {
                Ok(imported) => {
                    if !imported.is_empty() {
                        info!(count = imported.len(), "Importing barcodes from legacy store");
                        for entry in &imported {
                            file.upsert(entry);
                        }
                    }
                    file.legacy_imported = true;
                    self.write(&file)?;
                }
                Err(e) => warn!(error = ?e, "Skipping legacy import"),
            }
        }

        debug!(count = file.barcodes.len(), "Loaded barcodes");
        Ok(file.barcodes)
    }

    fn save_all(&mut self, entries: &[BarcodeEntry]) -> Result<()> {
        self.save_with(entries, self.strategy)
    }

    fn upsert_all(&mut self, entries: &[BarcodeEntry]) -> Result<()> {
        self.save_with(entries, SaveStrategy::UpsertOnly)
    }
}
