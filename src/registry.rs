//! In-memory ordered barcode list, written back after every mutation

use tracing::{debug, info, warn};

use crate::store::StoreHandle;
use crate::types::BarcodeEntry;

/// Sink receiving the full list after each mutation
pub trait Persist {
    /// Make storage match `entries` under the configured save strategy
    fn persist(&self, entries: &[BarcodeEntry]);

    /// Insert or replace `entries` without removing anything already stored
    fn persist_upsert(&self, entries: &[BarcodeEntry]);
}

impl Persist for StoreHandle {
    fn persist(&self, entries: &[BarcodeEntry]) {
        self.save(entries.to_vec());
    }

    fn persist_upsert(&self, entries: &[BarcodeEntry]) {
        self.upsert(entries.to_vec());
    }
}

/// Whether the in-memory list reflects what is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    /// Startup load not answered yet; writes are held back
    Pending,
    Loaded,
    /// Startup load failed; the list is a partial view, so writes never delete
    Failed,
}

pub struct Registry<P: Persist> {
    entries: Vec<BarcodeEntry>,
    sink: P,
    state: LoadState,
}

impl<P: Persist> Registry<P> {
    /// Empty registry; entries arrive via [`Registry::merge_loaded`]
    pub fn new(sink: P) -> Self {
        Self {
            entries: Vec::new(),
            sink,
            state: LoadState::Pending,
        }
    }

    /// Append an entry; returns false (and does nothing) if either field is empty
    pub fn add(&mut self, name: &str, data: &str) -> bool {
        let Some(entry) = BarcodeEntry::new(name, data) else {
            debug!("Ignoring add with empty name or data");
            return false;
        };
        info!(name = %entry.name, "Adding barcode");
        self.entries.push(entry);
        self.write();
        true
    }

    /// Remove the entry at `index`; out of range is a no-op returning `None`
    pub fn delete(&mut self, index: usize) -> Option<BarcodeEntry> {
        if index >= self.entries.len() {
            debug!(index, len = self.entries.len(), "Ignoring delete of out-of-range index");
            return None;
        }
        let removed = self.entries.remove(index);
        info!(name = %removed.name, index, "Deleted barcode");
        self.write();
        Some(removed)
    }

    pub fn list(&self) -> &[BarcodeEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&BarcodeEntry> {
        self.entries.get(index)
    }

    /// Install entries from the startup load
    ///
    /// Stored entries come first. Anything added while the load was still in
    /// flight is kept after them and the combined list is written back.
    pub fn merge_loaded(&mut self, loaded: Vec<BarcodeEntry>) {
        let pending = std::mem::replace(&mut self.entries, loaded);
        self.state = LoadState::Loaded;
        info!(loaded = self.entries.len(), pending = pending.len(), "Installed stored barcodes");
        if !pending.is_empty() {
            self.entries.extend(pending);
            self.write();
        }
    }

    /// Record that the startup load failed
    ///
    /// Stored keys were never seen, so from here on saves only insert or
    /// replace. Entries added while the load was in flight are written now.
    pub fn load_failed(&mut self) {
        self.state = LoadState::Failed;
        warn!(pending = self.entries.len(), "Stored barcodes unavailable, saves will not remove entries");
        if !self.entries.is_empty() {
            self.write();
        }
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    fn write(&self) {
        match self.state {
            LoadState::Pending => debug!(count = self.entries.len(), "Holding save until stored barcodes load"),
            LoadState::Loaded => self.sink.persist(&self.entries),
            LoadState::Failed => self.sink.persist_upsert(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveStrategy;
    use crate::store::{BarcodeStore, JsonStore, queue};
    use std::cell::RefCell;
    use std::fs;

    #[derive(Default)]
    struct RecordingSink {
        writes: RefCell<Vec<Vec<BarcodeEntry>>>,
        upserts: RefCell<Vec<Vec<BarcodeEntry>>>,
    }

    impl Persist for RecordingSink {
        fn persist(&self, entries: &[BarcodeEntry]) {
            self.writes.borrow_mut().push(entries.to_vec());
        }

        fn persist_upsert(&self, entries: &[BarcodeEntry]) {
            self.upserts.borrow_mut().push(entries.to_vec());
        }
    }

    fn loaded_registry() -> Registry<RecordingSink> {
        let mut registry = Registry::new(RecordingSink::default());
        registry.merge_loaded(Vec::new());
        registry
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("barcode-wallet-registry-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn entry(name: &str, data: &str) -> BarcodeEntry {
        BarcodeEntry::new(name, data).unwrap()
    }

    #[test]
    fn test_add_with_empty_field_is_noop() {
        let mut registry = loaded_registry();
        registry.add("Gym", "1");
        let before = registry.list().to_vec();

        for (name, data) in [("", "123"), ("Shop", ""), ("", "")] {
            assert!(!registry.add(name, data));
            assert_eq!(registry.list(), before.as_slice());
        }
        assert_eq!(registry.sink().writes.borrow().len(), 1);
    }

    #[test]
    fn test_add_appends_and_persists() {
        let mut registry = loaded_registry();
        assert!(registry.add("Gym", "1234567890"));

        assert_eq!(registry.list(), &[entry("Gym", "1234567890")]);
        assert_eq!(*registry.sink().writes.borrow(), vec![vec![entry("Gym", "1234567890")]]);

        registry.add("Library", "A-77");
        assert_eq!(registry.list()[1], entry("Library", "A-77"));
    }

    #[test]
    fn test_add_keeps_duplicate_names_in_memory() {
        let mut registry = loaded_registry();
        registry.add("Gym", "1");
        registry.add("Gym", "2");
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut registry = loaded_registry();
        registry.add("A", "1");
        registry.add("B", "2");
        registry.add("C", "3");

        assert_eq!(registry.delete(1), Some(entry("B", "2")));
        assert_eq!(registry.list(), &[entry("A", "1"), entry("C", "3")]);

        assert_eq!(registry.delete(0), Some(entry("A", "1")));
        assert_eq!(registry.list(), &[entry("C", "3")]);
        assert_eq!(registry.sink().writes.borrow().last().unwrap(), &vec![entry("C", "3")]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let mut registry = loaded_registry();
        registry.add("A", "1");
        registry.add("B", "2");
        let writes = registry.sink().writes.borrow().len();

        assert_eq!(registry.delete(2), None);
        assert_eq!(registry.delete(usize::MAX), None);
        assert_eq!(registry.list(), &[entry("A", "1"), entry("B", "2")]);
        assert_eq!(registry.sink().writes.borrow().len(), writes);
    }

    #[test]
    fn test_merge_loaded_without_pending_does_not_persist() {
        let mut registry = Registry::new(RecordingSink::default());
        registry.merge_loaded(vec![entry("A", "1")]);

        assert_eq!(registry.list(), &[entry("A", "1")]);
        assert!(registry.sink().writes.borrow().is_empty());
    }

    #[test]
    fn test_merge_loaded_keeps_early_adds() {
        let mut registry = Registry::new(RecordingSink::default());
        registry.add("Early", "9");
        registry.merge_loaded(vec![entry("A", "1")]);

        let expected = vec![entry("A", "1"), entry("Early", "9")];
        assert_eq!(registry.list(), expected.as_slice());
        assert_eq!(*registry.sink().writes.borrow(), vec![expected]);
    }

    #[test]
    fn test_no_writes_before_startup_load() {
        let mut registry = Registry::new(RecordingSink::default());
        registry.add("A", "1");
        registry.add("B", "2");
        registry.delete(0);

        assert_eq!(registry.list(), &[entry("B", "2")]);
        assert!(registry.sink().writes.borrow().is_empty());
        assert!(registry.sink().upserts.borrow().is_empty());
    }

    #[test]
    fn test_failed_load_switches_to_upserts() {
        let mut registry = Registry::new(RecordingSink::default());
        registry.add("Early", "9");
        registry.load_failed();
        assert_eq!(*registry.sink().upserts.borrow(), vec![vec![entry("Early", "9")]]);

        registry.add("New", "1");
        registry.delete(0);

        assert!(registry.sink().writes.borrow().is_empty());
        assert_eq!(registry.sink().upserts.borrow().last().unwrap(), &vec![entry("New", "1")]);
    }

    #[test]
    fn test_failed_load_without_entries_writes_nothing() {
        let mut registry = Registry::new(RecordingSink::default());
        registry.load_failed();
        assert!(registry.sink().upserts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_two_rapid_adds_both_persist() {
        let dir = scratch_dir("rapid");

        let (handle, worker) = queue::channel(Box::new(JsonStore::new(&dir, SaveStrategy::Mirror)));
        tokio::spawn(worker.run());

        let mut registry = Registry::new(handle.clone());
        registry.merge_loaded(handle.load().await.unwrap());
        registry.add("Gym", "1234567890");
        registry.add("Library", "A-77");
        handle.flush().await.unwrap();

        let loaded = JsonStore::new(&dir, SaveStrategy::Mirror).load_all().unwrap();
        assert_eq!(loaded, vec![entry("Gym", "1234567890"), entry("Library", "A-77")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_delete_is_reflected_after_restart() {
        let dir = scratch_dir("delete");

        let (handle, worker) = queue::channel(Box::new(JsonStore::new(&dir, SaveStrategy::Mirror)));
        tokio::spawn(worker.run());

        let mut registry = Registry::new(handle.clone());
        registry.merge_loaded(handle.load().await.unwrap());
        registry.add("A", "1");
        registry.add("B", "2");
        registry.delete(0);
        handle.flush().await.unwrap();

        let loaded = JsonStore::new(&dir, SaveStrategy::Mirror).load_all().unwrap();
        assert_eq!(loaded, vec![entry("B", "2")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_add_during_startup_load_keeps_stored_entries() {
        let dir = scratch_dir("early-add");
        JsonStore::new(&dir, SaveStrategy::Mirror)
            .save_all(&[entry("Gym", "1"), entry("Lib", "2")])
            .unwrap();

        let (handle, worker) = queue::channel(Box::new(JsonStore::new(&dir, SaveStrategy::Mirror)));
        tokio::spawn(worker.run());

        let load = handle.request_load();
        let mut registry = Registry::new(handle.clone());
        registry.add("Early", "9");
        handle.flush().await.unwrap();

        let on_disk = JsonStore::new(&dir, SaveStrategy::Mirror).load_all().unwrap();
        assert_eq!(on_disk, vec![entry("Gym", "1"), entry("Lib", "2")]);

        registry.merge_loaded(load.await.unwrap().unwrap());
        handle.flush().await.unwrap();

        let on_disk = JsonStore::new(&dir, SaveStrategy::Mirror).load_all().unwrap();
        assert_eq!(on_disk, vec![entry("Gym", "1"), entry("Lib", "2"), entry("Early", "9")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_add_after_failed_load_keeps_stored_entries() {
        let dir = scratch_dir("failed-load");
        JsonStore::new(&dir, SaveStrategy::Mirror)
            .save_all(&[entry("Gym", "1"), entry("Library", "2")])
            .unwrap();

        let (handle, worker) = queue::channel(Box::new(JsonStore::new(&dir, SaveStrategy::Mirror)));
        tokio::spawn(worker.run());

        let mut registry = Registry::new(handle.clone());
        registry.load_failed();
        registry.add("New", "9");
        handle.flush().await.unwrap();

        let on_disk = JsonStore::new(&dir, SaveStrategy::Mirror).load_all().unwrap();
        assert_eq!(on_disk, vec![entry("Gym", "1"), entry("Library", "2"), entry("New", "9")]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
