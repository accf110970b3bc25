use crate::error::{Result, TrackError};
use crate::io;
use crate::item::TrackedItem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The whole persisted collection, keyed by tracking code.
pub type Items = BTreeMap<String, TrackedItem>;

/// Durable key-value persistence of tracked items: one JSON document,
/// replaced wholesale on every save.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection. A missing file is an empty store; a
    /// present-but-unparsable file is fatal, never silently discarded.
    pub fn load(&self) -> Result<Items> {
        if !self.path.exists() {
            return Ok(Items::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|source| TrackError::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the persisted collection. Pretty-printed so the file
    /// stays hand-inspectable.
    pub fn save(&self, items: &Items) -> Result<()> {
        let mut data = serde_json::to_vec_pretty(items)?;
        data.push(b'\n');
        io::atomic_write(&self.path, &data)
    }

    /// Insert or replace one item.
    pub fn upsert(&self, item: TrackedItem) -> Result<()> {
        let mut items = self.load()?;
        items.insert(item.code.clone(), item);
        self.save(&items)
    }

    /// Remove one item. Returns true if it existed.
    pub fn remove(&self, code: &str) -> Result<bool> {
        let mut items = self.load()?;
        let existed = items.remove(code).is_some();
        if existed {
            self.save(&items)?;
        }
        Ok(existed)
    }
}
