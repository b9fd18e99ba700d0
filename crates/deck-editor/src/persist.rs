//! Durable storage for the deck.
//!
//! The host supplies a string key-value `Storage` (browser `localStorage`,
//! or `MemoryStorage` in tests and native builds). `Persistence` writes the
//! slide list, presentation metadata and, optionally, the undo/redo stacks
//! as JSON under the configured keys, and reads them back on startup.
//!
//! Loading never fails: absent or malformed data falls back to a single
//! default slide. Writes may fail (quota); callers treat that as a warning.

use crate::config::StorageKeys;
use crate::history::{History, Snapshot};
use deck_core::{LayoutKind, PresentationMeta, Slide};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The write would exceed the storage quota.
    #[error("Storage quota exceeded writing '{key}' ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    /// The backing store could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

// ─── In-memory storage ───────────────────────────────────────────────────

/// `HashMap`-backed storage with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys + values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently held (keys + values).
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let after = self.used_bytes() - replaced + key.len() + value.len();
            if after > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// ─── Persistence adapter ─────────────────────────────────────────────────

pub struct Persistence {
    storage: Box<dyn Storage>,
    keys: StorageKeys,
}

impl Persistence {
    pub fn new(storage: Box<dyn Storage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    fn write<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }

    /// Read and decode `key`. `None` when absent; malformed data is logged
    /// and treated as absent.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring malformed '{key}' in storage: {e}");
                None
            }
        }
    }

    pub fn save_slides(&mut self, slides: &[Slide]) -> Result<(), StorageError> {
        let key = self.keys.slides.clone();
        self.write(&key, slides)
    }

    pub fn save_meta(&mut self, meta: &PresentationMeta) -> Result<(), StorageError> {
        let key = self.keys.meta.clone();
        self.write(&key, meta)
    }

    pub fn save_history(&mut self, history: &History) -> Result<(), StorageError> {
        let undo: Vec<&Snapshot> = history.undo_entries().collect();
        let redo: Vec<&Snapshot> = history.redo_entries().collect();
        let (undo_key, redo_key) = (self.keys.undo.clone(), self.keys.redo.clone());
        self.write(&undo_key, &undo)?;
        self.write(&redo_key, &redo)
    }

    /// Drop any persisted history (used when history persistence is off).
    pub fn clear_history(&mut self) {
        let (undo_key, redo_key) = (self.keys.undo.clone(), self.keys.redo.clone());
        self.storage.remove(&undo_key);
        self.storage.remove(&redo_key);
    }

    /// The last saved slide list, or one default slide.
    pub fn load_slides(&self) -> Vec<Slide> {
        match self.read::<Vec<Slide>>(&self.keys.slides) {
            Some(mut slides) if !slides.is_empty() => {
                for slide in &mut slides {
                    slide.dedup_element_ids();
                }
                log::debug!("loaded {} slides", slides.len());
                slides
            }
            _ => vec![Slide::new(LayoutKind::TitleContent)],
        }
    }

    pub fn load_meta(&self) -> PresentationMeta {
        self.read(&self.keys.meta).unwrap_or_default()
    }

    /// Persisted undo/redo stacks, or an empty history.
    pub fn load_history(&self, max_depth: usize) -> History {
        let undo: Vec<Snapshot> = self.read(&self.keys.undo).unwrap_or_default();
        let redo: Vec<Snapshot> = self.read(&self.keys.redo).unwrap_or_default();
        // Restoring an empty deck would break the non-empty invariant.
        let undo = undo.into_iter().filter(|s| !s.is_empty()).collect();
        let redo = redo.into_iter().filter(|s| !s.is_empty()).collect();
        History::from_entries(max_depth, undo, redo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Element, ShapeType};
    use pretty_assertions::assert_eq;

    fn persistence(storage: MemoryStorage) -> Persistence {
        Persistence::new(Box::new(storage), StorageKeys::default())
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let mut storage = MemoryStorage::with_quota(32);
        assert!(storage.set("k", "small").is_ok());
        let err = storage.set("big", &"x".repeat(64)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { ref key, .. } if key == "big"));
        assert_eq!(storage.get("k").as_deref(), Some("small"));
        assert_eq!(storage.get("big"), None);
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("k", "123456789").unwrap();
        storage.set("k", "987654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }

    #[test]
    fn missing_slides_fall_back_to_default() {
        let p = persistence(MemoryStorage::new());
        let slides = p.load_slides();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].layout, LayoutKind::TitleContent);
    }

    #[test]
    fn malformed_and_empty_fall_back_to_default() {
        let mut storage = MemoryStorage::new();
        storage.set("presentationSlides", "{not json").unwrap();
        assert_eq!(persistence(storage).load_slides().len(), 1);

        let mut storage = MemoryStorage::new();
        storage.set("presentationSlides", "[]").unwrap();
        assert_eq!(persistence(storage).load_slides().len(), 1);
    }

    #[test]
    fn slides_roundtrip() {
        let mut p = persistence(MemoryStorage::new());
        let mut slide = Slide::new(LayoutKind::TwoColumn);
        slide.title = "Plan".into();
        slide.add_element(Element::shape(ShapeType::Circle, 10.0, 20.0));
        p.save_slides(&[slide.clone()]).unwrap();
        assert_eq!(p.load_slides(), vec![slide]);
    }

    #[test]
    fn duplicate_element_ids_are_renamed_on_load() {
        let mut slide = Slide::new(LayoutKind::Blank);
        let el = Element::shape(ShapeType::Star, 0.0, 0.0);
        slide.elements.push(el.clone());
        slide.elements.push(el.clone());

        let mut p = persistence(MemoryStorage::new());
        p.save_slides(&[slide]).unwrap();
        let loaded = p.load_slides();
        assert_eq!(loaded[0].elements[0].id, el.id);
        assert_ne!(loaded[0].elements[1].id, el.id);
    }

    #[test]
    fn history_roundtrip() {
        let mut p = persistence(MemoryStorage::new());
        let mut history = History::new(50);
        history.record(vec![Slide::new(LayoutKind::Blank)]);
        history.record(vec![Slide::new(LayoutKind::TitleOnly)]);
        p.save_history(&history).unwrap();

        let loaded = p.load_history(50);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.redo_len(), 0);

        p.clear_history();
        assert!(p.load_history(50).is_empty());
    }
}
