//! Editor configuration.
//!
//! Plain data with sensible defaults. Deserializes from a (possibly partial)
//! JSON object so the host can override only what it cares about.

use serde::{Deserialize, Serialize};

/// Keys under which the editor writes to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageKeys {
    pub slides: String,
    pub meta: String,
    pub undo: String,
    pub redo: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            slides: "presentationSlides".into(),
            meta: "presentationMeta".into(),
            undo: "undoHistory".into(),
            redo: "redoHistory".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo entries kept before the oldest is evicted. Default: **50**.
    pub history_depth: usize,

    /// Smallest width/height a resize may produce. Default: **20**.
    pub min_element_size: f32,

    /// Distance (canvas units) within which a pointer grabs a resize handle.
    pub handle_tolerance: f32,

    /// Offset applied to each pasted element so it doesn't cover the source.
    pub paste_offset: f32,

    /// Also persist the undo/redo stacks, so history survives a reload.
    /// Default: **true**.
    pub persist_history: bool,

    pub keys: StorageKeys,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            min_element_size: 20.0,
            handle_tolerance: 6.0,
            paste_offset: 20.0,
            persist_history: true,
            keys: StorageKeys::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
