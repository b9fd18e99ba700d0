//! `localStorage` behind the editor's `Storage` trait.

use deck_editor::{Storage, StorageError};
use wasm_bindgen::JsValue;

/// The browser's `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// `None` when there is no window or storage access is denied
    /// (e.g. sandboxed iframes).
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|err| classify(&err, key, value.len()))
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.inner.remove_item(key) {
            log::warn!("localStorage.removeItem('{key}') failed: {err:?}");
        }
    }
}

/// Map a thrown `DOMException` to a storage error.
fn classify(err: &JsValue, key: &str, bytes: usize) -> StorageError {
    let name = js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    storage_error(&name, key, bytes)
}

/// Both spellings: Firefox used `NS_ERROR_DOM_QUOTA_REACHED` before
/// adopting the standard name.
fn storage_error(exception: &str, key: &str, bytes: usize) -> StorageError {
    match exception {
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StorageError::QuotaExceeded {
            key: key.to_string(),
            bytes,
        },
        "" => StorageError::Unavailable("localStorage write failed".into()),
        other => StorageError::Unavailable(other.to_string()),
    }
}
