//! `localStorage` backend for the geometry store

use crate::js_error;
use mdi_desktop::{DesktopError, DesktopResult, KeyValueStore};
use web_sys::Storage;

/// [`KeyValueStore`] over the page origin's `localStorage`
///
/// When storage is unavailable (disabled, sandboxed frame) reads find
/// nothing and writes fail, so the desktop still works without persistence.
#[derive(Clone, Debug)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, layout will not persist");
        }
        Self { storage }
    }

    /// Whether `localStorage` could be opened
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> DesktopResult<()> {
        let storage = self.storage.as_ref().ok_or_else(|| DesktopError::StorageWrite {
            key: key.to_string(),
            reason: "localStorage unavailable".to_string(),
        })?;
        storage
            .set_item(key, value)
            .map_err(|e| DesktopError::StorageWrite {
                key: key.to_string(),
                reason: js_error(&e),
            })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}
