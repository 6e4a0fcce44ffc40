//! Persistence of window layout across page reloads
//!
//! The host provides a synchronous string key-value store (`localStorage` in
//! the browser). [`GeometryStore`] layers the two logical records on top of
//! it: the per-window geometry map and the list of open window ids.

mod geometry;

pub use geometry::{GeometryStore, PersistedGeometry};

use crate::{DesktopError, DesktopResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Synchronous string-keyed storage scoped to the page origin
pub trait KeyValueStore {
    /// Read a value, `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> DesktopResult<()>;

    /// Delete a value (absent keys are ignored)
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`]
///
/// Clones share the same underlying map, so a store handed to one manager
/// instance can be handed to the next one to simulate a page reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, like a full or disabled quota
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> DesktopResult<()> {
        if self.read_only.get() {
            return Err(DesktopError::StorageWrite {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let reloaded = store.clone();

        store.set("openWindows", "[\"window-a\"]").unwrap();
        assert_eq!(reloaded.get("openWindows").as_deref(), Some("[\"window-a\"]"));

        reloaded.remove("openWindows");
        assert!(store.get("openWindows").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_read_only() {
        let store = MemoryStore::new();
        store.set_read_only(true);

        let err = store.set("windowState", "{}").unwrap_err();
        assert!(matches!(err, DesktopError::StorageWrite { .. }));
        assert_eq!(store.len(), 0);
    }
}
