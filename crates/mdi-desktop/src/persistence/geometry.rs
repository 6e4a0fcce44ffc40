//! Per-window geometry records and the open-window list

use super::KeyValueStore;
use crate::config::DesktopConfig;
use crate::math::Rect;
use crate::types::{WindowId, PIXEL_LIMIT};
use crate::{DesktopError, DesktopResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Snapshot of one window as written to storage
///
/// Serialized as `{x, y, width, height, maximized, zIndex}`. Pixel fields
/// accept fractional numbers (layout APIs report sub-pixel sizes) and round
/// them; values beyond [`PIXEL_LIMIT`] make the entry corrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGeometry {
    #[serde(deserialize_with = "pixel")]
    pub x: i32,
    #[serde(deserialize_with = "pixel")]
    pub y: i32,
    #[serde(deserialize_with = "pixel")]
    pub width: i32,
    #[serde(deserialize_with = "pixel")]
    pub height: i32,
    #[serde(default)]
    pub maximized: bool,
    #[serde(deserialize_with = "pixel")]
    pub z_index: i32,
}

impl PersistedGeometry {
    /// Build a snapshot from live state
    pub fn new(rect: Rect, maximized: bool, z_index: i32) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            maximized,
            z_index,
        }
    }

    /// Stored (restore) rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

fn pixel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.abs() > f64::from(PIXEL_LIMIT) {
        return Err(serde::de::Error::custom("pixel value out of range"));
    }
    Ok(value.round() as i32)
}

/// Typed view over the two persisted layout records
pub struct GeometryStore<K> {
    backend: K,
    state_key: String,
    open_key: String,
}

impl<K: KeyValueStore> GeometryStore<K> {
    /// Wrap a key-value backend using the keys named in `config`
    pub fn new(backend: K, config: &DesktopConfig) -> Self {
        Self {
            backend,
            state_key: config.window_state_key.clone(),
            open_key: config.open_windows_key.clone(),
        }
    }

    /// Underlying key-value store
    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Read the persisted geometry of one window
    ///
    /// `Ok(None)` when nothing is stored for `id`; `Err` when the map or
    /// this window's entry cannot be decoded.
    pub fn load_geometry(&self, id: &str) -> DesktopResult<Option<PersistedGeometry>> {
        let mut map = self.read_map()?;
        match map.remove(id) {
            None => Ok(None),
            Some(entry) => serde_json::from_value(entry).map(Some).map_err(|e| {
                DesktopError::CorruptStorage {
                    key: self.state_key.clone(),
                    reason: format!("entry '{}': {}", id, e),
                }
            }),
        }
    }

    /// Write (insert or replace) the geometry of one window
    pub fn save_geometry(&self, id: &str, geometry: &PersistedGeometry) -> DesktopResult<()> {
        let mut map = self.read_map_or_empty();
        let entry = serde_json::to_value(geometry).map_err(|e| DesktopError::StorageWrite {
            key: self.state_key.clone(),
            reason: e.to_string(),
        })?;
        map.insert(id.to_string(), entry);
        self.write_map(&map)
    }

    /// Forget the geometry of one window
    pub fn remove_geometry(&self, id: &str) -> DesktopResult<()> {
        let mut map = self.read_map_or_empty();
        map.remove(id);
        self.write_map(&map)
    }

    /// Ids of the windows that were open when the list was last written
    ///
    /// Missing or corrupt data yields an empty list.
    pub fn open_windows(&self) -> Vec<WindowId> {
        let Some(raw) = self.backend.get(&self.open_key) else {
            return Vec::new();
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<WindowId>>(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(key = %self.open_key, error = %e, "discarding corrupt open-window list");
                Vec::new()
            }
        }
    }

    /// Replace the open-window list
    pub fn save_open_windows(&self, ids: &[WindowId]) -> DesktopResult<()> {
        let raw = serde_json::to_string(ids).map_err(|e| DesktopError::StorageWrite {
            key: self.open_key.clone(),
            reason: e.to_string(),
        })?;
        self.backend.set(&self.open_key, &raw)
    }

    fn read_map(&self) -> DesktopResult<Map<String, Value>> {
        match self.backend.get(&self.state_key) {
            None => Ok(Map::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| DesktopError::CorruptStorage {
                key: self.state_key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn read_map_or_empty(&self) -> Map<String, Value> {
        self.read_map().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding corrupt window geometry map");
            Map::new()
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> DesktopResult<()> {
        let raw = serde_json::to_string(map).map_err(|e| DesktopError::StorageWrite {
            key: self.state_key.clone(),
            reason: e.to_string(),
        })?;
        self.backend.set(&self.state_key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn store() -> GeometryStore<MemoryStore> {
        GeometryStore::new(MemoryStore::new(), &DesktopConfig::default())
    }

    #[test]
    fn test_save_and_load_geometry() {
        let store = store();
        let geometry = PersistedGeometry::new(Rect::new(50, 60, 420, 310), false, 1004);

        store.save_geometry("window-a", &geometry).unwrap();

        assert_eq!(store.load_geometry("window-a").unwrap(), Some(geometry));
        assert_eq!(store.load_geometry("window-b").unwrap(), None);
    }

    #[test]
    fn test_wire_format() {
        let store = store();
        store
            .save_geometry(
                "window-a",
                &PersistedGeometry::new(Rect::new(1, 2, 300, 200), true, 1001),
            )
            .unwrap();

        let raw = store.backend().get("windowState").unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "window-a": {"x": 1, "y": 2, "width": 300, "height": 200, "maximized": true, "zIndex": 1001}
            })
        );
    }

    #[test]
    fn test_fractional_pixels_are_rounded() {
        let store = store();
        store
            .backend()
            .set(
                "windowState",
                r#"{"w":{"x":10.4,"y":20.6,"width":400.5,"height":300,"maximized":false,"zIndex":1002}}"#,
            )
            .unwrap();

        let geometry = store.load_geometry("w").unwrap().unwrap();
        assert_eq!(geometry.rect(), Rect::new(10, 21, 401, 300));
        assert_eq!(geometry.z_index, 1002);
    }

    #[test]
    fn test_corrupt_map_is_error_on_load() {
        let store = store();
        store.backend().set("windowState", "{broken").unwrap();

        let err = store.load_geometry("window-a").unwrap_err();
        assert!(matches!(err, DesktopError::CorruptStorage { .. }));
    }

    #[test]
    fn test_corrupt_entry_does_not_hide_others() {
        let store = store();
        store
            .backend()
            .set(
                "windowState",
                r#"{"bad":{"x":"left"},"good":{"x":1,"y":2,"width":300,"height":200,"maximized":false,"zIndex":1000}}"#,
            )
            .unwrap();

        assert!(store.load_geometry("bad").is_err());
        assert_eq!(
            store.load_geometry("good").unwrap().map(|g| g.rect()),
            Some(Rect::new(1, 2, 300, 200))
        );
    }

    #[test]
    fn test_out_of_range_entry_is_corrupt() {
        let store = store();
        store
            .backend()
            .set(
                "windowState",
                r#"{"high":{"x":0,"y":0,"width":400,"height":300,"maximized":false,"zIndex":2147483647},
                    "wide":{"x":2e9,"y":0,"width":2e9,"height":300,"maximized":false,"zIndex":1000},
                    "edge":{"x":-1e9,"y":0,"width":1e9,"height":300,"maximized":false,"zIndex":1e9}}"#,
            )
            .unwrap();

        assert!(matches!(
            store.load_geometry("high"),
            Err(DesktopError::CorruptStorage { .. })
        ));
        assert!(store.load_geometry("wide").is_err());
        let edge = store.load_geometry("edge").unwrap().unwrap();
        assert_eq!(edge.rect(), Rect::new(-1_000_000_000, 0, 1_000_000_000, 300));
        assert_eq!(edge.z_index, 1_000_000_000);
    }

    #[test]
    fn test_save_over_corrupt_map_starts_fresh() {
        let store = store();
        store.backend().set("windowState", "not json").unwrap();

        let geometry = PersistedGeometry::new(Rect::new(0, 0, 200, 150), false, 1000);
        store.save_geometry("window-a", &geometry).unwrap();

        assert_eq!(store.load_geometry("window-a").unwrap(), Some(geometry));
    }

    #[test]
    fn test_remove_geometry() {
        let store = store();
        let geometry = PersistedGeometry::new(Rect::new(0, 0, 200, 150), false, 1000);
        store.save_geometry("window-a", &geometry).unwrap();
        store.save_geometry("window-b", &geometry).unwrap();

        store.remove_geometry("window-a").unwrap();

        assert_eq!(store.load_geometry("window-a").unwrap(), None);
        assert_eq!(store.load_geometry("window-b").unwrap(), Some(geometry));
    }

    #[test]
    fn test_open_windows_roundtrip_and_corruption() {
        let store = store();
        assert!(store.open_windows().is_empty());

        store
            .save_open_windows(&["window-a".to_string(), "window-b".to_string()])
            .unwrap();
        assert_eq!(store.open_windows(), vec!["window-a", "window-b"]);

        store.backend().set("openWindows", "[1, 2").unwrap();
        assert!(store.open_windows().is_empty());
    }
}
