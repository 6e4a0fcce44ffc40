//! On-demand window loading and restore after reload
//!
//! Each async operation is split into a fetch (done by the caller or by the
//! provided [`ContentProvider`]) and a synchronous install step. Hosts that
//! cannot hold the manager across an `await` fetch on their own and hand
//! the result to [`install_fetched`](WindowManager::install_fetched) or
//! [`adopt_restored`](WindowManager::adopt_restored).

use super::{ContentProvider, Shell, WindowManager};
use crate::persistence::KeyValueStore;
use crate::types::WindowId;
use crate::window::WindowSurface;
use crate::{DesktopError, DesktopResult};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

impl<H: Shell, K: KeyValueStore> WindowManager<H, K> {
    /// Install fetched window content
    ///
    /// Fetch errors and fragments whose root is not a window are logged and
    /// dropped before anything touches the document.
    pub fn install_fetched(
        &mut self,
        requested: &str,
        fetched: DesktopResult<H::Surface>,
    ) -> Option<WindowId> {
        let surface = match fetched {
            Ok(surface) => surface,
            Err(e) => {
                error!(window = %requested, error = %e, "failed to load window");
                return None;
            }
        };
        let has_id = surface.element_id().is_some_and(|id| !id.is_empty());
        if !surface.has_window_marker() || !has_id {
            let e = DesktopError::InvalidContent {
                id: requested.to_string(),
            };
            warn!(error = %e, "discarding fetched content");
            return None;
        }

        self.shell.attach_window(&surface);
        let window = self.wrap_surface(surface);
        if window.id != requested {
            debug!(requested = %requested, window = %window.id, "fetched window has another id");
        }
        self.register_window(window)
    }

    /// Fetch window `id` from `provider` and register it
    ///
    /// An already open window is returned without fetching.
    pub async fn fetch_window<P>(&mut self, provider: &P, id: &str) -> Option<WindowId>
    where
        P: ContentProvider<Surface = H::Surface>,
    {
        if self.windows.contains_key(id) {
            debug!(window = %id, "fetch_window: already open");
            return Some(id.to_string());
        }
        let fetched = provider.fetch_window(id).await;
        self.install_fetched(id, fetched)
    }

    /// Windows that were open before the reload and still need fetching
    ///
    /// Drains the queue read at construction: duplicates and windows already
    /// open (pre-rendered ones) are skipped. A second call returns nothing.
    pub fn take_pending_restores(&mut self) -> Vec<WindowId> {
        let queue = std::mem::take(&mut self.restore_queue);
        let mut seen = HashSet::new();
        queue
            .into_iter()
            .filter(|id| !id.is_empty() && !self.windows.contains_key(id))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    /// Install a window fetched during restore
    ///
    /// The restored window becomes active when nothing open stacks above it.
    pub fn adopt_restored(
        &mut self,
        requested: &str,
        fetched: DesktopResult<H::Surface>,
    ) -> Option<WindowId> {
        if self.windows.contains_key(requested) {
            debug!(window = %requested, "restore skipped: already open");
            return None;
        }
        let id = self.install_fetched(requested, fetched)?;
        let z_index = self.windows.get(&id)?.z_index;
        let topmost = self
            .windows
            .values()
            .all(|other| other.id == id || other.z_index <= z_index);
        if topmost {
            self.z_counter = self.z_counter.max(z_index);
            self.mark_active(&id);
            self.update_taskbar();
        }
        Some(id)
    }

    /// Re-open every window that was open before the reload
    ///
    /// Windows are fetched one after another in their persisted order, so
    /// the open order (and the taskbar) survives the reload.
    pub async fn restore_open_windows<P>(&mut self, provider: &P) -> Vec<WindowId>
    where
        P: ContentProvider<Surface = H::Surface>,
    {
        let mut restored = Vec::new();
        for id in self.take_pending_restores() {
            let fetched = provider.fetch_window(&id).await;
            if let Some(id) = self.adopt_restored(&id, fetched) {
                restored.push(id);
            }
        }
        info!(count = restored.len(), "restored open windows");
        restored
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DesktopConfig;
    use crate::headless::{HeadlessShell, HeadlessSurface, StaticContentProvider};
    use crate::math::{Rect, Size};
    use crate::persistence::{GeometryStore, KeyValueStore, MemoryStore, PersistedGeometry};
    use crate::{DesktopError, WindowManager};

    type TestManager = WindowManager<HeadlessShell, MemoryStore>;

    fn manager(store: &MemoryStore, prerendered: &[HeadlessSurface]) -> (TestManager, HeadlessShell) {
        let shell = HeadlessShell::new(Size::new(1280, 800));
        for surface in prerendered {
            shell.add_prerendered(surface.clone());
        }
        let mut manager = WindowManager::new(DesktopConfig::default(), shell.clone(), store.clone());
        manager.init();
        (manager, shell)
    }

    fn seed(store: &MemoryStore, open: &[&str], geometry: &[(&str, PersistedGeometry)]) {
        let geometry_store = GeometryStore::new(store.clone(), &DesktopConfig::default());
        let open: Vec<String> = open.iter().map(|id| id.to_string()).collect();
        geometry_store.save_open_windows(&open).unwrap();
        for (id, saved) in geometry {
            geometry_store.save_geometry(id, saved).unwrap();
        }
    }

    #[test]
    fn test_install_fetched_attaches_and_registers() {
        let store = MemoryStore::new();
        let (mut manager, shell) = manager(&store, &[]);
        let jobs = HeadlessSurface::window("window-jobs");

        let id = manager.install_fetched("window-jobs", Ok(jobs.clone()));

        assert_eq!(id.as_deref(), Some("window-jobs"));
        assert_eq!(shell.attached().len(), 1);
        assert!(jobs.layout().is_some());
        assert_eq!(manager.store().open_windows(), ["window-jobs"]);
    }

    #[test]
    fn test_install_rejects_non_window_content() {
        let store = MemoryStore::new();
        let (mut manager, shell) = manager(&store, &[]);

        assert_eq!(manager.install_fetched("window-x", Ok(HeadlessSurface::fragment())), None);
        assert_eq!(
            manager.install_fetched("window-x", Ok(HeadlessSurface::anonymous_window())),
            None
        );
        let failed = Err(DesktopError::FetchFailed {
            id: "window-x".to_string(),
            reason: "HTTP 500".to_string(),
        });
        assert_eq!(manager.install_fetched("window-x", failed), None);

        assert!(shell.attached().is_empty());
        assert_eq!(manager.window_count(), 0);
    }

    #[test]
    fn test_fetch_window_skips_open_windows() {
        let store = MemoryStore::new();
        let (mut manager, _) = manager(&store, &[HeadlessSurface::window("window-a")]);
        let provider = StaticContentProvider::new();

        let id = pollster::block_on(manager.fetch_window(&provider, "window-a"));

        assert_eq!(id.as_deref(), Some("window-a"));
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn test_pending_restores_skip_prerendered_and_duplicates() {
        let store = MemoryStore::new();
        seed(&store, &["window-a", "window-b", "window-a", "window-c"], &[]);
        let (mut manager, _) = manager(&store, &[HeadlessSurface::window("window-b")]);

        assert_eq!(manager.take_pending_restores(), ["window-a", "window-c"]);
        assert!(manager.take_pending_restores().is_empty());
    }

    #[test]
    fn test_restore_applies_saved_geometry_and_activates_topmost() {
        let store = MemoryStore::new();
        seed(
            &store,
            &["window-a", "window-b"],
            &[
                ("window-a", PersistedGeometry::new(Rect::new(50, 50, 400, 300), false, 1007)),
                ("window-b", PersistedGeometry::new(Rect::new(90, 60, 300, 200), false, 1003)),
            ],
        );
        let (mut manager, _) = manager(&store, &[]);
        let a = HeadlessSurface::window("window-a");
        let provider = StaticContentProvider::new()
            .with_window("window-a", a.clone())
            .with_window("window-b", HeadlessSurface::window("window-b"));

        let restored = pollster::block_on(manager.restore_open_windows(&provider));

        assert_eq!(restored, ["window-a", "window-b"]);
        assert_eq!(manager.window("window-a").unwrap().rect, Rect::new(50, 50, 400, 300));
        assert_eq!(manager.active_window().map(|w| w.id.as_str()), Some("window-a"));
        assert_eq!(manager.z_counter(), 1007);
        assert_eq!(manager.store().open_windows(), ["window-a", "window-b"]);
        assert!(store.get("windowState").is_some());
    }

    #[test]
    fn test_restore_failure_drops_window_from_open_list() {
        let store = MemoryStore::new();
        seed(&store, &["window-gone", "window-a"], &[]);
        let (mut manager, _) = manager(&store, &[]);
        let provider = StaticContentProvider::new()
            .with_window("window-a", HeadlessSurface::window("window-a"));

        let restored = pollster::block_on(manager.restore_open_windows(&provider));

        assert_eq!(restored, ["window-a"]);
        assert_eq!(manager.store().open_windows(), ["window-a"]);
    }
}
