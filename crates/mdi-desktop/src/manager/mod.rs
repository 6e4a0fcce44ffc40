//! Window Manager
//!
//! Owns every open [`Window`], allocates z-order, tracks the active window,
//! routes pointer sessions and drives the taskbar, start menu and modals.
//!
//! ## Consistency
//!
//! Each public mutator leaves the DOM (through the [`Shell`] and
//! [`WindowSurface`] seams), the in-memory map and the [`GeometryStore`]
//! consistent before it returns. Geometry changes made by pointer moves are
//! the one exception: they reach the DOM on every move and the store when
//! the session ends.
//!
//! ## z-order
//!
//! `z_counter` starts at [`DesktopConfig::z_index_seed`] and only grows.
//! Registering a window whose z-index is above the counter lifts the counter
//! to it, so a raise always lands strictly above every open window. When the
//! counter reaches `i32::MAX` the open windows are renumbered from the seed,
//! keeping their stacking order.

mod chrome;
mod content;
mod interaction;
mod shell;

pub use shell::{ContentProvider, MenuSelection, Shell, TaskbarItem};

use crate::config::DesktopConfig;
use crate::input::PointerSession;
use crate::persistence::{GeometryStore, KeyValueStore};
use crate::types::WindowId;
use crate::window::{Window, WindowSurface};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The desktop's window manager
pub struct WindowManager<H: Shell, K: KeyValueStore> {
    config: DesktopConfig,
    shell: H,
    store: GeometryStore<K>,
    windows: HashMap<WindowId, Window<H::Surface>>,
    /// Open order: taskbar order and persisted open-window order
    order: Vec<WindowId>,
    z_counter: i32,
    /// Identity of the active window; always a key of `windows` or `None`
    active: Option<WindowId>,
    session: Option<PointerSession>,
    start_menu_open: bool,
    active_modal: Option<String>,
    /// Open-window list as persisted by the previous page, read at construction
    restore_queue: Vec<WindowId>,
}

impl<H: Shell, K: KeyValueStore> WindowManager<H, K> {
    /// Create a manager
    ///
    /// Reads the persisted open-window list immediately, before any
    /// registration overwrites it; see [`take_pending_restores`](Self::take_pending_restores).
    pub fn new(config: DesktopConfig, shell: H, backend: K) -> Self {
        let store = GeometryStore::new(backend, &config);
        let restore_queue = store.open_windows();
        Self {
            z_counter: config.z_index_seed,
            config,
            shell,
            store,
            windows: HashMap::new(),
            order: Vec::new(),
            active: None,
            session: None,
            start_menu_open: false,
            active_modal: None,
            restore_queue,
        }
    }

    /// Register the pre-rendered windows and render the taskbar
    pub fn init(&mut self) {
        let surfaces = self.shell.discover_windows();
        debug!(count = surfaces.len(), "registering pre-rendered windows");
        for surface in surfaces {
            let window = self.wrap_surface(surface);
            self.register_window(window);
        }
        self.update_taskbar();
    }

    /// Manager configuration
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// The page seam
    pub fn shell(&self) -> &H {
        &self.shell
    }

    /// The geometry store
    pub fn store(&self) -> &GeometryStore<K> {
        &self.store
    }

    /// Look up an open window
    pub fn window(&self, id: &str) -> Option<&Window<H::Surface>> {
        self.windows.get(id)
    }

    /// Whether a window is open
    pub fn contains(&self, id: &str) -> bool {
        self.windows.contains_key(id)
    }

    /// Open windows in open order
    pub fn windows(&self) -> impl Iterator<Item = &Window<H::Surface>> {
        self.order.iter().filter_map(|id| self.windows.get(id))
    }

    /// Ids of open windows in open order
    pub fn window_ids(&self) -> &[WindowId] {
        &self.order
    }

    /// Number of open windows
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// The active window, if any
    pub fn active_window(&self) -> Option<&Window<H::Surface>> {
        self.active.as_deref().and_then(|id| self.windows.get(id))
    }

    /// Last allocated z-index
    pub fn z_counter(&self) -> i32 {
        self.z_counter
    }

    /// Wrap a node in a [`Window`] using this manager's viewport, config and store
    pub fn wrap_surface(&self, surface: H::Surface) -> Window<H::Surface> {
        Window::from_surface(surface, self.shell.viewport(), &self.config, &self.store)
    }

    /// Add a window to the desktop
    ///
    /// Windows without an id are ignored. A window whose id is already open
    /// replaces the previous instance, whose node is detached.
    pub fn register_window(&mut self, window: Window<H::Surface>) -> Option<WindowId> {
        if window.id.is_empty() {
            warn!("ignoring window without an id");
            return None;
        }
        let id = window.id.clone();

        let mut was_active = false;
        if self.windows.contains_key(&id) {
            warn!(window = %id, "window registered twice, replacing previous instance");
            if self.session.as_ref().is_some_and(|s| s.window_id() == id) {
                self.abandon_session();
            }
            if let Some(previous) = self.windows.remove(&id) {
                was_active = previous.is_active();
                previous.surface().cancel_subscriptions();
                previous.surface().detach();
            }
            self.order.retain(|open| open.as_str() != id);
        }

        self.z_counter = self.z_counter.max(window.z_index);
        window.update_dom();
        window.set_active(was_active);
        if self.active_modal.is_some() {
            window.set_disabled(true);
        }

        self.windows.insert(id.clone(), window);
        self.order.push(id.clone());
        self.save_open_windows();
        self.update_taskbar();
        info!(window = %id, "window registered");
        Some(id)
    }

    /// Raise a window above all others and mark it active
    ///
    /// No-op when no other open window has a z-index greater than or equal
    /// to this one's. Returns whether the window was raised.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(window) = self.windows.get(id) else {
            debug!(window = %id, "bring_to_front: no such window");
            return false;
        };
        let z_index = window.z_index;
        let outranked = self
            .windows
            .values()
            .any(|other| other.id != id && other.z_index >= z_index);
        if !outranked {
            return false;
        }

        let z_counter = match self.z_counter.checked_add(1) {
            Some(next) => next,
            None => self.compact_z_order().saturating_add(1),
        };
        self.z_counter = z_counter;
        if let Some(window) = self.windows.get_mut(id) {
            window.z_index = z_counter;
            window.update_dom();
        }
        self.persist(id);
        self.mark_active(id);
        self.update_taskbar();
        debug!(window = %id, z_index = z_counter, "raised window");
        true
    }

    /// Toggle a window between maximized and its windowed rect
    pub fn maximize_window(&mut self, id: &str) -> bool {
        let Some(window) = self.windows.get_mut(id) else {
            debug!(window = %id, "maximize_window: no such window");
            return false;
        };
        if window.maximized {
            window.maximized = false;
        } else {
            window.surface().capture_restore_geometry(window.rect);
            window.maximized = true;
        }
        window.update_dom();
        let maximized = window.maximized;
        self.persist(id);
        debug!(window = %id, maximized, "toggled maximize");
        true
    }

    /// Close a window permanently
    ///
    /// Live subscriptions under the window are cancelled before its node is
    /// removed. Its persisted geometry is deleted and it leaves the
    /// open-window list.
    pub fn close_window(&mut self, id: &str) -> bool {
        if !self.windows.contains_key(id) {
            debug!(window = %id, "close_window: no such window");
            return false;
        }
        if self.session.as_ref().is_some_and(|s| s.window_id() == id) {
            self.abandon_session();
        }
        let Some(window) = self.windows.remove(id) else {
            return false;
        };

        let cancelled = window.surface().cancel_subscriptions();
        window.surface().detach();
        self.order.retain(|open| open.as_str() != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        if let Err(e) = window.remove_from_storage(&self.store) {
            warn!(window = %id, error = %e, "could not remove window geometry");
        }
        self.save_open_windows();
        self.update_taskbar();
        info!(window = %id, cancelled, "window closed");
        true
    }

    /// Taskbar entries in open order
    pub fn taskbar_items(&self) -> Vec<TaskbarItem> {
        self.windows()
            .map(|window| TaskbarItem {
                id: window.id.clone(),
                name: window.name.clone(),
                active: window.is_active(),
            })
            .collect()
    }

    /// Re-render the whole taskbar
    pub fn update_taskbar(&self) {
        self.shell.render_taskbar(&self.taskbar_items());
    }

    /// End any live session and close transient chrome
    ///
    /// Called before the host drops its document-level listeners.
    pub fn teardown(&mut self) {
        self.end_session();
        self.close_start_menu();
        if let Some(modal) = self.active_modal.clone() {
            self.close_modal(&modal);
        }
        debug!("window manager torn down");
    }

    /// Renumber open windows from the seed in stacking order; returns the
    /// highest z-index assigned
    fn compact_z_order(&mut self) -> i32 {
        let mut stack: Vec<(i32, usize, WindowId)> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(pos, id)| self.windows.get(id).map(|w| (w.z_index, pos, id.clone())))
            .collect();
        stack.sort();
        warn!(windows = stack.len(), "z-index counter exhausted, renumbering windows");

        let count = i32::try_from(stack.len()).unwrap_or(i32::MAX);
        let mut z_index = self.config.z_index_seed.min(i32::MAX.saturating_sub(count));
        let mut top = z_index;
        for (_, _, id) in &stack {
            if let Some(window) = self.windows.get_mut(id) {
                window.z_index = z_index;
                window.update_dom();
            }
            self.persist(id);
            top = z_index;
            z_index = z_index.saturating_add(1);
        }
        self.z_counter = top;
        top
    }

    fn mark_active(&mut self, id: &str) {
        for window in self.windows.values() {
            window.set_active(window.id == id);
        }
        self.active = Some(id.to_string());
    }

    fn persist(&self, id: &str) {
        if let Some(window) = self.windows.get(id) {
            if let Err(e) = window.save_to_storage(&self.store) {
                warn!(window = %id, error = %e, "could not save window geometry");
            }
        }
    }

    fn save_open_windows(&self) {
        if let Err(e) = self.store.save_open_windows(&self.order) {
            warn!(error = %e, "could not save open windows");
        }
    }
}
