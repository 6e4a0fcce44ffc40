//! Window entity

use super::{SurfaceLayout, WindowSurface};
use crate::config::DesktopConfig;
use crate::math::{Rect, Size};
use crate::persistence::{GeometryStore, KeyValueStore, PersistedGeometry};
use crate::types::WindowId;
use crate::DesktopResult;

/// One desktop window: live geometry bound to its DOM node
///
/// While `maximized` is set, `rect` is not what is on screen: it is the
/// restore geometry captured when the window was maximized. Projection to
/// the DOM never writes back into `rect`.
#[derive(Debug)]
pub struct Window<S> {
    /// Stable identifier (the node's `id`); empty if the node had none
    pub id: WindowId,
    /// Taskbar label
    pub name: String,
    /// Windowed geometry
    pub rect: Rect,
    /// Whether the window fills the viewport
    pub maximized: bool,
    /// Stacking order
    pub z_index: i32,
    surface: S,
}

impl<S: WindowSurface> Window<S> {
    /// Wrap a window node
    ///
    /// Geometry comes from the rendered style, falling back to
    /// `config.default_size` centered in `viewport`; persisted geometry for
    /// the same id then overrides it. The resolved state is pushed back to
    /// the node.
    pub fn from_surface<K: KeyValueStore>(
        surface: S,
        viewport: Size,
        config: &DesktopConfig,
        store: &GeometryStore<K>,
    ) -> Self {
        let id = surface.element_id().unwrap_or_default();
        let name = surface
            .title()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| id.replacen(&config.slug_prefix, "", 1));

        let style = surface.rendered_style();
        let width = style.width.unwrap_or(config.default_size.width);
        let height = style.height.unwrap_or(config.default_size.height);
        let x = style
            .left
            .unwrap_or_else(|| (viewport.width - width).div_euclid(2));
        let y = style
            .top
            .unwrap_or_else(|| (viewport.height - height).div_euclid(2));

        let mut window = Self {
            id,
            name,
            rect: Rect::new(x, y, width, height),
            maximized: surface.maximized_flag(),
            z_index: style.z_index.unwrap_or(config.z_index_seed),
            surface,
        };
        window.restore_from_storage(store);
        window.update_dom();
        window
    }

    /// The window's DOM node
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Layout the node should currently display
    pub fn layout(&self) -> SurfaceLayout {
        if self.maximized {
            SurfaceLayout::Maximized {
                z_index: self.z_index,
            }
        } else {
            SurfaceLayout::Windowed {
                rect: self.rect,
                z_index: self.z_index,
            }
        }
    }

    /// Project in-memory state onto the node (idempotent)
    pub fn update_dom(&self) {
        self.surface.apply_layout(&self.layout());
    }

    /// On-screen geometry: the viewport when maximized, `rect` otherwise
    pub fn rendered_rect(&self, viewport: Size) -> Rect {
        if self.maximized {
            Rect::of_viewport(viewport)
        } else {
            self.rect
        }
    }

    /// Whether the node carries the active marker
    pub fn is_active(&self) -> bool {
        self.surface.is_active()
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.surface.set_active(active);
    }

    pub(crate) fn set_disabled(&self, disabled: bool) {
        self.surface.set_disabled(disabled);
    }

    /// Persistable view of the current state
    pub fn snapshot(&self) -> PersistedGeometry {
        PersistedGeometry::new(self.rect, self.maximized, self.z_index)
    }

    /// Write this window's geometry to the store
    pub fn save_to_storage<K: KeyValueStore>(&self, store: &GeometryStore<K>) -> DesktopResult<()> {
        store.save_geometry(&self.id, &self.snapshot())
    }

    /// Overlay persisted geometry onto the current state
    ///
    /// Fails soft: a missing or undecodable entry leaves the state as it
    /// is. Returns whether persisted geometry was applied.
    pub fn restore_from_storage<K: KeyValueStore>(&mut self, store: &GeometryStore<K>) -> bool {
        if self.id.is_empty() {
            return false;
        }
        match store.load_geometry(&self.id) {
            Ok(Some(saved)) => {
                self.rect = saved.rect();
                self.maximized = saved.maximized;
                self.z_index = saved.z_index;
                true
            }
            Ok(None) => {
                tracing::warn!(window = %self.id, "no saved geometry");
                false
            }
            Err(e) => {
                tracing::warn!(window = %self.id, error = %e, "could not restore window state");
                false
            }
        }
    }

    /// Forget this window's persisted geometry
    pub fn remove_from_storage<K: KeyValueStore>(&self, store: &GeometryStore<K>) -> DesktopResult<()> {
        store.remove_geometry(&self.id)
    }
}
