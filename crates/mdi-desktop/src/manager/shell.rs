//! Seams between the manager and the page around the windows

use crate::math::Size;
use crate::types::WindowId;
use crate::window::WindowSurface;
use crate::DesktopResult;

/// One entry of the taskbar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskbarItem {
    pub id: WindowId,
    pub name: String,
    /// Whether the window carries the active marker
    pub active: bool,
}

/// Outcome of picking a start-menu entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuSelection {
    /// The window was already open and has been raised
    Raised,
    /// The window is not open; its content must be fetched first
    NeedsFetch(WindowId),
}

/// Desktop chrome and document-level services
///
/// Implemented over the DOM by the browser binding and in memory by
/// [`HeadlessShell`](crate::headless::HeadlessShell).
pub trait Shell {
    /// Node type of a window
    type Surface: WindowSurface;

    /// Size of the desktop surface
    fn viewport(&self) -> Size;

    /// Pre-rendered window nodes present at start-up (modals excluded)
    fn discover_windows(&self) -> Vec<Self::Surface>;

    /// Insert a fetched window node into the document
    fn attach_window(&self, surface: &Self::Surface);

    /// Replace the taskbar contents with `items`
    fn render_taskbar(&self, items: &[TaskbarItem]);

    /// Show or hide the start menu
    fn set_start_menu_visible(&self, visible: bool);

    /// Whether a modal with this id exists
    fn has_modal(&self, id: &str) -> bool;

    /// Show or hide one modal
    fn set_modal_visible(&self, id: &str, visible: bool);

    /// Toggle the shared modal overlay
    fn set_overlay_active(&self, active: bool);

    /// Route document-level pointer moves/ups to the manager and suppress
    /// text selection until [`release_pointer`](Shell::release_pointer)
    fn capture_pointer(&self);

    /// Undo [`capture_pointer`](Shell::capture_pointer)
    fn release_pointer(&self);
}

/// Source of window markup fetched on demand
#[allow(async_fn_in_trait)]
pub trait ContentProvider {
    /// Node type produced
    type Surface: WindowSurface;

    /// Fetch and parse the content of window `id`
    ///
    /// Returns the root node of the fragment. The manager validates it.
    async fn fetch_window(&self, id: &str) -> DesktopResult<Self::Surface>;
}
