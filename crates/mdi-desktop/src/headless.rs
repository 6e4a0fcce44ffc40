//! In-memory implementations of the page seams
//!
//! [`HeadlessSurface`], [`HeadlessShell`] and [`StaticContentProvider`] let
//! the whole manager run without a browser: every call is recorded so tests
//! (and tools replaying a layout) can inspect what the DOM would show.
//!
//! All three are cheap handles over shared state. A clone observes the same
//! node, which is how tests keep hold of a surface after moving it into the
//! manager.

use crate::manager::{ContentProvider, Shell, TaskbarItem};
use crate::math::{Rect, Size};
use crate::types::WindowId;
use crate::window::{RenderedStyle, SurfaceLayout, WindowSurface};
use crate::{DesktopError, DesktopResult};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
struct SurfaceState {
    id: Option<String>,
    title: Option<String>,
    window_marker: bool,
    maximized_flag: bool,
    style: RenderedStyle,
    layout: Option<SurfaceLayout>,
    restore_geometry: Option<Rect>,
    active: bool,
    disabled: bool,
    subscriptions: usize,
    detached: bool,
}

/// A window node held in memory
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    /// A node carrying the window marker and the given id
    pub fn window(id: &str) -> Self {
        Self::from_state(SurfaceState {
            id: Some(id.to_string()),
            window_marker: true,
            ..SurfaceState::default()
        })
    }

    /// A node carrying the window marker but no id
    pub fn anonymous_window() -> Self {
        Self::from_state(SurfaceState {
            window_marker: true,
            ..SurfaceState::default()
        })
    }

    /// A node that is not a window (an error page, a bare fragment)
    pub fn fragment() -> Self {
        Self::default()
    }

    fn from_state(state: SurfaceState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Set the title data attribute
    pub fn with_title(self, title: &str) -> Self {
        self.state.borrow_mut().title = Some(title.to_string());
        self
    }

    /// Set the computed style the node reports
    pub fn with_style(self, style: RenderedStyle) -> Self {
        self.state.borrow_mut().style = style;
        self
    }

    /// Set the server-rendered maximized flag
    pub fn with_maximized_flag(self, maximized: bool) -> Self {
        self.state.borrow_mut().maximized_flag = maximized;
        self
    }

    /// Give the node `count` live update channels
    pub fn with_subscriptions(self, count: usize) -> Self {
        self.state.borrow_mut().subscriptions = count;
        self
    }

    /// An independent copy of this node, as a fresh parse of the same markup
    pub fn deep_clone(&self) -> Self {
        Self::from_state(self.state.borrow().clone())
    }

    /// Last layout applied, `None` if never projected
    pub fn layout(&self) -> Option<SurfaceLayout> {
        self.state.borrow().layout
    }

    /// Captured pre-maximize geometry
    pub fn restore_geometry(&self) -> Option<Rect> {
        self.state.borrow().restore_geometry
    }

    /// Whether the disabled marker is set
    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    /// Whether the node was removed from the document
    pub fn is_detached(&self) -> bool {
        self.state.borrow().detached
    }

    /// Update channels not yet cancelled
    pub fn live_subscriptions(&self) -> usize {
        self.state.borrow().subscriptions
    }
}

impl WindowSurface for HeadlessSurface {
    fn element_id(&self) -> Option<String> {
        self.state.borrow().id.clone()
    }

    fn title(&self) -> Option<String> {
        self.state.borrow().title.clone()
    }

    fn maximized_flag(&self) -> bool {
        self.state.borrow().maximized_flag
    }

    fn rendered_style(&self) -> RenderedStyle {
        self.state.borrow().style
    }

    fn has_window_marker(&self) -> bool {
        self.state.borrow().window_marker
    }

    fn apply_layout(&self, layout: &SurfaceLayout) {
        let mut state = self.state.borrow_mut();
        state.style.z_index = Some(layout.z_index());
        if let SurfaceLayout::Windowed { rect, .. } = *layout {
            state.style.left = Some(rect.x);
            state.style.top = Some(rect.y);
            state.style.width = Some(rect.width);
            state.style.height = Some(rect.height);
        }
        state.maximized_flag = layout.is_maximized();
        state.layout = Some(*layout);
    }

    fn capture_restore_geometry(&self, rect: Rect) {
        self.state.borrow_mut().restore_geometry = Some(rect);
    }

    fn set_active(&self, active: bool) {
        self.state.borrow_mut().active = active;
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn set_disabled(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    fn cancel_subscriptions(&self) -> usize {
        std::mem::take(&mut self.state.borrow_mut().subscriptions)
    }

    fn detach(&self) {
        self.state.borrow_mut().detached = true;
    }
}

#[derive(Debug, Default)]
struct ShellState {
    viewport: Size,
    prerendered: Vec<HeadlessSurface>,
    attached: Vec<HeadlessSurface>,
    taskbar: Vec<TaskbarItem>,
    taskbar_renders: usize,
    start_menu_visible: bool,
    overlay_active: bool,
    /// Modal id -> visible
    modals: BTreeMap<String, bool>,
    capture_depth: usize,
}

/// Desktop chrome held in memory
#[derive(Clone, Debug, Default)]
pub struct HeadlessShell {
    state: Rc<RefCell<ShellState>>,
}

impl HeadlessShell {
    /// An empty desktop of the given size
    pub fn new(viewport: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(ShellState {
                viewport,
                ..ShellState::default()
            })),
        }
    }

    /// Add a node present at page load
    pub fn add_prerendered(&self, surface: HeadlessSurface) {
        self.state.borrow_mut().prerendered.push(surface);
    }

    /// Add a (hidden) modal element
    pub fn add_modal(&self, id: &str) {
        self.state.borrow_mut().modals.insert(id.to_string(), false);
    }

    /// Resize the desktop
    pub fn set_viewport(&self, viewport: Size) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Nodes inserted through [`Shell::attach_window`]
    pub fn attached(&self) -> Vec<HeadlessSurface> {
        self.state.borrow().attached.clone()
    }

    /// Current taskbar contents
    pub fn taskbar(&self) -> Vec<TaskbarItem> {
        self.state.borrow().taskbar.clone()
    }

    /// How many times the taskbar was rendered
    pub fn taskbar_renders(&self) -> usize {
        self.state.borrow().taskbar_renders
    }

    pub fn start_menu_visible(&self) -> bool {
        self.state.borrow().start_menu_visible
    }

    pub fn overlay_active(&self) -> bool {
        self.state.borrow().overlay_active
    }

    pub fn modal_visible(&self, id: &str) -> bool {
        self.state.borrow().modals.get(id).copied().unwrap_or(false)
    }

    /// Whether document-level pointer routing is on
    pub fn pointer_captured(&self) -> bool {
        self.capture_depth() > 0
    }

    /// Captures not yet released; never above 1 when sessions nest correctly
    pub fn capture_depth(&self) -> usize {
        self.state.borrow().capture_depth
    }
}

impl Shell for HeadlessShell {
    type Surface = HeadlessSurface;

    fn viewport(&self) -> Size {
        self.state.borrow().viewport
    }

    fn discover_windows(&self) -> Vec<HeadlessSurface> {
        self.state
            .borrow()
            .prerendered
            .iter()
            .filter(|surface| surface.has_window_marker() && !surface.is_detached())
            .cloned()
            .collect()
    }

    fn attach_window(&self, surface: &HeadlessSurface) {
        self.state.borrow_mut().attached.push(surface.clone());
    }

    fn render_taskbar(&self, items: &[TaskbarItem]) {
        let mut state = self.state.borrow_mut();
        state.taskbar = items.to_vec();
        state.taskbar_renders += 1;
    }

    fn set_start_menu_visible(&self, visible: bool) {
        self.state.borrow_mut().start_menu_visible = visible;
    }

    fn has_modal(&self, id: &str) -> bool {
        self.state.borrow().modals.contains_key(id)
    }

    fn set_modal_visible(&self, id: &str, visible: bool) {
        if let Some(shown) = self.state.borrow_mut().modals.get_mut(id) {
            *shown = visible;
        }
    }

    fn set_overlay_active(&self, active: bool) {
        self.state.borrow_mut().overlay_active = active;
    }

    fn capture_pointer(&self) {
        self.state.borrow_mut().capture_depth += 1;
    }

    fn release_pointer(&self) {
        let mut state = self.state.borrow_mut();
        state.capture_depth = state.capture_depth.saturating_sub(1);
    }
}

/// Serves window content from templates registered up front
///
/// Every fetch returns a fresh copy of the template, like a new response
/// body. Ids without a template fail the way a server 404 would.
#[derive(Debug, Default)]
pub struct StaticContentProvider {
    templates: HashMap<WindowId, HeadlessSurface>,
    failures: HashMap<WindowId, String>,
    requests: RefCell<Vec<WindowId>>,
}

impl StaticContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `template` for requests of `id`
    pub fn with_window(mut self, id: &str, template: HeadlessSurface) -> Self {
        self.templates.insert(id.to_string(), template);
        self
    }

    /// Fail requests of `id` with `reason`
    pub fn with_failure(mut self, id: &str, reason: &str) -> Self {
        self.failures.insert(id.to_string(), reason.to_string());
        self
    }

    /// Every id requested so far, in order
    pub fn requests(&self) -> Vec<WindowId> {
        self.requests.borrow().clone()
    }
}

impl ContentProvider for StaticContentProvider {
    type Surface = HeadlessSurface;

    async fn fetch_window(&self, id: &str) -> DesktopResult<HeadlessSurface> {
        self.requests.borrow_mut().push(id.to_string());
        if let Some(reason) = self.failures.get(id) {
            return Err(DesktopError::FetchFailed {
                id: id.to_string(),
                reason: reason.clone(),
            });
        }
        self.templates
            .get(id)
            .map(HeadlessSurface::deep_clone)
            .ok_or_else(|| DesktopError::FetchFailed {
                id: id.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_clones_share_state() {
        let surface = HeadlessSurface::window("window-a");
        let handle = surface.clone();

        surface.set_active(true);
        surface.detach();

        assert!(handle.is_active());
        assert!(handle.is_detached());
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let template = HeadlessSurface::window("window-a").with_subscriptions(1);
        let copy = template.deep_clone();

        assert_eq!(copy.cancel_subscriptions(), 1);
        assert_eq!(template.live_subscriptions(), 1);
        assert_eq!(copy.element_id().as_deref(), Some("window-a"));
    }

    #[test]
    fn test_apply_layout_updates_rendered_style() {
        let surface = HeadlessSurface::window("window-a");
        surface.apply_layout(&SurfaceLayout::Windowed {
            rect: Rect::new(5, 6, 300, 200),
            z_index: 1002,
        });

        let style = surface.rendered_style();
        assert_eq!((style.left, style.top, style.width, style.height), (Some(5), Some(6), Some(300), Some(200)));
        assert_eq!(style.z_index, Some(1002));

        surface.apply_layout(&SurfaceLayout::Maximized { z_index: 1003 });
        assert!(surface.maximized_flag());
        assert_eq!(surface.rendered_style().left, Some(5));
    }

    #[test]
    fn test_discover_skips_non_windows() {
        let shell = HeadlessShell::new(Size::new(800, 600));
        shell.add_prerendered(HeadlessSurface::window("window-a"));
        shell.add_prerendered(HeadlessSurface::fragment());

        let found = shell.discover_windows();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].element_id().as_deref(), Some("window-a"));
    }

    #[test]
    fn test_release_never_underflows() {
        let shell = HeadlessShell::new(Size::new(800, 600));
        shell.release_pointer();
        shell.capture_pointer();
        assert_eq!(shell.capture_depth(), 1);
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticContentProvider::new()
            .with_window("window-a", HeadlessSurface::window("window-a"))
            .with_failure("window-b", "HTTP 500");

        let a = pollster::block_on(provider.fetch_window("window-a")).unwrap();
        assert_eq!(a.element_id().as_deref(), Some("window-a"));

        let err = pollster::block_on(provider.fetch_window("window-b")).unwrap_err();
        assert_eq!(err.to_string(), "failed to load window window-b: HTTP 500");

        let err = pollster::block_on(provider.fetch_window("window-c")).unwrap_err();
        assert_eq!(err.to_string(), "failed to load window window-c: HTTP 404");

        assert_eq!(provider.requests(), ["window-a", "window-b", "window-c"]);
    }
}
