//! Pointer routing: raise on press, drag and resize sessions

use super::{Shell, WindowManager};
use crate::input::{DragSession, PointerSession, ResizeDirection, ResizeSession};
use crate::math::Point;
use crate::persistence::KeyValueStore;
use crate::DesktopError;
use tracing::{debug, warn};

impl<H: Shell, K: KeyValueStore> WindowManager<H, K> {
    /// Pointer pressed anywhere on a window
    ///
    /// Raises the window unless the press landed on a resize handle (the
    /// resize session raises it itself).
    pub fn window_pointer_down(&mut self, id: &str, on_resize_handle: bool) -> bool {
        if on_resize_handle {
            return false;
        }
        self.bring_to_front(id)
    }

    /// The live pointer session, if any
    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    /// Start dragging a window by its title bar
    ///
    /// Any live session is ended first. `pointer` is in desktop pixels.
    pub fn start_drag(&mut self, id: &str, pointer: Point) -> bool {
        if !self.windows.contains_key(id) {
            warn!(error = %DesktopError::WindowNotFound(id.to_string()), "start_drag ignored");
            return false;
        }
        self.end_session();
        self.bring_to_front(id);

        let viewport = self.shell.viewport();
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let offset = pointer - window.rendered_rect(viewport).origin();
        self.session = Some(PointerSession::Drag(DragSession {
            window_id: id.to_string(),
            offset,
        }));
        self.shell.capture_pointer();
        debug!(window = %id, offset_x = offset.x, offset_y = offset.y, "drag started");
        true
    }

    /// Start resizing a window from the edges named by `direction`
    ///
    /// Any live session is ended first. Unparseable directions are ignored.
    pub fn start_resize(&mut self, id: &str, direction: &str, pointer: Point) -> bool {
        let direction = match ResizeDirection::parse(direction) {
            Ok(direction) => direction,
            Err(e) => {
                warn!(window = %id, error = %e, "start_resize ignored");
                return false;
            }
        };
        if !self.windows.contains_key(id) {
            warn!(error = %DesktopError::WindowNotFound(id.to_string()), "start_resize ignored");
            return false;
        }
        self.end_session();
        self.bring_to_front(id);

        let viewport = self.shell.viewport();
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let start_rect = window.rendered_rect(viewport);
        self.session = Some(PointerSession::Resize(ResizeSession {
            window_id: id.to_string(),
            direction,
            start_pointer: pointer,
            start_rect,
        }));
        self.shell.capture_pointer();
        debug!(window = %id, %direction, "resize started");
        true
    }

    /// Pointer moved while captured
    ///
    /// Applies the session's geometry to the window and its node. Returns
    /// `false` when no session is live.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let rect = match session {
            PointerSession::Drag(drag) => match self.windows.get(&drag.window_id) {
                Some(window) => window.rect.moved_to(drag.origin_for(pointer)),
                None => return false,
            },
            PointerSession::Resize(resize) => resize.rect_for(pointer, self.config.min_size),
        };
        let rect = self.config.bounds.constrain(rect, self.shell.viewport());

        let id = session.window_id().to_string();
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        window.rect = rect;
        window.update_dom();
        true
    }

    /// Pointer released: commit the session's geometry and end it
    pub fn pointer_up(&mut self) -> bool {
        self.end_session()
    }

    /// End the live session, persisting the window's final geometry
    pub(super) fn end_session(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.shell.release_pointer();
        self.persist(session.window_id());
        debug!(window = %session.window_id(), kind = session.kind(), "session ended");
        true
    }

    /// End the live session without persisting (its window is going away)
    pub(super) fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.shell.release_pointer();
            debug!(window = %session.window_id(), kind = session.kind(), "session abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DesktopConfig;
    use crate::headless::{HeadlessShell, HeadlessSurface};
    use crate::input::{BoundsPolicy, PointerSession};
    use crate::math::{Point, Rect, Size};
    use crate::persistence::MemoryStore;
    use crate::window::RenderedStyle;
    use crate::WindowManager;

    fn at(id: &str, x: i32, y: i32, z: i32) -> HeadlessSurface {
        HeadlessSurface::window(id).with_style(RenderedStyle {
            left: Some(x),
            top: Some(y),
            width: Some(400),
            height: Some(300),
            z_index: Some(z),
        })
    }

    fn manager(
        config: DesktopConfig,
        surfaces: &[HeadlessSurface],
    ) -> (WindowManager<HeadlessShell, MemoryStore>, HeadlessShell) {
        let shell = HeadlessShell::new(Size::new(1280, 800));
        for surface in surfaces {
            shell.add_prerendered(surface.clone());
        }
        let mut manager = WindowManager::new(config, shell.clone(), MemoryStore::new());
        manager.init();
        (manager, shell)
    }

    #[test]
    fn test_pointer_down_raises_unless_resize_handle() {
        let (mut manager, _) = manager(
            DesktopConfig::default(),
            &[at("window-a", 0, 0, 1000), at("window-b", 0, 0, 1000)],
        );

        assert!(!manager.window_pointer_down("window-a", true));
        assert_eq!(manager.window("window-a").unwrap().z_index, 1000);

        assert!(manager.window_pointer_down("window-a", false));
        assert_eq!(manager.window("window-a").unwrap().z_index, 1001);
    }

    #[test]
    fn test_drag_moves_and_persists_on_release() {
        let a = at("window-a", 100, 100, 1000);
        let (mut manager, shell) = manager(DesktopConfig::default(), &[a.clone()]);

        assert!(manager.start_drag("window-a", Point::new(130, 110)));
        assert!(shell.pointer_captured());

        assert!(manager.pointer_move(Point::new(20, 40)));
        assert_eq!(manager.window("window-a").unwrap().rect, Rect::new(-10, 30, 400, 300));
        assert_eq!(a.layout().map(|l| l.z_index()), Some(1000));
        assert_eq!(manager.store().load_geometry("window-a").unwrap(), None);

        assert!(manager.pointer_up());
        assert!(!shell.pointer_captured());
        assert!(manager.session().is_none());
        assert_eq!(
            manager.store().load_geometry("window-a").unwrap().map(|g| g.rect()),
            Some(Rect::new(-10, 30, 400, 300))
        );

        assert!(!manager.pointer_move(Point::new(500, 500)));
        assert!(!manager.pointer_up());
    }

    #[test]
    fn test_drag_raises_window() {
        let (mut manager, _) = manager(
            DesktopConfig::default(),
            &[at("window-a", 0, 0, 1000), at("window-b", 0, 0, 1002)],
        );

        manager.start_drag("window-a", Point::new(5, 5));

        assert_eq!(manager.window("window-a").unwrap().z_index, 1003);
    }

    #[test]
    fn test_resize_se_and_nw() {
        let (mut manager, _) = manager(DesktopConfig::default(), &[at("window-a", 100, 100, 1000)]);

        assert!(manager.start_resize("window-a", "se", Point::new(500, 400)));
        manager.pointer_move(Point::new(550, 430));
        manager.pointer_up();
        assert_eq!(manager.window("window-a").unwrap().rect, Rect::new(100, 100, 450, 330));

        assert!(manager.start_resize("window-a", "nw", Point::new(100, 100)));
        manager.pointer_move(Point::new(400, 400));
        manager.pointer_up();
        let rect = manager.window("window-a").unwrap().rect;
        assert_eq!(rect, Rect::new(350, 280, 200, 150));
        assert_eq!((rect.right(), rect.bottom()), (550, 430));
    }

    #[test]
    fn test_invalid_direction_is_ignored() {
        let (mut manager, shell) = manager(DesktopConfig::default(), &[at("window-a", 0, 0, 1000)]);

        assert!(!manager.start_resize("window-a", "up", Point::new(0, 0)));
        assert!(!manager.start_resize("window-x", "se", Point::new(0, 0)));
        assert!(manager.session().is_none());
        assert!(!shell.pointer_captured());
    }

    #[test]
    fn test_new_session_ends_previous() {
        let (mut manager, shell) = manager(
            DesktopConfig::default(),
            &[at("window-a", 0, 0, 1000), at("window-b", 500, 0, 1000)],
        );

        manager.start_drag("window-a", Point::new(10, 10));
        manager.pointer_move(Point::new(60, 10));
        manager.start_resize("window-b", "e", Point::new(900, 100));

        assert_eq!(shell.capture_depth(), 1);
        assert!(matches!(manager.session(), Some(PointerSession::Resize(_))));
        assert_eq!(
            manager.store().load_geometry("window-a").unwrap().map(|g| g.rect()),
            Some(Rect::new(50, 0, 400, 300))
        );
    }

    #[test]
    fn test_closing_dragged_window_ends_session() {
        let (mut manager, shell) = manager(DesktopConfig::default(), &[at("window-a", 0, 0, 1000)]);

        manager.start_drag("window-a", Point::new(10, 10));
        manager.close_window("window-a");

        assert!(manager.session().is_none());
        assert!(!shell.pointer_captured());
        assert_eq!(manager.store().load_geometry("window-a").unwrap(), None);
    }

    #[test]
    fn test_drag_of_maximized_window_moves_restore_rect() {
        let (mut manager, _) = manager(DesktopConfig::default(), &[at("window-a", 300, 200, 1000)]);
        manager.maximize_window("window-a");

        manager.start_drag("window-a", Point::new(50, 8));
        manager.pointer_move(Point::new(60, 18));

        let window = manager.window("window-a").unwrap();
        assert!(window.maximized);
        assert_eq!(window.rect.origin(), Point::new(10, 10));
    }

    #[test]
    fn test_resize_of_extreme_rect_does_not_overflow() {
        let huge = HeadlessSurface::window("window-a").with_style(RenderedStyle {
            left: Some(2_000_000_000),
            top: Some(0),
            width: Some(2_000_000_000),
            height: Some(300),
            z_index: Some(1000),
        });
        let (mut manager, _) = manager(DesktopConfig::default(), &[huge]);

        assert!(manager.start_resize("window-a", "w", Point::new(100, 100)));
        assert!(manager.pointer_move(Point::new(50, 100)));
        manager.pointer_up();

        let rect = manager.window("window-a").unwrap().rect;
        assert_eq!(rect.width, 2_000_000_050);
        assert_eq!(rect.right(), i32::MAX);
    }

    #[test]
    fn test_bounds_policy_applies_to_drag() {
        let config = DesktopConfig {
            bounds: BoundsPolicy::Contain,
            ..DesktopConfig::default()
        };
        let (mut manager, _) = manager(config, &[at("window-a", 0, 0, 1000)]);

        manager.start_drag("window-a", Point::new(10, 10));
        manager.pointer_move(Point::new(5000, -400));
        manager.pointer_up();

        assert_eq!(manager.window("window-a").unwrap().rect, Rect::new(880, 0, 400, 300));
    }

    #[test]
    fn test_bounds_follow_viewport_changes() {
        let config = DesktopConfig {
            bounds: BoundsPolicy::Contain,
            ..DesktopConfig::default()
        };
        let (mut manager, shell) = manager(config, &[at("window-a", 0, 0, 1000)]);
        shell.set_viewport(Size::new(800, 600));

        manager.start_drag("window-a", Point::new(10, 10));
        manager.pointer_move(Point::new(5000, 5000));
        manager.pointer_up();

        assert_eq!(manager.window("window-a").unwrap().rect, Rect::new(400, 300, 400, 300));
    }
}
