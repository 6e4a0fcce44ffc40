//! Start menu and modals

use super::{ContentProvider, MenuSelection, Shell, WindowManager};
use crate::persistence::KeyValueStore;
use crate::types::WindowId;
use crate::DesktopError;
use tracing::{debug, warn};

impl<H: Shell, K: KeyValueStore> WindowManager<H, K> {
    /// Flip start menu visibility, returning the new state
    pub fn toggle_start_menu(&mut self) -> bool {
        self.start_menu_open = !self.start_menu_open;
        self.shell.set_start_menu_visible(self.start_menu_open);
        self.start_menu_open
    }

    /// Hide the start menu (clicks outside it land here)
    pub fn close_start_menu(&mut self) {
        self.start_menu_open = false;
        self.shell.set_start_menu_visible(false);
    }

    /// Whether the start menu is shown
    pub fn start_menu_open(&self) -> bool {
        self.start_menu_open
    }

    /// Handle a click on the start menu entry for window `id`
    ///
    /// Closes the menu. An open window is raised and activated; otherwise
    /// the caller is told to fetch it.
    pub fn select_start_menu_item(&mut self, id: &str) -> MenuSelection {
        self.close_start_menu();
        if self.windows.contains_key(id) {
            self.focus_window(id);
            MenuSelection::Raised
        } else {
            MenuSelection::NeedsFetch(id.to_string())
        }
    }

    /// Start menu entry clicked: raise the window, fetching it first if needed
    pub async fn open_from_start_menu<P>(&mut self, provider: &P, id: &str) -> Option<WindowId>
    where
        P: ContentProvider<Surface = H::Surface>,
    {
        match self.select_start_menu_item(id) {
            MenuSelection::Raised => Some(id.to_string()),
            MenuSelection::NeedsFetch(id) => {
                let opened = self.fetch_window(provider, &id).await?;
                self.focus_window(&opened);
                Some(opened)
            }
        }
    }

    /// Raise a window and make it the active one even when it already
    /// tops the stack
    pub fn focus_window(&mut self, id: &str) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        if !self.bring_to_front(id) && self.active.as_deref() != Some(id) {
            self.mark_active(id);
            self.update_taskbar();
        }
        true
    }

    /// Show modal `id` over a disabled desktop
    ///
    /// Only one modal is active: opening another hides the current one.
    /// Any drag or resize in progress is ended first.
    pub fn open_modal(&mut self, id: &str) -> bool {
        if !self.shell.has_modal(id) {
            warn!(error = %DesktopError::ModalNotFound(id.to_string()), "open_modal ignored");
            return false;
        }
        self.end_session();
        if let Some(previous) = self.active_modal.take() {
            if previous != id {
                self.shell.set_modal_visible(&previous, false);
            }
        }
        for window in self.windows.values() {
            window.set_disabled(true);
        }
        self.shell.set_overlay_active(true);
        self.shell.set_modal_visible(id, true);
        self.active_modal = Some(id.to_string());
        debug!(modal = %id, "modal opened");
        true
    }

    /// Hide modal `id`; re-enables the desktop if it was the active modal
    pub fn close_modal(&mut self, id: &str) -> bool {
        if !self.shell.has_modal(id) {
            warn!(error = %DesktopError::ModalNotFound(id.to_string()), "close_modal ignored");
            return false;
        }
        self.shell.set_modal_visible(id, false);
        if self.active_modal.as_deref() == Some(id) {
            self.active_modal = None;
            for window in self.windows.values() {
                window.set_disabled(false);
            }
            self.shell.set_overlay_active(false);
        }
        debug!(modal = %id, "modal closed");
        true
    }

    /// The modal currently shown, if any
    pub fn active_modal(&self) -> Option<&str> {
        self.active_modal.as_deref()
    }
}
