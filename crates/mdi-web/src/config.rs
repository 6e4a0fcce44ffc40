//! Page configuration
//!
//! Passed to [`boot`](crate::boot) as an optional JSON string. Every field
//! has a default matching the stock desktop markup.

use mdi_desktop::{DesktopConfig, DesktopError, DesktopResult};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Class names and selectors of the desktop markup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    /// Marker class of every window element
    pub window_class: String,
    /// Class that excludes a window-marked element (modals)
    pub modal_class: String,
    /// Class of the active window, active taskbar item and shown overlay
    pub active_class: String,
    /// Class put on windows while a modal is open
    pub disabled_class: String,
    /// Class of resize handles; the handle's `data-dir` names the edges
    pub resize_handle_class: String,
    /// Title bar (drag handle) selector
    pub drag_handle: String,
    pub close_button: String,
    pub maximize_button: String,
    /// Taskbar container
    pub taskbar: String,
    pub taskbar_item_class: String,
    pub start_button: String,
    pub start_menu: String,
    /// Start menu entries; `data-window` names the window to open
    pub start_menu_item: String,
    /// Element id of the shared modal overlay
    pub overlay_id: String,
    /// Elements that get pressed feedback
    pub button: String,
    pub pressed_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            window_class: "mdi-window".to_string(),
            modal_class: "modal".to_string(),
            active_class: "active".to_string(),
            disabled_class: "disabled".to_string(),
            resize_handle_class: "resize-handle".to_string(),
            drag_handle: "[data-drag-handle]".to_string(),
            close_button: ".window-btn.close".to_string(),
            maximize_button: ".window-btn.maximize".to_string(),
            taskbar: ".taskbar-items".to_string(),
            taskbar_item_class: "taskbar-item".to_string(),
            start_button: ".start-button".to_string(),
            start_menu: ".start-menu".to_string(),
            start_menu_item: ".start-menu-item".to_string(),
            overlay_id: "modal-overlay".to_string(),
            button: ".button".to_string(),
            pressed_class: "pressed".to_string(),
        }
    }
}

impl Selectors {
    /// Selector matching window elements, modals excluded
    pub fn windows(&self) -> String {
        format!(".{}:not(.{})", self.window_class, self.modal_class)
    }

    /// Selector matching resize handles
    pub fn resize_handle(&self) -> String {
        format!(".{}", self.resize_handle_class)
    }
}

/// Configuration of the browser desktop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebConfig {
    /// Window manager settings
    pub desktop: DesktopConfig,
    pub selectors: Selectors,
    /// Window content is fetched from `{content_url_prefix}{id}`
    pub content_url_prefix: String,
    /// Console filter: a level such as `"debug"`, or `EnvFilter` directives
    /// such as `"mdi_desktop=debug,info"`
    pub log_level: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            desktop: DesktopConfig::default(),
            selectors: Selectors::default(),
            content_url_prefix: "/windows/".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl WebConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> DesktopResult<Self> {
        serde_json::from_str(json).map_err(|e| DesktopError::Config(e.to_string()))
    }

    /// Console filter built from `log_level`, `info` if unrecognized
    pub fn filter(&self) -> EnvFilter {
        let directives = self.log_level.trim();
        if directives.is_empty() {
            return EnvFilter::new(LevelFilter::INFO.to_string());
        }
        if let Ok(level) = directives.parse::<LevelFilter>() {
            return EnvFilter::new(level.to_string());
        }
        if directives.contains('=') {
            if let Ok(filter) = EnvFilter::try_new(directives) {
                return filter;
            }
        }
        EnvFilter::new(LevelFilter::INFO.to_string())
    }
}
