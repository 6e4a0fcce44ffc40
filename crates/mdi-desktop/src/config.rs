//! Window manager configuration
//!
//! Every field has a default matching the stock desktop markup, so an empty
//! JSON object (or no configuration at all) yields a working manager.

use crate::input::BoundsPolicy;
use crate::math::Size;
use crate::types::{DEFAULT_WINDOW_SIZE, MIN_WINDOW_SIZE, Z_INDEX_SEED};
use crate::{DesktopError, DesktopResult};
use serde::{Deserialize, Serialize};

/// Configuration for a [`WindowManager`](crate::WindowManager)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesktopConfig {
    /// Storage key of the per-window geometry map
    pub window_state_key: String,
    /// Storage key of the open-window id list
    pub open_windows_key: String,
    /// Initial value of the z-index counter
    pub z_index_seed: i32,
    /// Smallest size a resize may produce
    pub min_size: Size,
    /// Size used when the rendered style has no usable width/height
    pub default_size: Size,
    /// Viewport constraint applied while dragging and resizing
    pub bounds: BoundsPolicy,
    /// Prefix stripped from an id to derive a display name
    pub slug_prefix: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            window_state_key: "windowState".to_string(),
            open_windows_key: "openWindows".to_string(),
            z_index_seed: Z_INDEX_SEED,
            min_size: MIN_WINDOW_SIZE,
            default_size: DEFAULT_WINDOW_SIZE,
            bounds: BoundsPolicy::default(),
            slug_prefix: "window-".to_string(),
        }
    }
}

impl DesktopConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> DesktopResult<Self> {
        serde_json::from_str(json).map_err(|e| DesktopError::Config(e.to_string()))
    }
}
