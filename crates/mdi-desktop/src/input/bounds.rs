//! Viewport constraint applied to moved and resized windows

use crate::math::{Rect, Size};
use serde::{Deserialize, Serialize};

/// How far a window may leave the viewport while dragged or resized
///
/// Policies only translate the window; they never change its size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum BoundsPolicy {
    /// No constraint: windows may end up partially or fully off-screen
    #[default]
    Unbounded,
    /// Keep at least `margin` pixels of the window inside the viewport
    /// horizontally, and the top edge between 0 and `height - margin`
    KeepVisible { margin: i32 },
    /// Keep the whole window inside the viewport where it fits, pinning it
    /// to the top-left otherwise
    Contain,
}

impl BoundsPolicy {
    /// Constrain `rect` to a viewport of the given size
    pub fn constrain(&self, rect: Rect, viewport: Size) -> Rect {
        match *self {
            BoundsPolicy::Unbounded => rect,
            BoundsPolicy::KeepVisible { margin } => {
                let margin_x = margin.clamp(0, rect.width.max(0));
                let margin_y = margin.clamp(0, rect.height.max(0));
                let x = rect
                    .x
                    .max(margin_x - rect.width)
                    .min(viewport.width - margin_x);
                let y = rect.y.min(viewport.height - margin_y).max(0);
                Rect::new(x, y, rect.width, rect.height)
            }
            BoundsPolicy::Contain => {
                let x = rect.x.min(viewport.width - rect.width).max(0);
                let y = rect.y.min(viewport.height - rect.height).max(0);
                Rect::new(x, y, rect.width, rect.height)
            }
        }
    }
}
