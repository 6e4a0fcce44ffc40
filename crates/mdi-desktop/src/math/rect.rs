//! Axis-aligned rectangle type

use super::{Point, Size};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in desktop pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a viewport of the given size
    pub fn of_viewport(viewport: Size) -> Self {
        Self::new(0, 0, viewport.width, viewport.height)
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// X coordinate of the right edge, saturating at the `i32` range
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Y coordinate of the bottom edge, saturating at the `i32` range
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Same size, new origin
    pub fn moved_to(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }
}
