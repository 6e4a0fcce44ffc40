//! Drag and resize session state

use crate::input::{calculate_resize, ResizeDirection};
use crate::math::{Point, Rect, Size};
use crate::types::WindowId;

/// An in-progress title-bar drag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    /// Window being moved
    pub window_id: WindowId,
    /// Pointer position relative to the window's rendered top-left corner
    pub offset: Point,
}

impl DragSession {
    /// Window origin for the current pointer position
    pub fn origin_for(&self, pointer: Point) -> Point {
        pointer - self.offset
    }
}

/// An in-progress edge or corner resize
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeSession {
    /// Window being resized
    pub window_id: WindowId,
    /// Edges being dragged
    pub direction: ResizeDirection,
    /// Pointer position at pointer-down
    pub start_pointer: Point,
    /// Rendered rect at pointer-down
    pub start_rect: Rect,
}

impl ResizeSession {
    /// Window rect for the current pointer position
    pub fn rect_for(&self, pointer: Point, min: Size) -> Rect {
        calculate_resize(
            self.start_rect,
            self.direction,
            pointer - self.start_pointer,
            min,
        )
    }
}

/// The single live pointer session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerSession {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl PointerSession {
    /// Window targeted by the session
    pub fn window_id(&self) -> &str {
        match self {
            PointerSession::Drag(drag) => &drag.window_id,
            PointerSession::Resize(resize) => &resize.window_id,
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PointerSession::Drag(_) => "drag",
            PointerSession::Resize(_) => "resize",
        }
    }
}
