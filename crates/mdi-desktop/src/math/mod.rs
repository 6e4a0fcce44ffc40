//! Integer pixel geometry for the desktop surface
//!
//! Coordinates are CSS pixels relative to the desktop's top-left corner.

mod point;
mod rect;
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;
