//! 2D size type

use serde::{Deserialize, Serialize};

/// Width and height in desktop pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
