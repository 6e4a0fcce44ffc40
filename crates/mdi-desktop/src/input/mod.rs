//! Pointer interaction sessions
//!
//! A session lives from the pointer-down that starts a drag or resize to the
//! matching pointer-up. Only one session exists at a time; the
//! [`WindowManager`](crate::WindowManager) holds it in a single slot.

mod bounds;
mod direction;
mod resize;
mod session;

pub use bounds::BoundsPolicy;
pub use direction::ResizeDirection;
pub use resize::calculate_resize;
pub use session::{DragSession, PointerSession, ResizeSession};
