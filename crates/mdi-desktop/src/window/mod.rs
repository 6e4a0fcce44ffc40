//! Window entity and its DOM seam
//!
//! A [`Window`] holds the live geometry of one desktop window and projects
//! it onto a [`WindowSurface`], the abstraction over the window's DOM node.

mod surface;
#[allow(clippy::module_inception)]
mod window;

pub use surface::{parse_css_px, RenderedStyle, SurfaceLayout, WindowSurface};
pub use window::Window;
