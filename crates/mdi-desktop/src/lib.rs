//! Window manager core for browser desktops
//!
//! This crate turns DOM elements into draggable, resizable, stackable
//! windows with a taskbar, a start menu and modals, and keeps their layout
//! across page reloads:
//! - Window lifecycle (register, close, fetch on demand, restore after reload)
//! - z-order and the active window
//! - Drag and resize sessions
//! - Maximize/restore
//! - Layout persistence in a string key-value store
//!
//! ## Architecture
//!
//! - [`math`]: Integer pixel geometry (`Point`, `Size`, `Rect`)
//! - [`window`]: The [`Window`] entity and the [`WindowSurface`] DOM seam
//! - [`manager`]: The [`WindowManager`] and the [`Shell`]/[`ContentProvider`] seams
//! - [`input`]: Pointer sessions, resize math and viewport bounds
//! - [`persistence`]: The [`GeometryStore`] over a [`KeyValueStore`]
//! - [`headless`]: In-memory seams for tests and tooling
//!
//! ## Example
//!
//! ```rust
//! use mdi_desktop::headless::{HeadlessShell, HeadlessSurface};
//! use mdi_desktop::{DesktopConfig, MemoryStore, Point, Size, WindowManager};
//!
//! let shell = HeadlessShell::new(Size::new(1280, 800));
//! shell.add_prerendered(HeadlessSurface::window("window-log"));
//!
//! let mut manager = WindowManager::new(DesktopConfig::default(), shell, MemoryStore::new());
//! manager.init();
//!
//! manager.start_drag("window-log", Point::new(500, 260));
//! manager.pointer_move(Point::new(520, 300));
//! manager.pointer_up();
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable without browser
//! 2. **Seams as traits**: The DOM, storage and network are reached only through traits
//! 3. **Fail soft**: Seam errors become log records; the desktop keeps its previous state

pub mod config;
pub mod headless;
pub mod input;
pub mod manager;
pub mod math;
pub mod persistence;
pub mod window;

mod error;
mod types;

pub use config::DesktopConfig;
pub use error::{DesktopError, DesktopResult};
pub use input::{BoundsPolicy, PointerSession, ResizeDirection};
pub use manager::{ContentProvider, MenuSelection, Shell, TaskbarItem, WindowManager};
pub use math::{Point, Rect, Size};
pub use persistence::{GeometryStore, KeyValueStore, MemoryStore, PersistedGeometry};
pub use types::{WindowId, DEFAULT_WINDOW_SIZE, MIN_WINDOW_SIZE, PIXEL_LIMIT, Z_INDEX_SEED};
pub use window::{RenderedStyle, SurfaceLayout, Window, WindowSurface};
