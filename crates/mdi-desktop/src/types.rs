//! Core type definitions for the window manager
//!
//! This module centralizes type aliases and constants used throughout the
//! crate for consistency and discoverability.

use crate::math::Size;

/// Unique window identifier
///
/// Windows are identified by the `id` attribute of their DOM node. The same
/// identifier keys persisted geometry, so it must be stable across reloads.
pub type WindowId = String;

/// Smallest size a resize may produce
pub const MIN_WINDOW_SIZE: Size = Size::new(200, 150);

/// Size used when the rendered style carries no usable width/height
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(400, 300);

/// First value of the z-index counter, and the fallback z-index of a window
pub const Z_INDEX_SEED: i32 = 1000;

/// Largest magnitude accepted for a stored or rendered coordinate, size or
/// z-index
///
/// Twice the limit still fits in an `i32`, so an edge (`x + width`) of an
/// accepted rect cannot overflow.
pub const PIXEL_LIMIT: i32 = 1_000_000_000;
