//! DOM node abstraction for one window

use crate::math::Rect;
use crate::types::PIXEL_LIMIT;

/// Position, size and stacking read from a node's computed style
///
/// A field is `None` when the style value does not parse as a number
/// (`auto`, empty, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderedStyle {
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub z_index: Option<i32>,
}

impl RenderedStyle {
    /// Parse raw CSS values (`"120px"`, `"auto"`, `"1003"`)
    pub fn from_css(left: &str, top: &str, width: &str, height: &str, z_index: &str) -> Self {
        Self {
            left: parse_css_px(left),
            top: parse_css_px(top),
            width: parse_css_px(width),
            height: parse_css_px(height),
            z_index: parse_css_px(z_index),
        }
    }
}

/// Parse the leading integer of a CSS value, `parseInt` style
///
/// Leading whitespace and an optional sign are accepted; everything after
/// the first non-digit is ignored (`"120.7px"` is 120). Values beyond
/// [`PIXEL_LIMIT`] count as unparseable.
pub fn parse_css_px(value: &str) -> Option<i32> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    if magnitude > i64::from(PIXEL_LIMIT) {
        return None;
    }
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// What a window node should display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceLayout {
    /// Positioned at `rect`; maximized marker off
    Windowed { rect: Rect, z_index: i32 },
    /// Filling the viewport (`0, 0, 100vw, 100vh`); maximized marker on
    Maximized { z_index: i32 },
}

impl SurfaceLayout {
    /// Stacking order of the layout
    pub fn z_index(&self) -> i32 {
        match *self {
            SurfaceLayout::Windowed { z_index, .. } | SurfaceLayout::Maximized { z_index } => {
                z_index
            }
        }
    }

    /// Whether the maximized marker is on
    pub fn is_maximized(&self) -> bool {
        matches!(self, SurfaceLayout::Maximized { .. })
    }
}

/// A window's DOM node
///
/// Methods take `&self`: DOM handles are shared references to host-owned
/// nodes, and all calls happen on the single event-loop thread.
pub trait WindowSurface {
    /// The node's `id` attribute
    fn element_id(&self) -> Option<String>;

    /// The node's title/name data attribute
    fn title(&self) -> Option<String>;

    /// The maximized data attribute as rendered by the server
    fn maximized_flag(&self) -> bool;

    /// Current computed left/top/width/height/z-index
    fn rendered_style(&self) -> RenderedStyle;

    /// Whether the node carries the window marker class
    fn has_window_marker(&self) -> bool;

    /// Write position, size, z-index and the maximized marker
    fn apply_layout(&self, layout: &SurfaceLayout);

    /// Record the pre-maximize geometry as data attributes
    fn capture_restore_geometry(&self, rect: Rect);

    /// Toggle the active marker
    fn set_active(&self, active: bool);

    /// Whether the active marker is set
    fn is_active(&self) -> bool;

    /// Toggle the disabled marker (pointer interaction off while a modal is up)
    fn set_disabled(&self, disabled: bool);

    /// Cancel every live update channel under this node, best-effort
    ///
    /// Returns how many channels were signalled.
    fn cancel_subscriptions(&self) -> usize;

    /// Remove the node from the document
    fn detach(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_px() {
        assert_eq!(parse_css_px("120px"), Some(120));
        assert_eq!(parse_css_px("120.7px"), Some(120));
        assert_eq!(parse_css_px("  -15px"), Some(-15));
        assert_eq!(parse_css_px("+8"), Some(8));
        assert_eq!(parse_css_px("0px"), Some(0));
        assert_eq!(parse_css_px("1003"), Some(1003));
        assert_eq!(parse_css_px("auto"), None);
        assert_eq!(parse_css_px(""), None);
        assert_eq!(parse_css_px("-"), None);
        assert_eq!(parse_css_px("99999999999px"), None);
        assert_eq!(parse_css_px("2147483647"), None);
        assert_eq!(parse_css_px("-1000000000px"), Some(-1_000_000_000));
    }

    #[test]
    fn test_rendered_style_from_css() {
        let style = RenderedStyle::from_css("10px", "auto", "400px", "300.5px", "auto");
        assert_eq!(
            style,
            RenderedStyle {
                left: Some(10),
                top: None,
                width: Some(400),
                height: Some(300),
                z_index: None,
            }
        );
    }

    #[test]
    fn test_layout_accessors() {
        let windowed = SurfaceLayout::Windowed {
            rect: Rect::new(0, 0, 400, 300),
            z_index: 1001,
        };
        assert_eq!(windowed.z_index(), 1001);
        assert!(!windowed.is_maximized());
        assert!(SurfaceLayout::Maximized { z_index: 5 }.is_maximized());
    }
}
