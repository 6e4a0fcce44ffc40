//! Resize geometry

use crate::input::ResizeDirection;
use crate::math::{Point, Rect, Size};

/// Calculate the rect produced by dragging `direction`'s edges by `delta`
///
/// South/east edges change only the size. North/west edges move the origin
/// as well. Width and height are clamped to `min`; when a north/west edge
/// hits the minimum, the opposite edge stays pinned at its starting
/// position (`start.right()` / `start.bottom()`).
pub fn calculate_resize(start: Rect, direction: ResizeDirection, delta: Point, min: Size) -> Rect {
    let mut width = start.width;
    let mut height = start.height;

    if direction.east {
        width = start.width.saturating_add(delta.x);
    }
    if direction.south {
        height = start.height.saturating_add(delta.y);
    }
    if direction.west {
        width = start.width.saturating_sub(delta.x);
    }
    if direction.north {
        height = start.height.saturating_sub(delta.y);
    }

    let width = width.max(min.width);
    let height = height.max(min.height);

    let x = if direction.west {
        start.right().saturating_sub(width)
    } else {
        start.x
    };
    let y = if direction.north {
        start.bottom().saturating_sub(height)
    } else {
        start.y
    };

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) const MIN: Size = Size::new(200, 150);

    #[test]
    fn test_resize_se_grows_without_moving() {
        let start = Rect::new(100, 100, 400, 300);
        let rect = calculate_resize(start, ResizeDirection::SE, Point::new(50, 30), MIN);
        assert_eq!(rect, Rect::new(100, 100, 450, 330));
    }

    #[test]
    fn test_resize_nw_moves_origin() {
        let start = Rect::new(100, 100, 400, 300);
        let rect = calculate_resize(start, ResizeDirection::NW, Point::new(-20, 10), MIN);
        assert_eq!(rect, Rect::new(80, 110, 420, 290));
    }

    #[test]
    fn test_resize_nw_clamp_pins_opposite_edges() {
        let start = Rect::new(100, 100, 400, 300);
        let rect = calculate_resize(start, ResizeDirection::NW, Point::new(250, 200), MIN);

        assert_eq!(rect.width, 200);
        assert_eq!(rect.height, 150);
        assert_eq!(rect.right(), 500);
        assert_eq!(rect.bottom(), 400);
        assert_eq!(rect.origin(), Point::new(300, 250));
    }

    #[test]
    fn test_resize_se_clamp_keeps_origin() {
        let start = Rect::new(100, 100, 400, 300);
        let rect = calculate_resize(start, ResizeDirection::SE, Point::new(-1000, -1000), MIN);
        assert_eq!(rect, Rect::new(100, 100, 200, 150));
    }

    #[test]
    fn test_resize_single_edge_ignores_other_axis() {
        let start = Rect::new(0, 0, 400, 300);
        let rect = calculate_resize(start, ResizeDirection::E, Point::new(25, 999), MIN);
        assert_eq!(rect, Rect::new(0, 0, 425, 300));

        let rect = calculate_resize(start, ResizeDirection::N, Point::new(999, -40), MIN);
        assert_eq!(rect, Rect::new(0, -40, 400, 340));
    }

    #[test]
    fn test_resize_extreme_rect_saturates() {
        let start = Rect::new(2_000_000_000, 0, 2_000_000_000, 300);
        let rect = calculate_resize(start, ResizeDirection::W, Point::new(-50, 0), MIN);
        assert_eq!(rect.width, 2_000_000_050);
        assert_eq!(rect.right(), i32::MAX);

        let rect = calculate_resize(start, ResizeDirection::E, Point::new(i32::MAX, 0), MIN);
        assert_eq!(rect.width, i32::MAX);
    }
}
