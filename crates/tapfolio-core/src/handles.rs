//! Selection handles and handle-specific resize math.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Hit tolerance around a handle, in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 10.0;

/// Distance from the top edge to the rotation handle, in canvas units.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// One of the 8 compass resize grips, or the rotation grip above the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    Rotate,
}

impl HandleKind {
    /// True for the grips that move the left edge.
    fn moves_west_edge(self) -> bool {
        matches!(self, HandleKind::W | HandleKind::Nw | HandleKind::Sw)
    }

    /// True for the grips that move the top edge.
    fn moves_north_edge(self) -> bool {
        matches!(self, HandleKind::N | HandleKind::Ne | HandleKind::Nw)
    }

    fn moves_east_edge(self) -> bool {
        matches!(self, HandleKind::E | HandleKind::Ne | HandleKind::Se)
    }

    fn moves_south_edge(self) -> bool {
        matches!(self, HandleKind::S | HandleKind::Se | HandleKind::Sw)
    }
}

/// A handle with its position in canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handle positions for a bounding box, rotated with the element.
///
/// `rotation` is in degrees around the box center, matching the element's
/// visual orientation so grips sit where they are painted.
pub fn handles_for(bounds: Rect, rotation: f64) -> Vec<Handle> {
    let center = bounds.center();
    let hw = bounds.width() / 2.0;
    let hh = bounds.height() / 2.0;
    let theta = rotation.to_radians();
    let (sin, cos) = theta.sin_cos();

    let place = |dx: f64, dy: f64| {
        Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    };

    vec![
        Handle::new(place(0.0, -hh), HandleKind::N),
        Handle::new(place(hw, -hh), HandleKind::Ne),
        Handle::new(place(hw, 0.0), HandleKind::E),
        Handle::new(place(hw, hh), HandleKind::Se),
        Handle::new(place(0.0, hh), HandleKind::S),
        Handle::new(place(-hw, hh), HandleKind::Sw),
        Handle::new(place(-hw, 0.0), HandleKind::W),
        Handle::new(place(-hw, -hh), HandleKind::Nw),
        Handle::new(place(0.0, -hh - ROTATE_HANDLE_OFFSET), HandleKind::Rotate),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(
    bounds: Rect,
    rotation: f64,
    point: Point,
    tolerance: f64,
) -> Option<HandleKind> {
    handles_for(bounds, rotation)
        .iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Apply a compass-handle resize to `initial`, keeping the opposite edge
/// stationary.
///
/// Candidate widths and heights are floored at `min_size` before the
/// compensating position shift is computed, so shrinking past the floor
/// never makes the opposite edge jump. `Rotate` returns `initial`
/// unchanged; rotation is a separate gesture.
pub fn resize(initial: Rect, handle: HandleKind, delta: Vec2, min_size: f64) -> Rect {
    if handle == HandleKind::Rotate {
        return initial;
    }

    let (w, h) = (initial.width(), initial.height());

    let new_w = if handle.moves_east_edge() {
        (w + delta.x).max(min_size)
    } else if handle.moves_west_edge() {
        (w - delta.x).max(min_size)
    } else {
        w
    };

    let new_h = if handle.moves_south_edge() {
        (h + delta.y).max(min_size)
    } else if handle.moves_north_edge() {
        (h - delta.y).max(min_size)
    } else {
        h
    };

    // West/north grips shift the origin so the opposite edge stays put.
    let new_x = if handle.moves_west_edge() {
        initial.x0 + (w - new_w)
    } else {
        initial.x0
    };
    let new_y = if handle.moves_north_edge() {
        initial.y0 + (h - new_h)
    } else {
        initial.y0
    };

    Rect::new(new_x, new_y, new_x + new_w, new_y + new_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MIN_ELEMENT_SIZE;

    fn rect() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 180.0)
    }

    #[test]
    fn test_handle_layout() {
        let handles = handles_for(rect(), 0.0);
        assert_eq!(handles.len(), 9);

        let nw = handles.iter().find(|h| h.kind == HandleKind::Nw).unwrap();
        assert!((nw.position.x - 100.0).abs() < f64::EPSILON);
        assert!((nw.position.y - 100.0).abs() < f64::EPSILON);

        let s = handles.iter().find(|h| h.kind == HandleKind::S).unwrap();
        assert!((s.position.x - 150.0).abs() < f64::EPSILON);
        assert!((s.position.y - 180.0).abs() < f64::EPSILON);

        let rot = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        assert!((rot.position.y - (100.0 - ROTATE_HANDLE_OFFSET)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_layout_rotated() {
        // Quarter turn: the north handle ends up east of the center.
        let handles = handles_for(rect(), 90.0);
        let n = handles.iter().find(|h| h.kind == HandleKind::N).unwrap();
        assert!((n.position.x - 190.0).abs() < 1e-9);
        assert!((n.position.y - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_handles() {
        assert_eq!(
            hit_test_handles(rect(), 0.0, Point::new(201.0, 181.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Se)
        );
        assert_eq!(
            hit_test_handles(rect(), 0.0, Point::new(150.0, 140.0), HANDLE_HIT_TOLERANCE),
            None
        );
    }

    #[test]
    fn test_se_resize_keeps_origin() {
        let r = resize(rect(), HandleKind::Se, Vec2::new(30.0, -20.0), MIN_ELEMENT_SIZE);
        assert!((r.x0 - 100.0).abs() < f64::EPSILON);
        assert!((r.y0 - 100.0).abs() < f64::EPSILON);
        assert!((r.width() - 130.0).abs() < f64::EPSILON);
        assert!((r.height() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nw_resize_keeps_far_corner() {
        let r = resize(rect(), HandleKind::Nw, Vec2::new(25.0, 10.0), MIN_ELEMENT_SIZE);
        assert!((r.x1 - 200.0).abs() < f64::EPSILON);
        assert!((r.y1 - 180.0).abs() < f64::EPSILON);
        assert!((r.width() - 75.0).abs() < f64::EPSILON);
        assert!((r.height() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_handles_move_one_axis() {
        let e = resize(rect(), HandleKind::E, Vec2::new(40.0, 99.0), MIN_ELEMENT_SIZE);
        assert!((e.width() - 140.0).abs() < f64::EPSILON);
        assert!((e.height() - 80.0).abs() < f64::EPSILON);

        let n = resize(rect(), HandleKind::N, Vec2::new(99.0, -15.0), MIN_ELEMENT_SIZE);
        assert!((n.height() - 95.0).abs() < f64::EPSILON);
        assert!((n.y0 - 85.0).abs() < f64::EPSILON);
        assert!((n.width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floor_applies_before_position_shift() {
        // 40x40 box shrunk from the west past the floor: width stops at 20
        // and the origin shifts exactly by the 20 units actually removed.
        let small = Rect::new(300.0, 300.0, 340.0, 340.0);
        let r = resize(small, HandleKind::W, Vec2::new(100.0, 0.0), MIN_ELEMENT_SIZE);
        assert!((r.width() - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
        assert!((r.x0 - 320.0).abs() < f64::EPSILON);
        assert!((r.x1 - 340.0).abs() < f64::EPSILON);
    }
}
