//! Grid snapping and print-area clamping.

use kurbo::{Point, Rect};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Smallest usable element edge, in canvas units.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Snap a value to the nearest multiple of `grid_size` when enabled.
pub fn snap(value: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(point: Point, grid_size: f64, enabled: bool) -> Point {
    Point::new(
        snap(point.x, grid_size, enabled),
        snap(point.y, grid_size, enabled),
    )
}

/// Force a candidate rectangle inside `bounds`, never smaller than `min_size`.
///
/// Size is clamped before position: the valid position range depends on the
/// final width and height. The result always lies entirely within `bounds`
/// as long as `bounds` itself is at least `min_size` on each side.
pub fn clamp_to_bounds(candidate: Rect, bounds: Rect, min_size: f64) -> Rect {
    let width = candidate.width().clamp(min_size, bounds.width().max(min_size));
    let height = candidate
        .height()
        .clamp(min_size, bounds.height().max(min_size));

    let x = candidate.x0.clamp(bounds.x0, (bounds.x1 - width).max(bounds.x0));
    let y = candidate.y0.clamp(bounds.y0, (bounds.y1 - height).max(bounds.y0));

    Rect::new(x, y, x + width, y + height)
}
