//! Pure geometric helpers: anchor projection, hit tests, grid snapping.

use crate::shapes::{Shape, ShapeKind};
use kurbo::{Point, Vec2};

/// Point on the boundary of `shape` where a ray from its center toward
/// `toward` exits.
///
/// Box-like shapes (rect, symbol) use the scaled L-infinity intersection,
/// which lands exactly on the rectangle edge. Ellipses solve the ellipse
/// equation for the ray parameter directly. A target at the center returns
/// the center unchanged.
pub fn anchor_point(shape: &Shape, toward: Point) -> Point {
    let c = shape.center();
    let dx = toward.x - c.x;
    let dy = toward.y - c.y;
    if dx == 0.0 && dy == 0.0 {
        return c;
    }
    match shape.kind {
        ShapeKind::Rect | ShapeKind::Symbol => {
            let rx = shape.w / 2.0;
            let ry = shape.h / 2.0;
            let tx = if dx == 0.0 { f64::INFINITY } else { rx / dx.abs() };
            let ty = if dy == 0.0 { f64::INFINITY } else { ry / dy.abs() };
            let t = tx.min(ty);
            Point::new(c.x + dx * t, c.y + dy * t)
        }
        ShapeKind::Ellipse => {
            let a = shape.w / 2.0;
            let b = shape.h / 2.0;
            let denom = (dx * dx) / (a * a) + (dy * dy) / (b * b);
            if denom <= 0.0 {
                return c;
            }
            let t = 1.0 / denom.sqrt();
            Point::new(c.x + dx * t, c.y + dy * t)
        }
    }
}

/// Containment test: bounding box for rect/symbol, ellipse equation for
/// ellipses. Boundary points count as inside.
pub fn point_in_shape(point: Point, shape: &Shape) -> bool {
    match shape.kind {
        ShapeKind::Rect | ShapeKind::Symbol => {
            point.x >= shape.x
                && point.x <= shape.x + shape.w
                && point.y >= shape.y
                && point.y <= shape.y + shape.h
        }
        ShapeKind::Ellipse => {
            let a = shape.w / 2.0;
            let b = shape.h / 2.0;
            if a <= 0.0 || b <= 0.0 {
                return false;
            }
            let c = shape.center();
            let nx = (point.x - c.x) / a;
            let ny = (point.y - c.y) / b;
            nx * nx + ny * ny <= 1.0
        }
    }
}

/// Euclidean distance from `point` to the closest point on segment `[a, b]`.
pub fn dist_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Round to the nearest multiple of `grid_size` when `enabled`, else identity.
pub fn snap(value: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point.
pub fn snap_point(point: Point, grid_size: f64, enabled: bool) -> Point {
    Point::new(
        snap(point.x, grid_size, enabled),
        snap(point.y, grid_size, enabled),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Color;

    fn shape(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape {
            id: 1,
            kind,
            symbol: None,
            x,
            y,
            w,
            h,
            fill: Color::white(),
            outline: Color::black(),
            width: 2,
            text: String::new(),
        }
    }

    #[test]
    fn rect_anchor_east_midpoint() {
        let s = shape(ShapeKind::Rect, 0.0, 0.0, 100.0, 60.0);
        let p = anchor_point(&s, Point::new(500.0, 30.0));
        assert_eq!(p, Point::new(100.0, 30.0));
    }

    #[test]
    fn rect_anchor_corner_direction() {
        let s = shape(ShapeKind::Rect, 0.0, 0.0, 100.0, 100.0);
        let p = anchor_point(&s, Point::new(150.0, 150.0));
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn ellipse_anchor_on_axis() {
        let s = shape(ShapeKind::Ellipse, -50.0, -30.0, 100.0, 60.0);
        let p = anchor_point(&s, Point::new(200.0, 0.0));
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn anchor_degenerate_target_is_center() {
        let s = shape(ShapeKind::Ellipse, 0.0, 0.0, 40.0, 40.0);
        assert_eq!(anchor_point(&s, s.center()), s.center());
    }

    #[test]
    fn symbol_uses_box_anchor() {
        let s = shape(ShapeKind::Symbol, 0.0, 0.0, 80.0, 40.0);
        let p = anchor_point(&s, Point::new(40.0, 200.0));
        assert_eq!(p, Point::new(40.0, 40.0));
    }

    #[test]
    fn point_in_rect_inclusive_boundary() {
        let s = shape(ShapeKind::Rect, 10.0, 10.0, 50.0, 50.0);
        assert!(point_in_shape(Point::new(10.0, 10.0), &s));
        assert!(point_in_shape(Point::new(60.0, 60.0), &s));
        assert!(!point_in_shape(Point::new(60.1, 30.0), &s));
    }

    #[test]
    fn point_in_ellipse() {
        let s = shape(ShapeKind::Ellipse, 0.0, 0.0, 100.0, 60.0);
        assert!(point_in_shape(Point::new(50.0, 30.0), &s));
        assert!(point_in_shape(Point::new(100.0, 30.0), &s));
        // Inside the bounding box but outside the ellipse.
        assert!(!point_in_shape(Point::new(95.0, 5.0), &s));
    }

    #[test]
    fn degenerate_ellipse_contains_nothing() {
        let mut s = shape(ShapeKind::Ellipse, 0.0, 0.0, 0.0, 60.0);
        s.w = 0.0;
        assert!(!point_in_shape(Point::new(0.0, 30.0), &s));
    }

    #[test]
    fn segment_distance() {
        let d = dist_point_to_segment(
            Point::new(5.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-9);
        // Beyond the end clamps to the endpoint.
        let d = dist_point_to_segment(
            Point::new(13.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_segment_is_point_distance() {
        let p = Point::new(3.0, 4.0);
        let a = Point::new(0.0, 0.0);
        assert!((dist_point_to_segment(p, a, a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn snap_rounds_to_grid() {
        assert_eq!(snap(23.0, 20.0, true), 20.0);
        assert_eq!(snap(31.0, 20.0, true), 40.0);
        assert_eq!(snap(23.0, 20.0, false), 23.0);
    }
}
