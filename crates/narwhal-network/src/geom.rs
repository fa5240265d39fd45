#![forbid(unsafe_code)]

//! Geometry primitives shared by every layout.
//!
//! Angles are in degrees and follow screen coordinates: 0 points along +x and 90 along +y
//! (downward), so increasing angles sweep clockwise on screen.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Rectangle of `size` whose center is `center`.
pub fn rect_centered(center: Point, size: Size) -> Rect {
    Rect::new(
        point(center.x - size.width / 2.0, center.y - size.height / 2.0),
        size,
    )
}

/// Smallest rectangle containing both `a` and `b`. Zero-sized rectangles still count.
pub fn union(a: &Rect, b: &Rect) -> Rect {
    let min_x = a.min_x().min(b.min_x());
    let min_y = a.min_y().min(b.min_y());
    let max_x = a.max_x().max(b.max_x());
    let max_y = a.max_y().max(b.max_y());
    Rect::new(point(min_x, min_y), size(max_x - min_x, max_y - min_y))
}

/// Normalizes an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // `rem_euclid` can round tiny negative inputs up to exactly 360.
    if a >= 360.0 { 0.0 } else { a }
}

/// The vector of length `radius` pointing at `degrees`.
pub fn polar(radius: f64, degrees: f64) -> Vector {
    let rad = degrees.to_radians();
    vector(radius * rad.cos(), radius * rad.sin())
}

/// Length of the rectangle's diagonal.
pub fn diagonal(size: Size) -> f64 {
    size.width.hypot(size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_degrees_wraps_into_half_open_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-120.0), 240.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn polar_follows_screen_orientation() {
        let v = polar(100.0, 90.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn union_keeps_degenerate_rects() {
        let a = rect_centered(point(0.0, 0.0), size(10.0, 10.0));
        let b = rect_centered(point(20.0, 0.0), size(0.0, 0.0));
        let u = union(&a, &b);
        assert_eq!(u.min_x(), -5.0);
        assert_eq!(u.max_x(), 20.0);
        assert_eq!(u.height(), 10.0);
    }

    #[test]
    fn rect_centered_puts_center_back() {
        let r = rect_centered(point(10.0, 20.0), size(40.0, 10.0));
        assert_eq!(r.origin, point(-10.0, 15.0));
        assert_eq!(r.center(), point(10.0, 20.0));
    }
}
