//! Orthogonal link routes between node rectangles.

use crate::diagram::Spot;
use narwhal_network::geom::{self, Point, Rect, Vector};

/// Length of the straight stub leaving and entering a port.
pub const END_SEGMENT_LENGTH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn outward(self) -> Vector {
        match self {
            Side::Left => geom::vector(-1.0, 0.0),
            Side::Right => geom::vector(1.0, 0.0),
            Side::Top => geom::vector(0.0, -1.0),
            Side::Bottom => geom::vector(0.0, 1.0),
        }
    }

    /// Whether a route leaves this side horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// The side of `own` that faces `other`.
    pub fn facing(own: &Rect, other: &Rect) -> Side {
        let d = other.center() - own.center();
        if d.x.abs() >= d.y.abs() {
            if d.x >= 0.0 { Side::Right } else { Side::Left }
        } else if d.y >= 0.0 {
            Side::Bottom
        } else {
            Side::Top
        }
    }

    pub fn of_spot(spot: Spot, own: &Rect, other: &Rect) -> Side {
        match spot {
            Spot::Left | Spot::LeftSide => Side::Left,
            Spot::Right | Spot::RightSide => Side::Right,
            Spot::Top | Spot::TopSide => Side::Top,
            Spot::Bottom | Spot::BottomSide => Side::Bottom,
            Spot::None | Spot::Center => Side::facing(own, other),
        }
    }
}

/// Position of one link among the links sharing a `*Side` spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSlot {
    pub index: usize,
    pub count: usize,
}

impl PortSlot {
    pub const SINGLE: PortSlot = PortSlot { index: 0, count: 1 };

    pub fn new(index: usize, count: usize) -> Self {
        Self { index, count }
    }
}

/// The point where a link attaches to `rect` on `side`.
pub fn port_point(rect: &Rect, side: Side, spread: bool, slot: PortSlot) -> Point {
    let t = if spread && slot.count > 1 {
        (slot.index + 1) as f64 / (slot.count + 1) as f64
    } else {
        0.5
    };
    match side {
        Side::Left => geom::point(rect.min_x(), rect.min_y() + rect.height() * t),
        Side::Right => geom::point(rect.max_x(), rect.min_y() + rect.height() * t),
        Side::Top => geom::point(rect.min_x() + rect.width() * t, rect.min_y()),
        Side::Bottom => geom::point(rect.min_x() + rect.width() * t, rect.max_y()),
    }
}

pub fn orthogonal_route(from: &Rect, from_spot: Spot, to: &Rect, to_spot: Spot) -> Vec<Point> {
    orthogonal_route_with_slots(from, from_spot, PortSlot::SINGLE, to, to_spot, PortSlot::SINGLE)
}

/// Routes `from` -> `to` with a stub at each end and right-angle bends in between.
///
/// Two horizontal (or two vertical) ends give six points, with the middle run at the halfway
/// coordinate between the stubs. Mixed ends give five points around a single corner.
pub fn orthogonal_route_with_slots(
    from: &Rect,
    from_spot: Spot,
    from_slot: PortSlot,
    to: &Rect,
    to_spot: Spot,
    to_slot: PortSlot,
) -> Vec<Point> {
    let from_side = Side::of_spot(from_spot, from, to);
    let to_side = Side::of_spot(to_spot, to, from);
    let p0 = port_point(from, from_side, from_spot.is_side(), from_slot);
    let p1 = p0 + from_side.outward() * END_SEGMENT_LENGTH;
    let p5 = port_point(to, to_side, to_spot.is_side(), to_slot);
    let p4 = p5 + to_side.outward() * END_SEGMENT_LENGTH;

    match (from_side.is_horizontal(), to_side.is_horizontal()) {
        (true, true) => {
            let mid = (p1.x + p4.x) / 2.0;
            vec![
                p0,
                p1,
                geom::point(mid, p1.y),
                geom::point(mid, p4.y),
                p4,
                p5,
            ]
        }
        (false, false) => {
            let mid = (p1.y + p4.y) / 2.0;
            vec![
                p0,
                p1,
                geom::point(p1.x, mid),
                geom::point(p4.x, mid),
                p4,
                p5,
            ]
        }
        (true, false) => vec![p0, p1, geom::point(p4.x, p1.y), p4, p5],
        (false, true) => vec![p0, p1, geom::point(p1.x, p4.y), p4, p5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narwhal_network::geom::{point, rect_centered, size};

    #[test]
    fn right_to_left_route_has_a_vertical_middle_run() {
        let a = rect_centered(point(0.0, 0.0), size(20.0, 20.0));
        let b = rect_centered(point(100.0, 50.0), size(20.0, 20.0));
        let pts = orthogonal_route(&a, Spot::Right, &b, Spot::Left);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], point(10.0, 0.0));
        assert_eq!(pts[1], point(20.0, 0.0));
        assert_eq!(pts[2].x, pts[3].x);
        assert_eq!(pts[2].x, 50.0);
        assert_eq!(pts[4], point(80.0, 50.0));
        assert_eq!(pts[5], point(90.0, 50.0));
    }

    #[test]
    fn unspecified_spots_face_each_other() {
        let a = rect_centered(point(0.0, 0.0), size(20.0, 20.0));
        let b = rect_centered(point(0.0, 100.0), size(20.0, 20.0));
        let pts = orthogonal_route(&a, Spot::None, &b, Spot::None);
        assert_eq!(pts[0], point(0.0, 10.0));
        assert_eq!(pts[5], point(0.0, 90.0));
    }

    #[test]
    fn side_spots_spread_ports() {
        let a = rect_centered(point(0.0, 0.0), size(30.0, 30.0));
        let first = port_point(&a, Side::Right, true, PortSlot::new(0, 2));
        let second = port_point(&a, Side::Right, true, PortSlot::new(1, 2));
        assert_eq!(first, point(15.0, -5.0));
        assert_eq!(second, point(15.0, 5.0));
    }

    #[test]
    fn mixed_ends_bend_once() {
        let a = rect_centered(point(0.0, 0.0), size(20.0, 20.0));
        let b = rect_centered(point(100.0, 100.0), size(20.0, 20.0));
        let pts = orthogonal_route(&a, Spot::Top, &b, Spot::Left);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[2], point(pts[1].x, pts[3].y));
    }
}
