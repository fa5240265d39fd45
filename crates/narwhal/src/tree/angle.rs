use crate::diagram::Spot;
use narwhal_network::geom::{self, Rect, Size, Vector};

/// The direction a tree grows in. Only the four axis directions are supported.
///
/// "Along" is the growth axis, "across" is the axis siblings are stacked on. For the
/// horizontal directions across is `y`; for the vertical ones it is `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeAngle {
    #[default]
    Right,
    Down,
    Left,
    Up,
}

impl TreeAngle {
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        match degrees {
            d if d == 0.0 => Some(TreeAngle::Right),
            d if d == 90.0 => Some(TreeAngle::Down),
            d if d == 180.0 => Some(TreeAngle::Left),
            d if d == 270.0 => Some(TreeAngle::Up),
            _ => None,
        }
    }

    pub fn degrees(self) -> f64 {
        match self {
            TreeAngle::Right => 0.0,
            TreeAngle::Down => 90.0,
            TreeAngle::Left => 180.0,
            TreeAngle::Up => 270.0,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, TreeAngle::Right | TreeAngle::Left)
    }

    fn sign(self) -> f64 {
        match self {
            TreeAngle::Right | TreeAngle::Down => 1.0,
            TreeAngle::Left | TreeAngle::Up => -1.0,
        }
    }

    pub fn along(self, v: Vector) -> f64 {
        let raw = if self.is_horizontal() { v.x } else { v.y };
        raw * self.sign()
    }

    pub fn across(self, v: Vector) -> f64 {
        if self.is_horizontal() { v.y } else { v.x }
    }

    /// Inverse of [`along`](Self::along) / [`across`](Self::across).
    pub fn compose(self, along: f64, across: f64) -> Vector {
        let along = along * self.sign();
        if self.is_horizontal() {
            geom::vector(along, across)
        } else {
            geom::vector(across, along)
        }
    }

    /// `(min, max)` of `rect` measured along the growth direction.
    pub fn along_range(self, rect: &Rect) -> (f64, f64) {
        let (lo, hi) = if self.is_horizontal() {
            (rect.min_x(), rect.max_x())
        } else {
            (rect.min_y(), rect.max_y())
        };
        if self.sign() > 0.0 { (lo, hi) } else { (-hi, -lo) }
    }

    pub fn across_range(self, rect: &Rect) -> (f64, f64) {
        if self.is_horizontal() {
            (rect.min_y(), rect.max_y())
        } else {
            (rect.min_x(), rect.max_x())
        }
    }

    pub fn along_extent(self, size: Size) -> f64 {
        if self.is_horizontal() { size.width } else { size.height }
    }

    pub fn across_extent(self, size: Size) -> f64 {
        if self.is_horizontal() { size.height } else { size.width }
    }

    /// Growth directions of the two sides of a bus running in this direction, negative
    /// across side first.
    pub fn side_angles(self) -> (TreeAngle, TreeAngle) {
        if self.is_horizontal() {
            (TreeAngle::Up, TreeAngle::Down)
        } else {
            (TreeAngle::Left, TreeAngle::Right)
        }
    }

    /// `(parent spot, child spot)` for a link from a parent growing in this direction.
    pub fn port_spots(self) -> (Spot, Spot) {
        match self {
            TreeAngle::Right => (Spot::Right, Spot::Left),
            TreeAngle::Down => (Spot::Bottom, Spot::Top),
            TreeAngle::Left => (Spot::Left, Spot::Right),
            TreeAngle::Up => (Spot::Top, Spot::Bottom),
        }
    }
}
