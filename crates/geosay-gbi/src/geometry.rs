use std::f32::consts::{PI, TAU};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D point in pixel coordinates, possibly fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The point displaced by `length` along the direction `angle`.
    pub fn offset_polar(self, angle: f32, length: f32) -> Self {
        Self::new(self.x + length * angle.cos(), self.y + length * angle.sin())
    }

    /// The point as `[x, y]`.
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f32) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point2 {
    type Output = Point2;

    fn div(self, rhs: f32) -> Point2 {
        Point2::new(self.x / rhs, self.y / rhs)
    }
}

/// Shortest arc between two angles on a circle of period 2π.
///
/// Returns `min(|a - b|, 2π - |a - b|)`, always in `[0, π]`. The absolute difference is
/// wrapped into `[0, 2π)` first so inputs of any magnitude are accepted.
///
/// # Example
///
/// ```
/// use geosay_gbi::geometry::circular_difference;
///
/// let d = circular_difference(0.1, 2.0 * std::f32::consts::PI - 0.1);
/// assert!((d - 0.2).abs() < 1e-5);
/// ```
#[inline]
pub fn circular_difference(a: f32, b: f32) -> f32 {
    let d = (a - b).abs().rem_euclid(TAU);
    d.min(TAU - d).clamp(0.0, PI)
}

/// Squared euclidean distance between two points.
#[inline]
pub fn squared_distance(p1: Point2, p2: Point2) -> f32 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    dx * dx + dy * dy
}
