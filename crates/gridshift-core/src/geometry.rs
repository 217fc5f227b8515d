#![forbid(unsafe_code)]

//! Geometric primitives in logical screen space.
//!
//! All coordinates are `f32` with the origin at the top-left of the host
//! surface; `y` grows downward.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Scroll or flow direction of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// An absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// Coordinate along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// A relative displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Exact zero check. Offsets are reset by assignment, never by
    /// arithmetic, so exact comparison is meaningful here.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.dx,
            Axis::Vertical => self.dy,
        }
    }

    /// Linear interpolation; `t` is not clamped.
    #[inline]
    #[must_use]
    pub fn lerp(from: Offset, to: Offset, t: f32) -> Offset {
        Offset::new(
            from.dx + (to.dx - from.dx) * t,
            from.dy + (to.dy - from.dy) * t,
        )
    }
}

impl Add for Offset {
    type Output = Offset;
    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Offset) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl Sub for Offset {
    type Output = Offset;
    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Neg for Offset {
    type Output = Offset;
    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

impl Mul<f32> for Offset {
    type Output = Offset;
    fn mul(self, rhs: f32) -> Offset {
        Offset::new(self.dx * rhs, self.dy * rhs)
    }
}

impl Sub for Point {
    type Output = Offset;
    fn sub(self, rhs: Point) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Offset> for Point {
    type Output = Point;
    fn add(self, rhs: Offset) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl AddAssign<Offset> for Point {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub<Offset> for Point {
    type Output = Point;
    fn sub(self, rhs: Offset) -> Point {
        Point::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    #[inline]
    #[must_use]
    pub const fn extent(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Offset from the top-left corner to the center.
    #[inline]
    #[must_use]
    pub fn half(self) -> Offset {
        Offset::new(self.width / 2.0, self.height / 2.0)
    }
}

/// An axis-aligned rectangle used for hit testing and slot geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub const fn top_left(&self) -> Point {
        self.origin()
    }

    #[inline]
    #[must_use]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        self.origin() + self.size().half()
    }

    /// Leading edge along `axis`.
    #[inline]
    #[must_use]
    pub const fn start(&self, axis: Axis) -> f32 {
        self.origin().along(axis)
    }

    /// Trailing edge along `axis`.
    #[inline]
    #[must_use]
    pub fn end(&self, axis: Axis) -> f32 {
        self.start(axis) + self.size().extent(axis)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    #[inline]
    #[must_use]
    pub fn translate(&self, by: Offset) -> Rect {
        Rect::from_origin_size(self.origin() + by, self.size())
    }

    /// Interpolate origin and size; `t` is not clamped.
    #[must_use]
    pub fn lerp(from: Rect, to: Rect, t: f32) -> Rect {
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Rect::new(
            lerp(from.x, to.x),
            lerp(from.y, to.y),
            lerp(from.width, to.width),
            lerp(from.height, to.height),
        )
    }
}
