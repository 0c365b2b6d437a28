#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are logical (density-independent) units with the origin at the
//! top-left of the client area and y growing downwards.

use std::ops::{Add, Neg, Sub};

/// A point in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle.
///
/// Containment is half-open: the left and top edges are inside, the right
/// and bottom edges are not.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a rectangle from its top-left corner and a size.
    #[inline]
    pub const fn from_origin_size(lefttop: Point, size: Size) -> Self {
        Self::new(lefttop.x, lefttop.y, size.width, size.height)
    }

    /// Build a rectangle from its four edges.
    #[inline]
    pub fn from_vertices(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub const fn lefttop(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[inline]
    pub fn rightbottom(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Shrink by the given edge thickness. Width and height never go negative.
    pub fn inner(&self, thickness: Thickness) -> Rect {
        Rect::new(
            self.left + thickness.left,
            self.top + thickness.top,
            (self.width - thickness.horizontal_sum()).max(0.0),
            (self.height - thickness.vertical_sum()).max(0.0),
        )
    }
}

/// Edge thickness, used for padding and margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const ZERO: Self = Self::uniform(0.0);

    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same value on every edge.
    #[inline]
    pub const fn uniform(width: f32) -> Self {
        Self::new(width, width, width, width)
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Thickness {
    fn from(width: f32) -> Self {
        Self::uniform(width)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size, Thickness};

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.9, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
        assert!(!rect.contains(Point::new(1.9, 4.0)));
    }

    #[test]
    fn rect_from_vertices() {
        let rect = Rect::from_vertices(10.0, 20.0, 30.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 20.0, 40.0));
        assert_eq!(rect.lefttop(), Point::new(10.0, 20.0));
        assert_eq!(rect.rightbottom(), Point::new(30.0, 60.0));
        assert_eq!(rect.size(), Size::new(20.0, 40.0));
    }

    #[test]
    fn inner_clamps_to_zero() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let inner = rect.inner(Thickness::uniform(3.0));
        assert_eq!(inner.lefttop(), Point::new(3.0, 3.0));
        assert_eq!(inner.size(), Size::ZERO);
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a + b, Point::new(11.0, 22.0));
        assert_eq!(b - a, Point::new(9.0, 18.0));
        assert_eq!(-a, Point::new(-1.0, -2.0));
    }
}
