#![forbid(unsafe_code)]

//! 2D affine transforms (row-vector convention, 3x2 matrix).

use arbor_core::geometry::Point;

/// An affine transform mapping `p` to `p * M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    #[inline]
    pub const fn translation(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    /// Apply `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    /// Translate in local space before applying `self`.
    #[must_use]
    pub fn pre_translate(&self, offset: Point) -> Transform {
        Transform::translation(offset.x, offset.y).then(self)
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.m11 + p.y * self.m21 + self.dx,
            p.x * self.m12 + p.y * self.m22 + self.dy,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use arbor_core::geometry::Point;

    #[test]
    fn translations_accumulate() {
        let t = Transform::IDENTITY
            .pre_translate(Point::new(10.0, 20.0))
            .pre_translate(Point::new(1.0, 2.0));
        assert_eq!(t, Transform::translation(11.0, 22.0));
        assert_eq!(t.apply(Point::ZERO), Point::new(11.0, 22.0));
    }

    #[test]
    fn local_translation_is_scaled_by_outer() {
        let outer = Transform::scale(2.0, 2.0);
        let t = outer.pre_translate(Point::new(5.0, 5.0));
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 12.0));
    }

    #[test]
    fn identity_is_neutral() {
        let t = Transform::translation(3.0, -4.0);
        assert_eq!(t.then(&Transform::IDENTITY), t);
        assert_eq!(Transform::IDENTITY.then(&t), t);
    }
}
