// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Axis-aligned bounding boxes.

use crate::matrix::Matrix4;
use crate::vector::Vector;

/// An axis-aligned box spanning `min`..`max`.
///
/// The all-zero box is the empty sentinel: extending it returns the other
/// operand, and a failed intersection collapses back to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Vector,
    pub max: Vector,
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: Vector::ZERO,
        max: Vector::ZERO,
    };

    #[inline]
    pub const fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// The tight box around every box in `boxes`.
    pub fn from_bounds<I: IntoIterator<Item = Bounds>>(boxes: I) -> Self {
        boxes
            .into_iter()
            .fold(Self::EMPTY, |acc, b| acc.extend(b))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn size(self) -> Vector {
        self.max - self.min
    }

    /// Point at the given fractional anchor inside the box; (0.5, 0.5, 0.5)
    /// is the center.
    pub fn anchor(self, anchor: Vector) -> Vector {
        self.min + self.size() * anchor
    }

    pub fn center(self) -> Vector {
        self.anchor(Vector::new(0.5, 0.5, 0.5))
    }

    pub fn volume(self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// The smallest box containing both operands.
    pub fn extend(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Grow (or shrink, for negative `x`) by a margin on every side.
    pub fn offset(self, x: f64) -> Self {
        Self::new(
            self.min - Vector::new(x, x, x),
            self.max + Vector::new(x, x, x),
        )
    }

    pub fn translate(self, v: Vector) -> Self {
        Self::new(self.min + v, self.max + v)
    }

    pub fn contains(self, p: Vector) -> bool {
        self.min.x <= p.x
            && self.max.x >= p.x
            && self.min.y <= p.y
            && self.max.y >= p.y
            && self.min.z <= p.z
            && self.max.z >= p.z
    }

    pub fn contains_bounds(self, b: Self) -> bool {
        self.min.x <= b.min.x
            && self.max.x >= b.max.x
            && self.min.y <= b.min.y
            && self.max.y >= b.max.y
            && self.min.z <= b.min.z
            && self.max.z >= b.max.z
    }

    pub fn intersects(self, b: Self) -> bool {
        !(self.min.x > b.max.x
            || self.max.x < b.min.x
            || self.min.y > b.max.y
            || self.max.y < b.min.y
            || self.min.z > b.max.z
            || self.max.z < b.min.z)
    }

    /// The overlapping region, or the empty box when disjoint.
    pub fn intersection(self, b: Self) -> Self {
        if !self.intersects(b) {
            return Self::EMPTY;
        }
        let min = self.min.max(b.min);
        let max = self.max.min(b.max);
        Self::new(min.min(max), min.max(max))
    }

    pub fn transform(self, m: Matrix4) -> Self {
        m.mul_bounds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Bounds {
        Bounds::new(Vector::ZERO, Vector::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_extend_empty() {
        let b = unit();
        assert_eq!(Bounds::EMPTY.extend(b), b);
        assert_eq!(b.extend(Bounds::EMPTY), b);
    }

    #[test]
    fn test_extend() {
        let a = unit();
        let b = Bounds::new(Vector::new(2.0, -1.0, 0.5), Vector::new(3.0, 0.5, 2.0));
        let e = a.extend(b);
        assert_eq!(e.min, Vector::new(0.0, -1.0, 0.0));
        assert_eq!(e.max, Vector::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn test_center_size_anchor() {
        let b = Bounds::new(Vector::new(1.0, 1.0, 1.0), Vector::new(3.0, 5.0, 9.0));
        assert_eq!(b.size(), Vector::new(2.0, 4.0, 8.0));
        assert_eq!(b.center(), Vector::new(2.0, 3.0, 5.0));
        assert_eq!(b.anchor(Vector::new(0.0, 0.0, 1.0)), Vector::new(1.0, 1.0, 9.0));
        assert_eq!(b.volume(), 64.0);
    }

    #[test]
    fn test_offset() {
        let b = unit().offset(0.5);
        assert_eq!(b.min, Vector::new(-0.5, -0.5, -0.5));
        assert_eq!(b.max, Vector::new(1.5, 1.5, 1.5));
        assert_eq!(unit().offset(0.25).volume(), 1.5 * 1.5 * 1.5);
    }

    #[test]
    fn test_contains() {
        let b = unit();
        assert!(b.contains(Vector::new(0.5, 0.5, 0.5)));
        assert!(b.contains(Vector::new(0.0, 1.0, 0.0)));
        assert!(!b.contains(Vector::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let a = unit();
        let b = a.translate(Vector::new(5.0, 0.0, 0.0));
        assert!(!a.intersects(b));
        assert!(a.intersection(b).is_empty());
    }

    #[test]
    fn test_intersection_overlap() {
        let a = unit();
        let b = a.translate(Vector::new(0.5, 0.5, 0.0));
        let i = a.intersection(b);
        assert_eq!(i.min, Vector::new(0.5, 0.5, 0.0));
        assert_eq!(i.max, Vector::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_from_bounds() {
        let a = unit();
        let b = a.translate(Vector::new(-2.0, 0.0, 0.0));
        let all = Bounds::from_bounds([a, b]);
        assert_eq!(all.min, Vector::new(-2.0, 0.0, 0.0));
        assert_eq!(all.max, Vector::new(1.0, 1.0, 1.0));
        assert_eq!(Bounds::from_bounds([]), Bounds::EMPTY);
    }
}
