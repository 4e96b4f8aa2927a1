//! Axis-aligned bounding boxes.

use crate::{Fp, Vec2};

/// Axis-aligned box. Fields are public for pre-validated construction;
/// `new` asserts ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Degenerate box at the origin. Placeholder for not-yet-transformed
    /// shapes.
    pub const ZERO: Aabb = Aabb {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    #[inline]
    pub fn new(min: Vec2, max: Vec2) -> Aabb {
        assert!(min.x <= max.x && min.y <= max.y, "unordered Aabb bounds");
        Aabb { min, max }
    }

    #[inline]
    pub fn new_safe(a: Vec2, b: Vec2) -> Aabb {
        //! Orders the bounds.
        Aabb { min: a.min(b), max: a.max(b) }
    }

    #[inline]
    pub fn for_circle(center: Vec2, r: Fp) -> Aabb {
        //! Minimal box containing the disk `(center, r)`.
        Aabb { min: center - Vec2::splat(r), max: center + Vec2::splat(r) }
    }

    #[inline]
    pub fn for_segment(a: Vec2, b: Vec2, r: Fp) -> Aabb {
        //! Minimal box containing the segment `a`-`b` inflated by `r`.
        Aabb { min: a.min(b) - Vec2::splat(r), max: a.max(b) + Vec2::splat(r) }
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Aabb {
        Aabb { min: self.min + offset, max: self.max + offset }
    }

    #[inline]
    pub fn expand(self, r: Fp) -> Aabb {
        //! Grows the box by `r` on all four sides.
        Aabb { min: self.min - Vec2::splat(r), max: self.max + Vec2::splat(r) }
    }

    #[inline]
    pub fn merge(self, other: Aabb) -> Aabb {
        //! Smallest box containing both.
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn line_test(&self, a: Vec2, b: Vec2) -> bool {
        //! Returns whether the segment `a`->`b` passes through the box.
        // SAT tests (https://www.gamedev.net/forums/topic/338987-aabb---line-segment-intersection-test/)
        let halfab = (b - a) * 0.5;
        let halfaabb = (self.max - self.min) * 0.5;
        let halfdiff = a + halfab - (self.min + self.max) * 0.5;
        let abs_hd_x = halfab.x.abs();
        let abs_hd_y = halfab.y.abs();
        !(halfdiff.x.abs() > halfaabb.x + abs_hd_x
            || halfdiff.y.abs() > halfaabb.y + abs_hd_y
            || (halfab.x * halfdiff.y - halfab.y * halfdiff.x).abs()
                > halfaabb.x * abs_hd_y + halfaabb.y * abs_hd_x + 0.00001)
    }
}
