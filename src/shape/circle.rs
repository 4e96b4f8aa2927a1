//! Circle shape: local center offset plus radius.

use crate::bb::Aabb;
use crate::geom::{self, RayHit, GRADIENT_EPSILON};
use crate::{Fp, Vec2};

use super::{NearestPointInfo, ShapeGeometry};

/// The cheapest shape variant. The local offset is rotated and translated
/// into a cached world-space center on every transform update.
#[derive(Debug, Clone)]
pub struct CircleShape {
    c: Vec2,
    r: Fp,
    tc: Vec2,
}

impl CircleShape {
    pub fn new(radius: Fp, offset: Vec2) -> CircleShape {
        CircleShape {
            c: offset,
            r: radius.abs(),
            tc: offset,
        }
    }

    /// Local center offset, pre-transform.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.c
    }

    #[inline]
    pub fn radius(&self) -> Fp {
        self.r
    }

    /// World-space center as of the last transform update.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.tc
    }

    /// Replaces the local offset. Cached world data is stale until the
    /// next transform update.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.c = offset;
    }

    /// Replaces the radius. Cached world data is stale until the next
    /// transform update.
    pub fn set_radius(&mut self, radius: Fp) {
        self.r = radius.abs();
    }
}

impl ShapeGeometry for CircleShape {
    fn cache_bb(&mut self, pos: Vec2, rot: Vec2) -> Aabb {
        self.tc = pos + geom::rotate(self.c, rot);
        Aabb::for_circle(self.tc, self.r)
    }

    fn nearest_point(&self, p: Vec2) -> NearestPointInfo {
        let delta = p - self.tc;
        let d = delta.length();

        // Up is the gradient when the query sits on the center.
        let g = if d > GRADIENT_EPSILON {
            delta / d
        } else {
            Vec2::new(0.0, 1.0)
        };
        NearestPointInfo {
            shape: None,
            point: if d > 0.0 {
                self.tc + delta * (self.r / d)
            } else {
                self.tc + g * self.r
            },
            distance: d - self.r,
            gradient: g,
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2) -> Option<RayHit> {
        geom::circle_segment_query(self.tc, self.r, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn updated(radius: Fp, offset: Vec2, pos: Vec2, angle: Fp) -> CircleShape {
        let mut circle = CircleShape::new(radius, offset);
        circle.cache_bb(pos, geom::rot_from_angle(angle));
        circle
    }

    #[test]
    fn bb_follows_transform() {
        let mut circle = CircleShape::new(1.0, Vec2::new(1.0, 0.0));

        let bb = circle.cache_bb(Vec2::new(5.0, 0.0), geom::rot_from_angle(0.0));
        assert_eq!(circle.center(), Vec2::new(6.0, 0.0));
        assert_eq!(bb, Aabb::new(Vec2::new(5.0, -1.0), Vec2::new(7.0, 1.0)));

        // quarter turn swings the offset onto the y axis
        let bb = circle.cache_bb(
            Vec2::new(5.0, 0.0),
            geom::rot_from_angle(std::f64::consts::FRAC_PI_2 as Fp),
        );
        assert_abs_diff_eq!(circle.center().x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(circle.center().y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bb.min.x, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bb.max.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn negative_radius_is_folded() {
        assert_eq!(CircleShape::new(-2.0, Vec2::ZERO).radius(), 2.0);
    }

    #[test]
    fn nearest_matches_closed_form() {
        let circle = updated(1.0, Vec2::ZERO, Vec2::new(5.0, 0.0), 0.0);

        for &p in &[
            Vec2::new(7.0, 0.0),
            Vec2::new(5.0, 0.25),
            Vec2::new(-3.0, 4.0),
            Vec2::new(5.5, -0.5),
        ] {
            let info = circle.nearest_point(p);
            assert_abs_diff_eq!(
                info.distance,
                (p - circle.center()).length() - 1.0,
                epsilon = 1e-6
            );
            // boundary point really is on the boundary
            assert_abs_diff_eq!((info.point - circle.center()).length(), 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(info.gradient.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn nearest_at_center_falls_back() {
        let circle = updated(1.5, Vec2::ZERO, Vec2::new(2.0, 3.0), 0.0);
        let info = circle.nearest_point(Vec2::new(2.0, 3.0));
        assert_eq!(info.gradient, Vec2::new(0.0, 1.0));
        assert_abs_diff_eq!(info.distance, -1.5, epsilon = 1e-6);
        // plausible boundary point, not NaN
        assert_eq!(info.point, Vec2::new(2.0, 4.5));
    }

    #[test]
    fn ray_entry() {
        let circle = updated(1.0, Vec2::ZERO, Vec2::new(0.0, 0.0), 0.0);

        let hit = circle.segment_query(Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)).unwrap();
        assert_abs_diff_eq!(hit.t, 2.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-6);

        assert!(circle.segment_query(Vec2::new(-3.0, 2.0), Vec2::new(3.0, 2.0)).is_none());
    }
}
