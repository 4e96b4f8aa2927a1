//! Thick segment shape: two local endpoints plus a thickness radius.
//!
//! The true boundary is the Minkowski sum of the segment with a disk of
//! the thickness radius: a straight-walled middle section capped by two
//! semicircles.

use crate::bb::Aabb;
use crate::geom::{self, RayHit, GRADIENT_EPSILON};
use crate::{Fp, Vec2};

use super::{NearestPointInfo, ShapeGeometry};

#[derive(Debug, Clone)]
pub struct SegmentShape {
    a: Vec2,
    b: Vec2,
    r: Fp,
    ta: Vec2,
    tb: Vec2,
}

impl SegmentShape {
    pub fn new(a: Vec2, b: Vec2, radius: Fp) -> SegmentShape {
        SegmentShape {
            a,
            b,
            r: radius.abs(),
            ta: a,
            tb: b,
        }
    }

    /// Local endpoints, pre-transform.
    #[inline]
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        (self.a, self.b)
    }

    /// Thickness radius.
    #[inline]
    pub fn radius(&self) -> Fp {
        self.r
    }

    /// World-space endpoints as of the last transform update.
    #[inline]
    pub fn world_endpoints(&self) -> (Vec2, Vec2) {
        (self.ta, self.tb)
    }

    /// Unit normal of the world-space segment, zero for a zero-length
    /// segment.
    #[inline]
    pub fn world_normal(&self) -> Vec2 {
        geom::perp(geom::normalize_or_zero(self.tb - self.ta))
    }

    /// Replaces the local endpoints. Cached world data is stale until the
    /// next transform update.
    pub fn set_endpoints(&mut self, a: Vec2, b: Vec2) {
        self.a = a;
        self.b = b;
    }

    /// Replaces the thickness radius. Cached world data is stale until
    /// the next transform update.
    pub fn set_radius(&mut self, radius: Fp) {
        self.r = radius.abs();
    }
}

impl ShapeGeometry for SegmentShape {
    fn cache_bb(&mut self, pos: Vec2, rot: Vec2) -> Aabb {
        self.ta = pos + geom::rotate(self.a, rot);
        self.tb = pos + geom::rotate(self.b, rot);
        Aabb::for_segment(self.ta, self.tb, self.r)
    }

    fn nearest_point(&self, p: Vec2) -> NearestPointInfo {
        let closest = geom::closest_point_on_segment(p, self.ta, self.tb);
        let delta = p - closest;
        let d = delta.length();

        // On-axis queries have no usable delta; the segment's own normal
        // is the fallback gradient.
        let g = if d > GRADIENT_EPSILON {
            delta / d
        } else {
            self.world_normal()
        };
        NearestPointInfo {
            shape: None,
            point: if d > 0.0 {
                closest + delta * (self.r / d)
            } else {
                closest
            },
            distance: d - self.r,
            gradient: g,
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2) -> Option<RayHit> {
        //! Two-branch capsule raycast. The straight walls are the segment
        //! offset by the thickness radius along its normal, oriented to
        //! face the ray origin; rays whose path does not pass between the
        //! wall endpoints can still enter through a rounded end cap.
        let n = self.world_normal();
        let d = (self.ta - a).dot(n);
        let r = self.r;

        let flipped_n = if d > 0.0 { -n } else { n };
        let seg_offset = flipped_n * r - a;

        // wall endpoints relative to the ray origin, pushed toward the ray
        // by the thickness radius
        let seg_a = self.ta + seg_offset;
        let seg_b = self.tb + seg_offset;
        let delta = b - a;

        if delta.perp_dot(seg_a) * delta.perp_dot(seg_b) <= 0.0 {
            let d_offset = d + if d > 0.0 { -r } else { r };
            let ad = -d_offset;
            let bd = delta.dot(n) - d_offset;

            if ad * bd < 0.0 {
                return Some(RayHit {
                    t: ad / (ad - bd),
                    normal: flipped_n,
                });
            }
        } else if r != 0.0 {
            // the ray can only enter through a rounded end cap
            let hit_a = geom::circle_segment_query(self.ta, r, a, b);
            let hit_b = geom::circle_segment_query(self.tb, r, a, b);
            return match (hit_a, hit_b) {
                (Some(ha), Some(hb)) => Some(if ha.t < hb.t { ha } else { hb }),
                (ha, hb) => ha.or(hb),
            };
        }
        None
    }
}
