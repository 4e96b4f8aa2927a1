//! Shared closed-form geometry: rotations, projections, ray-vs-disk.

use crate::{Fp, Vec2};

/// Distances at or below this use a fallback gradient direction instead of
/// the normalized delta. Fixed and scale-independent; worlds built at
/// extreme scales should be rescaled rather than tuning this.
pub const GRADIENT_EPSILON: Fp = 1e-5;

/// Raw geometric ray hit: parameter along the query segment plus the
/// surface normal at the entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub t: Fp,
    pub normal: Vec2,
}

#[inline]
pub fn rot_from_angle(angle: Fp) -> Vec2 {
    //! Rotation encoded as the unit vector `(cos, sin)`.
    Vec2::new(angle.cos(), angle.sin())
}

#[inline]
pub fn rotate(v: Vec2, rot: Vec2) -> Vec2 {
    //! Rotates `v` by the unit rotation vector `rot` (complex product).
    Vec2::new(v.x * rot.x - v.y * rot.y, v.x * rot.y + v.y * rot.x)
}

#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    //! Counter-clockwise perpendicular.
    Vec2::new(-v.y, v.x)
}

#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    //! Unit vector along `v`, or zero when `v` has no direction.
    let len2 = v.length_squared();
    if len2 > 0.0 {
        v / len2.sqrt()
    } else {
        Vec2::ZERO
    }
}

#[inline]
pub fn clamp01(t: Fp) -> Fp {
    t.max(0.0).min(1.0)
}

#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    //! Closest point to `p` on the finite segment `a`-`b`. A zero-length
    //! segment yields `b`.
    let delta = a - b;
    let len2 = delta.length_squared();
    if len2 == 0.0 {
        return b;
    }
    let t = clamp01(delta.dot(p - b) / len2);
    b + delta * t
}

pub fn circle_segment_query(center: Vec2, r: Fp, a: Vec2, b: Vec2) -> Option<RayHit> {
    //! Entry point of the segment `a`->`b` into the disk `(center, r)`.
    //! Tangent grazes count as hits; only `t` within `[0, 1]` is reported.
    //! The normal points from the center to the entry point, degenerating
    //! to zero if the entry point is the center itself.
    let da = a - center;
    let db = b - center;

    let qa = da.dot(da) - 2.0 * da.dot(db) + db.dot(db);
    let qb = -2.0 * da.dot(da) + 2.0 * da.dot(db);
    let qc = da.dot(da) - r * r;

    let det = qb * qb - 4.0 * qa * qc;
    if det >= 0.0 {
        let t = (-qb - det.sqrt()) / (2.0 * qa);
        if 0.0 <= t && t <= 1.0 {
            return Some(RayHit {
                t,
                normal: normalize_or_zero(da.lerp(db, t)),
            });
        }
    }
    None
}
