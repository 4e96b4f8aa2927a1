//! Shape base record, identity, and per-variant query dispatch.

pub mod circle;
pub mod segment;

pub use circle::CircleShape;
pub use segment::SegmentShape;

use crate::bb::Aabb;
use crate::body::{Body, BodyId};
use crate::geom::{self, RayHit};
use crate::{Fp, Vec2};

// ---------- Identity & filtering attributes ---------- //

/// Process-unique shape identity, monotonically increasing per counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u64);

/// Hands out `ShapeId`s. Owned by the simulation context rather than
/// living in process-global state; tests create and reset their own.
#[derive(Debug, Default)]
pub struct ShapeIdCounter {
    next: u64,
}

impl ShapeIdCounter {
    pub fn new() -> ShapeIdCounter {
        ShapeIdCounter { next: 0 }
    }

    #[inline]
    pub fn next_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }

    /// Restarts numbering from zero. Test/teardown use only; never call
    /// while shapes issued by this counter are alive in a simulation.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Narrow-phase dispatch tag. Stored, never interpreted here.
pub type CollisionType = u32;

/// Collision filtering group; shapes sharing a non-`NO_GROUP` group are
/// conventionally exempt from colliding. Filtering policy lives with the
/// narrow phase, not here.
pub type Group = u32;
pub const NO_GROUP: Group = 0;

/// Collision layer bitmask; shapes conventionally collide only when their
/// masks overlap.
pub type Layers = u32;
pub const ALL_LAYERS: Layers = !0;

// ---------- Query results ---------- //

/// Result of a nearest-boundary-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPointInfo {
    /// Queried shape; `None` for the blank result.
    pub shape: Option<ShapeId>,
    /// Closest point on the shape's boundary.
    pub point: Vec2,
    /// Signed distance to the boundary; negative means the query point is
    /// inside the shape.
    pub distance: Fp,
    /// Outward unit direction from the boundary toward the query point.
    pub gradient: Vec2,
}

impl NearestPointInfo {
    /// Blank "no shape found" value.
    pub const NONE: NearestPointInfo = NearestPointInfo {
        shape: None,
        point: Vec2::ZERO,
        distance: Fp::INFINITY,
        gradient: Vec2::ZERO,
    };
}

impl Default for NearestPointInfo {
    fn default() -> NearestPointInfo {
        NearestPointInfo::NONE
    }
}

/// Result of a ray (segment) query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentQueryInfo {
    /// Hit shape; `None` on a miss.
    pub shape: Option<ShapeId>,
    /// Hit parameter along `a`->`b`; 1.0 while nothing has been hit.
    pub t: Fp,
    /// Surface normal at the hit point.
    pub normal: Vec2,
}

impl SegmentQueryInfo {
    /// Blank miss value.
    pub const MISS: SegmentQueryInfo = SegmentQueryInfo {
        shape: None,
        t: 1.0,
        normal: Vec2::ZERO,
    };

    #[inline]
    pub fn hit_point(&self, a: Vec2, b: Vec2) -> Vec2 {
        //! Hit location for the query ray `a`->`b`.
        a.lerp(b, self.t)
    }

    #[inline]
    pub fn hit_dist(&self, a: Vec2, b: Vec2) -> Fp {
        //! Distance from `a` to the hit along the query ray `a`->`b`.
        a.distance(b) * self.t
    }
}

impl Default for SegmentQueryInfo {
    fn default() -> SegmentQueryInfo {
        SegmentQueryInfo::MISS
    }
}

// ---------- Variant dispatch ---------- //

/// Per-variant geometry operations. `Shape` dispatches through
/// `ShapeKind`, which implements this by delegation; the variant structs
/// stay usable stand-alone.
pub trait ShapeGeometry {
    /// Recomputes cached world-space data for a rigid transform
    /// (translation `pos`, unit rotation vector `rot`; never scaled) and
    /// returns the new bounding box.
    fn cache_bb(&mut self, pos: Vec2, rot: Vec2) -> Aabb;

    /// Nearest boundary point to `p`. The `shape` field is left `None`;
    /// the base record stamps its id on.
    fn nearest_point(&self, p: Vec2) -> NearestPointInfo;

    /// First intersection of the ray `a`->`b` with the boundary, if any.
    fn segment_query(&self, a: Vec2, b: Vec2) -> Option<RayHit>;
}

/// Concrete shape payload.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    Circle(CircleShape),
    Segment(SegmentShape),
}

impl ShapeGeometry for ShapeKind {
    fn cache_bb(&mut self, pos: Vec2, rot: Vec2) -> Aabb {
        match self {
            ShapeKind::Circle(c) => c.cache_bb(pos, rot),
            ShapeKind::Segment(s) => s.cache_bb(pos, rot),
        }
    }

    fn nearest_point(&self, p: Vec2) -> NearestPointInfo {
        match self {
            ShapeKind::Circle(c) => c.nearest_point(p),
            ShapeKind::Segment(s) => s.nearest_point(p),
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2) -> Option<RayHit> {
        match self {
            ShapeKind::Circle(c) => c.segment_query(a, b),
            ShapeKind::Segment(s) => s.segment_query(a, b),
        }
    }
}

// ---------- Shape ---------- //

/// A collidable boundary rigidly attached to a body.
///
/// The cached bounding box is stale until the first transform update and
/// thereafter always matches the most recently supplied transform.
/// Dropping the value is destruction; no variant needs a separate
/// teardown hook. Detach the shape from any spatial index first.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    body: BodyId,
    kind: ShapeKind,
    bb: Aabb,
    active: bool,
    /// Surface elasticity, for the impulse solver.
    pub elasticity: Fp,
    /// Surface friction coefficient, for the impulse solver.
    pub friction: Fp,
    /// Narrow-phase dispatch tag.
    pub collision_type: CollisionType,
    /// Primary filtering group.
    pub group: Group,
    /// Secondary filtering group.
    pub group2: Group,
    /// Layer bitmask.
    pub layers: Layers,
    /// Opaque application tag; never interpreted.
    pub user_data: usize,
}

impl Shape {
    pub fn new(ids: &mut ShapeIdCounter, body: BodyId, kind: ShapeKind) -> Shape {
        Shape {
            id: ids.next_id(),
            body,
            kind,
            bb: Aabb::ZERO,
            active: false,
            elasticity: 0.0,
            friction: 0.0,
            collision_type: 0,
            group: NO_GROUP,
            group2: NO_GROUP,
            layers: ALL_LAYERS,
            user_data: 0,
        }
    }

    pub fn new_circle(ids: &mut ShapeIdCounter, body: BodyId, radius: Fp, offset: Vec2) -> Shape {
        Shape::new(ids, body, ShapeKind::Circle(CircleShape::new(radius, offset)))
    }

    pub fn new_segment(
        ids: &mut ShapeIdCounter,
        body: BodyId,
        a: Vec2,
        b: Vec2,
        radius: Fp,
    ) -> Shape {
        Shape::new(ids, body, ShapeKind::Segment(SegmentShape::new(a, b, radius)))
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Last-computed bounding box. Stale until the first `update`.
    #[inline]
    pub fn bb(&self) -> Aabb {
        self.bb
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Whether the shape is registered in a spatial index.
    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Registration flag, flipped by whichever owner inserts the shape
    /// into (or removes it from) a spatial index. While set, the body
    /// reference is locked.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Rebinds the shape to another body.
    ///
    /// # Panics
    ///
    /// While the shape is active: the index tracking it would silently
    /// keep a box computed from the old body.
    pub fn set_body(&mut self, body: BodyId) {
        assert!(
            !self.active,
            "cannot change the body of an active shape; remove it from its spatial index first"
        );
        self.body = body;
    }

    /// Recomputes cached world-space geometry for the given transform and
    /// returns the new bounding box. Identical transforms yield identical
    /// boxes.
    pub fn update(&mut self, pos: Vec2, rot: Vec2) -> Aabb {
        self.bb = self.kind.cache_bb(pos, rot);
        self.bb
    }

    /// `update` with the transform read from the owning body.
    pub fn cache_bb(&mut self, body: &Body) -> Aabb {
        debug_assert_eq!(body.id(), self.body, "cache_bb called with a foreign body");
        self.update(body.pos, body.rot())
    }

    /// Whether `p` lies strictly inside the shape.
    pub fn point_query(&self, p: Vec2) -> bool {
        self.nearest_point_query(p).distance < 0.0
    }

    pub fn nearest_point_query(&self, p: Vec2) -> NearestPointInfo {
        //! Closest boundary point, signed distance and outward gradient
        //! at `p`. Always well-formed, even on degenerate input.
        let mut info = self.kind.nearest_point(p);
        info.shape = Some(self.id);
        info
    }

    /// First hit of the ray `a`->`b` against the shape boundary.
    ///
    /// A ray starting inside the shape reports `t = 0` with the normal
    /// pointing from the nearest boundary point back toward `a` (zero when
    /// the two coincide exactly). A miss returns `SegmentQueryInfo::MISS`.
    pub fn segment_query(&self, a: Vec2, b: Vec2) -> SegmentQueryInfo {
        let nearest = self.kind.nearest_point(a);
        if nearest.distance <= 0.0 {
            return SegmentQueryInfo {
                shape: Some(self.id),
                t: 0.0,
                normal: geom::normalize_or_zero(a - nearest.point),
            };
        }
        match self.kind.segment_query(a, b) {
            Some(hit) => SegmentQueryInfo {
                shape: Some(self.id),
                t: hit.t,
                normal: hit.normal,
            },
            None => SegmentQueryInfo::MISS,
        }
    }

    // ---------- Variant accessors ---------- //

    pub fn as_circle(&self) -> Option<&CircleShape> {
        match &self.kind {
            ShapeKind::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> Option<&SegmentShape> {
        match &self.kind {
            ShapeKind::Segment(s) => Some(s),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// When the shape is not a circle.
    pub fn circle(&self) -> &CircleShape {
        match &self.kind {
            ShapeKind::Circle(c) => c,
            _ => panic!("shape is not a circle"),
        }
    }

    /// # Panics
    ///
    /// When the shape is not a segment.
    pub fn segment(&self) -> &SegmentShape {
        match &self.kind {
            ShapeKind::Segment(s) => s,
            _ => panic!("shape is not a segment"),
        }
    }

    /// Mutable circle access for local-geometry edits. The cached box is
    /// stale until the next `update`.
    ///
    /// # Panics
    ///
    /// When the shape is not a circle.
    pub fn circle_mut(&mut self) -> &mut CircleShape {
        match &mut self.kind {
            ShapeKind::Circle(c) => c,
            _ => panic!("shape is not a circle"),
        }
    }

    /// Mutable segment access for local-geometry edits. The cached box is
    /// stale until the next `update`.
    ///
    /// # Panics
    ///
    /// When the shape is not a segment.
    pub fn segment_mut(&mut self) -> &mut SegmentShape {
        match &mut self.kind {
            ShapeKind::Segment(s) => s,
            _ => panic!("shape is not a segment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_body() -> Body {
        Body::new(BodyId(0), Vec2::new(5.0, 0.0), 0.0)
    }

    #[test]
    fn ids_are_monotonic_and_resettable() {
        let mut ids = ShapeIdCounter::new();
        let body = BodyId(0);
        let a = Shape::new_circle(&mut ids, body, 1.0, Vec2::ZERO);
        let b = Shape::new_circle(&mut ids, body, 1.0, Vec2::ZERO);
        assert!(a.id() < b.id());

        ids.reset();
        let c = Shape::new_circle(&mut ids, body, 1.0, Vec2::ZERO);
        assert_eq!(c.id(), a.id());
    }

    #[test]
    fn construction_defaults() {
        let mut ids = ShapeIdCounter::new();
        let shape = Shape::new_circle(&mut ids, BodyId(3), 1.0, Vec2::ZERO);
        assert_eq!(shape.body(), BodyId(3));
        assert_eq!(shape.elasticity, 0.0);
        assert_eq!(shape.friction, 0.0);
        assert_eq!(shape.collision_type, 0);
        assert_eq!(shape.group, NO_GROUP);
        assert_eq!(shape.group2, NO_GROUP);
        assert_eq!(shape.layers, ALL_LAYERS);
        assert_eq!(shape.user_data, 0);
        assert!(!shape.active());
        assert_eq!(shape.bb(), Aabb::ZERO);
    }

    #[test]
    fn set_body_while_inactive() {
        let mut ids = ShapeIdCounter::new();
        let mut shape = Shape::new_circle(&mut ids, BodyId(0), 1.0, Vec2::ZERO);
        shape.set_body(BodyId(9));
        assert_eq!(shape.body(), BodyId(9));
    }

    #[test]
    #[should_panic(expected = "active shape")]
    fn set_body_while_active_faults() {
        let mut ids = ShapeIdCounter::new();
        let mut shape = Shape::new_circle(&mut ids, BodyId(0), 1.0, Vec2::ZERO);
        shape.set_active(true);
        shape.set_body(BodyId(1));
    }

    #[test]
    #[should_panic(expected = "not a segment")]
    fn wrong_variant_access_faults() {
        let mut ids = ShapeIdCounter::new();
        let shape = Shape::new_circle(&mut ids, BodyId(0), 1.0, Vec2::ZERO);
        shape.segment();
    }

    #[test]
    fn safe_variant_access() {
        let mut ids = ShapeIdCounter::new();
        let shape = Shape::new_circle(&mut ids, BodyId(0), 2.0, Vec2::ZERO);
        assert!(shape.as_circle().is_some());
        assert!(shape.as_segment().is_none());
        assert_eq!(shape.circle().radius(), 2.0);
    }

    #[test]
    fn blank_results() {
        let blank = NearestPointInfo::default();
        assert!(blank.shape.is_none());
        assert_eq!(blank.distance, Fp::INFINITY);

        let miss = SegmentQueryInfo::default();
        assert!(miss.shape.is_none());
        assert_eq!(miss.t, 1.0);
        // a "miss" hit point sits at the far end of the ray
        assert_eq!(miss.hit_point(Vec2::ZERO, Vec2::new(2.0, 0.0)), Vec2::new(2.0, 0.0));
        assert_eq!(miss.hit_dist(Vec2::ZERO, Vec2::new(2.0, 0.0)), 2.0);
    }

    #[test]
    fn circle_on_offset_body() {
        let mut ids = ShapeIdCounter::new();
        let body = test_body();
        let mut shape = Shape::new_circle(&mut ids, body.id(), 1.0, Vec2::ZERO);
        shape.cache_bb(&body);

        assert!(shape.point_query(Vec2::new(5.0, 0.5)));
        assert_abs_diff_eq!(
            shape.nearest_point_query(Vec2::new(5.0, 0.5)).distance,
            -0.5,
            epsilon = 1e-6
        );
        assert!(!shape.point_query(Vec2::new(7.0, 0.0)));

        let info = shape.nearest_point_query(Vec2::new(7.0, 0.0));
        assert_eq!(info.shape, Some(shape.id()));
        assert_abs_diff_eq!(info.distance, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(info.point.x, 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(info.point.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(info.gradient.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn ray_starting_inside_short_circuits() {
        let mut ids = ShapeIdCounter::new();
        let body = test_body();
        let mut shape = Shape::new_circle(&mut ids, body.id(), 1.0, Vec2::ZERO);
        shape.cache_bb(&body);

        let info = shape.segment_query(Vec2::new(5.0, 0.5), Vec2::new(5.0, 5.0));
        assert_eq!(info.shape, Some(shape.id()));
        assert_eq!(info.t, 0.0);
        // normal points from the boundary back to the ray origin
        assert_abs_diff_eq!(info.normal.y, -1.0, epsilon = 1e-6);
        assert_eq!(info.hit_point(Vec2::new(5.0, 0.5), Vec2::new(5.0, 5.0)), Vec2::new(5.0, 0.5));
    }

    #[test]
    fn ray_starting_on_boundary_degenerates_cleanly() {
        let mut ids = ShapeIdCounter::new();
        let body = test_body();
        let mut shape = Shape::new_circle(&mut ids, body.id(), 1.0, Vec2::ZERO);
        shape.cache_bb(&body);

        // (6, 0) is exactly the nearest boundary point to itself
        let info = shape.segment_query(Vec2::new(6.0, 0.0), Vec2::new(4.0, 0.0));
        assert_eq!(info.t, 0.0);
        assert_eq!(info.normal, Vec2::ZERO);
    }

    #[test]
    fn ray_miss_is_blank() {
        let mut ids = ShapeIdCounter::new();
        let body = test_body();
        let mut shape = Shape::new_circle(&mut ids, body.id(), 1.0, Vec2::ZERO);
        shape.cache_bb(&body);

        let info = shape.segment_query(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0));
        assert_eq!(info, SegmentQueryInfo::MISS);
    }

    #[test]
    fn update_is_idempotent() {
        let mut ids = ShapeIdCounter::new();
        let mut shape =
            Shape::new_segment(&mut ids, BodyId(0), Vec2::ZERO, Vec2::new(3.0, 4.0), 0.5);
        let rot = geom::rot_from_angle(0.7);
        let first = shape.update(Vec2::new(1.0, 2.0), rot);
        let second = shape.update(Vec2::new(1.0, 2.0), rot);
        assert_eq!(first, second);
        assert_eq!(shape.bb(), second);
    }
}
