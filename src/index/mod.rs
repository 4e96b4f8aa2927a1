//! Broad-phase spatial index: the backend contract, the dynamic/static
//! bridge, and the glue that pushes freshly transformed shapes back into
//! whichever backend tracks them.

pub mod flat;
pub mod grid;

pub use flat::FlatIndex;
pub use grid::GridIndex;

use std::hash::Hash;

use crate::bb::Aabb;
use crate::body::Body;
use crate::shape::{Shape, ShapeId};
use crate::Vec2;

/// Anything a spatial index can track: a small copyable handle.
pub trait IndexObject: Copy + Eq + Hash + 'static {}
impl<T: Copy + Eq + Hash + 'static> IndexObject for T {}

/// Contract every broad-phase backend satisfies.
///
/// A backend maps objects to their last-supplied bounding boxes and
/// answers conservative candidate queries; exact narrow-phase testing is
/// the caller's concern. Mutation and traversal must not be interleaved;
/// everything runs on the one simulation thread, between steps.
///
/// A backend may be paired with one static index at construction. The
/// pairing is one-time: the static half is owned by the dynamic index and
/// reachable only through the accessors, so associating the same static
/// index with a second dynamic one is unrepresentable.
pub trait SpatialIndex<T: IndexObject> {
    /// Starts tracking `obj` under `bb`.
    ///
    /// # Panics
    ///
    /// If `obj` is already tracked.
    fn insert(&mut self, obj: T, bb: Aabb);

    /// Stops tracking `obj`. Untracked objects are ignored.
    fn remove(&mut self, obj: T);

    /// Replaces `obj`'s box after movement. Untracked objects are
    /// ignored.
    fn reindex(&mut self, obj: T, bb: Aabb);

    fn contains(&self, obj: T) -> bool;

    fn count(&self) -> usize;

    /// Visits every member once with its current box. Order is
    /// unspecified but stable across a single traversal.
    fn each(&self, visitor: &mut dyn FnMut(T, Aabb));

    /// Visits members whose boxes touch `bb`.
    fn query_bb(&self, bb: Aabb, visitor: &mut dyn FnMut(T));

    /// Visits members whose boxes contain `p`.
    fn query_point(&self, p: Vec2, visitor: &mut dyn FnMut(T));

    /// Visits members whose boxes the segment `a`->`b` passes through.
    fn query_segment(&self, a: Vec2, b: Vec2, visitor: &mut dyn FnMut(T));

    /// Static half paired at construction, if any.
    fn static_index(&self) -> Option<&dyn SpatialIndex<T>>;

    fn static_index_mut(&mut self) -> Option<&mut (dyn SpatialIndex<T> + 'static)>;

    /// Candidate pairs between this index and its paired static half:
    /// every member is queried against the static geometry under its
    /// current box. Invokes nothing while the static half is empty, so
    /// immobile geometry costs nothing until it exists.
    fn collide_paired(&self, visitor: &mut dyn FnMut(T, T)) {
        if let Some(st) = self.static_index() {
            if st.count() > 0 {
                self.each(&mut |obj, bb| st.query_bb(bb, &mut |other| visitor(obj, other)));
            }
        }
    }
}

/// Candidate pairs between two independent indices: each member of `a` is
/// queried against `b` under its current box.
pub fn query_index<T: IndexObject>(
    a: &dyn SpatialIndex<T>,
    b: &dyn SpatialIndex<T>,
    visitor: &mut dyn FnMut(T, T),
) {
    a.each(&mut |obj, bb| b.query_bb(bb, &mut |other| visitor(obj, other)));
}

/// Dynamic-vs-static bridge for an unpaired pair of indices. Static
/// geometry participates in collision without ever being re-inserted into
/// the dynamic structure; the price is one extra query per dynamic member.
/// Invokes nothing when `static_index` is empty, whatever `dynamic` holds.
pub fn collide_static<T: IndexObject>(
    dynamic: &dyn SpatialIndex<T>,
    static_index: &dyn SpatialIndex<T>,
    visitor: &mut dyn FnMut(T, T),
) {
    if static_index.count() > 0 {
        query_index(dynamic, static_index, visitor);
    }
}

/// Recomputes `shape`'s box from its body and pushes it into the backend
/// tracking it: the per-step handoff from integration to broad phase.
pub fn reindex_shape(index: &mut dyn SpatialIndex<ShapeId>, shape: &mut Shape, body: &Body) {
    let bb = shape.cache_bb(body);
    index.reindex(shape.id(), bb);
}
