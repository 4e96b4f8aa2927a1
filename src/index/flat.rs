//! Brute-force reference backend.

use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::bb::Aabb;
use crate::Vec2;

use super::{IndexObject, SpatialIndex};

type Members<T> = IndexMap<T, Aabb, FnvBuildHasher>;

/// Linear-scan spatial index: a flat member table, every query walks it.
///
/// O(n) per query, O(1) per mutation. The behavioral baseline the other
/// backends are checked against, and a sensible choice for small, rarely
/// queried sets (a handful of static walls, say).
pub struct FlatIndex<T: IndexObject> {
    members: Members<T>,
    static_index: Option<Box<dyn SpatialIndex<T>>>,
}

impl<T: IndexObject> FlatIndex<T> {
    pub fn new() -> FlatIndex<T> {
        FlatIndex {
            members: Members::default(),
            static_index: None,
        }
    }

    /// Pairs a static half at construction; the association is one-time
    /// and immutable afterward.
    pub fn new_paired(static_index: Box<dyn SpatialIndex<T>>) -> FlatIndex<T> {
        FlatIndex {
            members: Members::default(),
            static_index: Some(static_index),
        }
    }
}

impl<T: IndexObject> Default for FlatIndex<T> {
    fn default() -> FlatIndex<T> {
        FlatIndex::new()
    }
}

impl<T: IndexObject> SpatialIndex<T> for FlatIndex<T> {
    fn insert(&mut self, obj: T, bb: Aabb) {
        let prev = self.members.insert(obj, bb);
        assert!(prev.is_none(), "object inserted into the index twice");
    }

    fn remove(&mut self, obj: T) {
        self.members.swap_remove(&obj);
    }

    fn reindex(&mut self, obj: T, bb: Aabb) {
        if let Some(slot) = self.members.get_mut(&obj) {
            *slot = bb;
        }
    }

    fn contains(&self, obj: T) -> bool {
        self.members.contains_key(&obj)
    }

    fn count(&self) -> usize {
        self.members.len()
    }

    fn each(&self, visitor: &mut dyn FnMut(T, Aabb)) {
        for (&obj, &bb) in self.members.iter() {
            visitor(obj, bb);
        }
    }

    fn query_bb(&self, bb: Aabb, visitor: &mut dyn FnMut(T)) {
        for (&obj, member) in self.members.iter() {
            if member.intersects(&bb) {
                visitor(obj);
            }
        }
    }

    fn query_point(&self, p: Vec2, visitor: &mut dyn FnMut(T)) {
        for (&obj, member) in self.members.iter() {
            if member.contains_point(p) {
                visitor(obj);
            }
        }
    }

    fn query_segment(&self, a: Vec2, b: Vec2, visitor: &mut dyn FnMut(T)) {
        for (&obj, member) in self.members.iter() {
            if member.line_test(a, b) {
                visitor(obj);
            }
        }
    }

    fn static_index(&self) -> Option<&dyn SpatialIndex<T>> {
        self.static_index.as_deref()
    }

    fn static_index_mut(&mut self) -> Option<&mut (dyn SpatialIndex<T> + 'static)> {
        self.static_index.as_deref_mut()
    }
}
