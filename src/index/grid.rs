//! Uniform hash-grid backend.

use fnv::{FnvBuildHasher, FnvHashMap, FnvHashSet};
use indexmap::IndexMap;
use log::trace;

use crate::bb::Aabb;
use crate::{Fp, Vec2};

use super::{IndexObject, SpatialIndex};

type Members<T> = IndexMap<T, Aabb, FnvBuildHasher>;
type Cell = (i64, i64);

/// Uniform grid over fnv-hashed cell coordinates.
///
/// Objects register in every cell their box overlaps; queries collect the
/// candidate cells, de-duplicate, and verify against the exact member box
/// before visiting. `cell_size` should be on the order of a typical
/// shape's diameter, since grossly undersized cells register large
/// objects in many buckets.
pub struct GridIndex<T: IndexObject> {
    cell_size: Fp,
    cells: FnvHashMap<Cell, Vec<T>>,
    members: Members<T>,
    static_index: Option<Box<dyn SpatialIndex<T>>>,
}

impl<T: IndexObject> GridIndex<T> {
    /// # Panics
    ///
    /// On a non-positive `cell_size`.
    pub fn new(cell_size: Fp) -> GridIndex<T> {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        GridIndex {
            cell_size,
            cells: FnvHashMap::default(),
            members: Members::default(),
            static_index: None,
        }
    }

    /// Pairs a static half at construction; the association is one-time
    /// and immutable afterward.
    pub fn new_paired(cell_size: Fp, static_index: Box<dyn SpatialIndex<T>>) -> GridIndex<T> {
        let mut index = GridIndex::new(cell_size);
        index.static_index = Some(static_index);
        index
    }

    #[inline]
    pub fn cell_size(&self) -> Fp {
        self.cell_size
    }

    #[inline]
    fn cell_range(&self, bb: Aabb) -> (i64, i64, i64, i64) {
        let x0 = (bb.min.x / self.cell_size).floor() as i64;
        let y0 = (bb.min.y / self.cell_size).floor() as i64;
        let x1 = (bb.max.x / self.cell_size).floor() as i64;
        let y1 = (bb.max.y / self.cell_size).floor() as i64;
        (x0, y0, x1, y1)
    }

    fn register(&mut self, obj: T, bb: Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(bb);
        for x in x0..=x1 {
            for y in y0..=y1 {
                self.cells.entry((x, y)).or_insert_with(Vec::new).push(obj);
            }
        }
    }

    fn deregister(&mut self, obj: T, bb: Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(bb);
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(list) = self.cells.get_mut(&(x, y)) {
                    list.retain(|&o| o != obj);
                    if list.is_empty() {
                        self.cells.remove(&(x, y));
                    }
                }
            }
        }
    }

    fn candidates(&self, bb: Aabb, f: &mut dyn FnMut(T, &Aabb)) {
        //! Calls `f` once per distinct member registered in any cell the
        //! box overlaps, passing the member's exact box for rejection.
        let mut seen: FnvHashSet<T> = FnvHashSet::default();
        let (x0, y0, x1, y1) = self.cell_range(bb);
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(list) = self.cells.get(&(x, y)) {
                    for &obj in list {
                        if seen.insert(obj) {
                            if let Some(member) = self.members.get(&obj) {
                                f(obj, member);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl<T: IndexObject> SpatialIndex<T> for GridIndex<T> {
    fn insert(&mut self, obj: T, bb: Aabb) {
        let prev = self.members.insert(obj, bb);
        assert!(prev.is_none(), "object inserted into the index twice");
        self.register(obj, bb);
        trace!(
            "grid: {} members over {} occupied cells",
            self.members.len(),
            self.cells.len()
        );
    }

    fn remove(&mut self, obj: T) {
        if let Some(bb) = self.members.swap_remove(&obj) {
            self.deregister(obj, bb);
        }
    }

    fn reindex(&mut self, obj: T, bb: Aabb) {
        let old = match self.members.get(&obj) {
            Some(&old) => old,
            None => return,
        };
        self.deregister(obj, old);
        self.register(obj, bb);
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
        self.candidates(bb, &mut |obj, member| {
            if member.intersects(&bb) {
                visitor(obj);
            }
        });
    }

    fn query_point(&self, p: Vec2, visitor: &mut dyn FnMut(T)) {
        self.candidates(Aabb { min: p, max: p }, &mut |obj, member| {
            if member.contains_point(p) {
                visitor(obj);
            }
        });
    }

    fn query_segment(&self, a: Vec2, b: Vec2, visitor: &mut dyn FnMut(T)) {
        // conservative: candidates come from the cells of the segment's
        // box, the exact SAT test prunes them
        self.candidates(Aabb::new_safe(a, b), &mut |obj, member| {
            if member.line_test(a, b) {
                visitor(obj);
            }
        });
    }

    fn static_index(&self) -> Option<&dyn SpatialIndex<T>> {
        self.static_index.as_deref()
    }

    fn static_index_mut(&mut self) -> Option<&mut (dyn SpatialIndex<T> + 'static)> {
        self.static_index.as_deref_mut()
    }
}
