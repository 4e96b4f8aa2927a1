//! Pooled shape storage with stable handles.

use log::debug;
use slotmap::SlotMap;

use crate::shape::Shape;

slotmap::new_key_type! {
    /// Stable handle into a `ShapeArena`. Generational: the key of a
    /// removed shape never resolves to whatever reuses its slot.
    pub struct ShapeKey;
}

/// Slot-recycling storage for shapes.
///
/// Optional: shapes are plain values and standard ownership works fine;
/// an arena keeps many shapes contiguous and hands out keys an owning
/// space can store in place of borrows. Like every mutation path in this
/// crate, it is meant for a single simulation thread.
#[derive(Default)]
pub struct ShapeArena {
    slots: SlotMap<ShapeKey, Shape>,
}

impl ShapeArena {
    pub fn new() -> ShapeArena {
        ShapeArena {
            slots: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, shape: Shape) -> ShapeKey {
        if self.slots.len() == self.slots.capacity() {
            debug!("shape arena growing past {} slots", self.slots.capacity());
        }
        self.slots.insert(shape)
    }

    #[inline]
    pub fn get(&self, key: ShapeKey) -> Option<&Shape> {
        self.slots.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ShapeKey) -> Option<&mut Shape> {
        self.slots.get_mut(key)
    }

    /// Releases the slot for reuse and hands the shape back.
    pub fn remove(&mut self, key: ShapeKey) -> Option<Shape> {
        self.slots.remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeKey, &Shape)> {
        self.slots.iter()
    }
}
