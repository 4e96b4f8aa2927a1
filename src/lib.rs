//! 2D collision geometry core for a rigid-body simulation: circle and
//! thick-segment shapes rigidly attached to externally integrated bodies,
//! cached world-space bounding boxes, point / nearest-point / ray queries,
//! and a pluggable broad-phase index contract with a dynamic/static split.
//!
//! The crate is single-threaded by design: all shape and index mutation
//! happens from one simulation thread between discrete steps.

pub mod arena;
pub mod bb;
pub mod body;
pub mod geom;
pub mod index;
pub mod shape;

/// Scalar precision. `f32` by default, `f64` with the `f64` feature.
#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;

pub use arena::{ShapeArena, ShapeKey};
pub use bb::Aabb;
pub use body::{Body, BodyId};
pub use geom::{RayHit, GRADIENT_EPSILON};
pub use index::{
    collide_static, query_index, reindex_shape, FlatIndex, GridIndex, IndexObject, SpatialIndex,
};
pub use shape::{
    CircleShape, CollisionType, Group, Layers, NearestPointInfo, SegmentQueryInfo, SegmentShape,
    Shape, ShapeGeometry, ShapeId, ShapeIdCounter, ShapeKind, ALL_LAYERS, NO_GROUP,
};
