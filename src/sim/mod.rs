//! Collision simulation module
//!
//! Everything here is pure, single-threaded and deterministic:
//! - Stable iteration order (by shape handle)
//! - Detection for a step completes before any correction is applied
//! - Events are queued, never delivered while the registry is being walked

pub mod geometry;
pub mod overlap;
pub mod resolve;
pub mod sat;
pub mod scene;
pub mod shape;
pub mod step;
pub mod world;

pub use geometry::{Projection, centroid, edge_normals, project};
pub use overlap::{OverlapEvent, OverlapKind, OverlapPair, OverlapTracker};
pub use resolve::{
    Correction, resolve_circle_pair, resolve_circle_polygon, resolve_polygon_pair,
};
pub use sat::{Contact, circle_circle, circle_polygon, detect, polygon_polygon};
pub use scene::random_scene;
pub use shape::{Circle, ConvexPolygon, ResponsePolicy, Shape, ShapeKind, Transform2};
pub use step::{StepSummary, step};
pub use world::{Deferred, OverlapListener, ShapeHandle, World};
