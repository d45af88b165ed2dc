//! # Scene Graph
//!
//! The retained-mode scene model: an ordered forest of nodes stored in an
//! arena, plus the geometry/material registries that mesh nodes reference by
//! handle. Nodes carry a local transform and a tagged payload
//! ([`NodeKind`]) instead of an inheritance hierarchy; consumers dispatch by
//! pattern matching.
//!
//! Graph mutation, traversal, and world-transform composition all live on
//! [`Scene`]. Traversal is lazy and depth-first in child-insertion order, and
//! world transforms are recomputed per traversal; there is no cached state to
//! invalidate.

pub mod camera;
pub mod geometry;
pub mod graph;
pub mod light;
pub mod material;
pub mod node;
pub mod registry;

pub use camera::PerspectiveProjection;
pub use geometry::{Geometry, Vertex};
pub use graph::{Scene, SceneError};
pub use light::{Light, LightKind};
pub use material::{hex_color, Material, ShadingModel, Side};
pub use node::{Node, NodeId, NodeKind, RenderLayers};
pub use registry::{GeometryHandle, MaterialHandle};
