//! Scene graph nodes and their payload variants

use crate::foundation::math::Transform;
use crate::scene::camera::PerspectiveProjection;
use crate::scene::light::Light;
use crate::scene::registry::{GeometryHandle, MaterialHandle};

slotmap::new_key_type! {
    /// Stable identity of a node within a [`crate::scene::Scene`]
    pub struct NodeId;
}

bitflags::bitflags! {
    /// Layer membership mask used to match meshes against the active camera
    ///
    /// A mesh is drawn when its layers intersect the camera's layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderLayers: u32 {
        /// Default layer every node starts on
        const DEFAULT = 1;
    }
}

impl Default for RenderLayers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RenderLayers {
    /// Mask with only the given layer index (0..=31) set
    pub fn layer(index: u32) -> Self {
        Self::from_bits_retain(1 << index)
    }
}

/// Per-variant payload of a node
///
/// Replaces the deep `Mesh extends Object3D` style hierarchy with a tagged
/// variant that callers match on.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node with no renderable payload
    Group,

    /// Renderable payload: one geometry paired with one material
    Mesh {
        /// Geometry registry handle
        geometry: GeometryHandle,
        /// Material registry handle
        material: MaterialHandle,
    },

    /// Light source payload
    Light(Light),

    /// Camera payload holding projection parameters
    Camera(PerspectiveProjection),
}

/// A single entity in the scene graph
///
/// Parent/child links are managed exclusively by [`crate::scene::Scene`] so
/// the no-cycles and single-parent invariants cannot be broken from outside.
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional debug name
    pub name: Option<String>,

    /// Transform relative to the parent node
    pub local: Transform,

    /// Whether this node (and thereby its subtree) is rendered
    pub visible: bool,

    /// Render layer membership
    pub layers: RenderLayers,

    /// Payload variant
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            local: Transform::identity(),
            visible: true,
            layers: RenderLayers::default(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The parent this node is attached to, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node carries a renderable mesh payload
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }
}
