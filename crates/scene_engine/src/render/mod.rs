//! # Rendering System
//!
//! High-level rendering over an abstract backend. The layering mirrors the
//! window side: [`Renderer`] owns scene traversal, camera matrices, light
//! collection, and draw submission order, while everything that touches a
//! graphics API lives behind the [`RenderBackend`] trait. The engine never
//! talks to a backend directly.

pub mod backend;

pub use backend::{DrawCall, FrameContext, LightInstance, NullBackend, RenderBackend, RenderError};

use crate::foundation::math::Mat4;
use crate::scene::camera::{self, PerspectiveProjection};
use crate::scene::{NodeId, NodeKind, Scene};

/// High-level renderer submitting a scene to a backend
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    clear_color: [f32; 3],
}

impl Renderer {
    /// Create a renderer over the given backend
    pub fn new(backend: Box<dyn RenderBackend>, clear_color: [f32; 3]) -> Self {
        Self {
            backend,
            clear_color,
        }
    }

    /// Render one frame of `scene` as seen from the camera node `camera`
    ///
    /// Traverses visible nodes depth-first, composing world transforms on the
    /// way, and issues one draw call per visible mesh whose layers intersect
    /// the camera's. Lights are collected in the same pass and submitted
    /// before any draw.
    pub fn render(&mut self, scene: &Scene, camera: NodeId) -> Result<(), RenderError> {
        let camera_node = scene.node(camera).ok_or(RenderError::NoCamera)?;
        let NodeKind::Camera(ref projection) = camera_node.kind else {
            return Err(RenderError::NoCamera);
        };
        let projection: PerspectiveProjection = projection.clone();
        let camera_layers = camera_node.layers;

        let camera_world = scene
            .world_transform(camera)
            .ok_or(RenderError::NoCamera)?;
        let frame = FrameContext {
            view: camera::view_matrix(&camera_world),
            projection: projection.matrix(),
            camera_position: camera_world.position,
            clear_color: scene.background.unwrap_or(self.clear_color),
        };

        // Single traversal: lights first (they must be bound before draws),
        // meshes queued in visit order.
        let mut lights = Vec::new();
        let mut draws: Vec<(NodeId, Mat4)> = Vec::new();
        for (id, world) in scene.walk_visible(scene.root()) {
            let node = scene.node(id).ok_or(RenderError::MissingResource)?;
            match node.kind {
                NodeKind::Light(ref light) => lights.push(LightInstance {
                    light: light.clone(),
                    position: world.position,
                }),
                NodeKind::Mesh { .. } if node.layers.intersects(camera_layers) => {
                    draws.push((id, world.to_matrix()));
                }
                _ => {}
            }
        }

        self.backend.begin_frame(&frame)?;
        self.backend.submit_lights(&lights)?;
        for (id, model) in draws {
            let node = scene.node(id).ok_or(RenderError::MissingResource)?;
            let NodeKind::Mesh { geometry, material } = node.kind else {
                continue;
            };
            let geometry = scene.geometry(geometry).ok_or(RenderError::MissingResource)?;
            let material = scene.material(material).ok_or(RenderError::MissingResource)?;
            self.backend.draw_mesh(&DrawCall {
                geometry,
                material,
                model,
            })?;
        }
        self.backend.end_frame()
    }
}
