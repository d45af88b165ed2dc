//! Backend abstraction for draw submission
//!
//! The backend is an external collaborator: it receives camera matrices,
//! lights, and one draw call per visible mesh, and mutates GPU or other
//! presentation state as a side effect. A backend whose graphics context has
//! become invalid reports [`RenderError::ContextLost`], which is fatal to the
//! frame and ends the loop.

use thiserror::Error;

use crate::foundation::math::{Mat4, Vec3};
use crate::scene::{Geometry, Light, Material};

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The graphics context is invalid (e.g. window destroyed mid-call)
    #[error("graphics context lost: {0}")]
    ContextLost(String),

    /// The node passed as camera does not resolve to a live camera node
    #[error("active camera is missing or not a camera node")]
    NoCamera,

    /// A mesh referenced a geometry or material that is not registered
    #[error("mesh references an unregistered geometry or material")]
    MissingResource,
}

/// Per-frame camera and clear state handed to the backend
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// View matrix of the active camera
    pub view: Mat4,

    /// Projection matrix of the active camera
    pub projection: Mat4,

    /// Camera position in world space
    pub camera_position: Vec3,

    /// Clear color for this frame
    pub clear_color: [f32; 3],
}

/// A light together with its world-space position
#[derive(Debug, Clone)]
pub struct LightInstance {
    /// The light payload
    pub light: Light,

    /// World position of the owning node
    pub position: Vec3,
}

/// One draw submission: geometry, material, and model matrix
#[derive(Debug)]
pub struct DrawCall<'a> {
    /// Geometry to draw
    pub geometry: &'a Geometry,

    /// Material state to draw with
    pub material: &'a Material,

    /// World (model) matrix of the mesh node
    pub model: Mat4,
}

/// Draw-submission interface implemented by rendering backends
pub trait RenderBackend {
    /// Start a frame with the given camera and clear state
    fn begin_frame(&mut self, frame: &FrameContext) -> Result<(), RenderError>;

    /// Provide the lights collected for this frame, before any draw call
    fn submit_lights(&mut self, lights: &[LightInstance]) -> Result<(), RenderError>;

    /// Record one mesh draw
    fn draw_mesh(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError>;

    /// Finish the frame and hand it to presentation
    fn end_frame(&mut self) -> Result<(), RenderError>;
}

/// Backend that discards all submissions
///
/// Useful for headless runs where the scene and loop behavior matter but no
/// image is produced.
#[derive(Debug, Default)]
pub struct NullBackend {
    frames: u64,
}

impl NullBackend {
    /// Create a null backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames submitted so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for NullBackend {
    fn begin_frame(&mut self, _frame: &FrameContext) -> Result<(), RenderError> {
        Ok(())
    }

    fn submit_lights(&mut self, _lights: &[LightInstance]) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw_mesh(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError> {
        log::trace!(
            "null backend: draw {} triangles",
            call.geometry.triangle_count()
        );
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.frames += 1;
        Ok(())
    }
}
