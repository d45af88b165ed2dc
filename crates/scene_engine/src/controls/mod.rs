//! Per-frame controllers
//!
//! Controllers are registered with the engine, fed window events as they are
//! dispatched, and ticked once per loop iteration before the scene is
//! rendered. A controller failure is logged and the frame continues; it never
//! aborts the loop.

pub mod orbit;

use thiserror::Error;

use crate::scene::Scene;
use crate::window::WindowEvent;

pub use orbit::OrbitControls;

/// Errors surfaced by per-frame controllers and frame callbacks
#[derive(Error, Debug)]
pub enum FrameError {
    /// Free-form controller or callback failure
    #[error("{0}")]
    Custom(String),
}

/// A per-frame mutator driven by the render loop
pub trait FrameController {
    /// Receive a window event dispatched during the poll phase
    fn handle_event(&mut self, _event: &WindowEvent) {}

    /// Advance the controller by `delta_time` seconds
    ///
    /// Runs once per loop iteration, before traversal and draw submission.
    fn update(&mut self, scene: &mut Scene, delta_time: f32) -> Result<(), FrameError>;
}
