//! # Scene Engine
//!
//! A retained-mode 3D scene graph with a single-threaded frame loop.
//!
//! The library provides the core a host rendering stack builds on: an ordered
//! forest of nodes (meshes, lights, cameras) with handle-based geometry and
//! material registries, a perspective camera model, an orbit controller, and
//! a render loop that drives a window collaborator and submits draw calls to
//! a rendering backend collaborator. Both collaborators sit behind traits;
//! the GPU and the OS window are deliberately out of scope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let window = HeadlessWindow::create(&config.window)?;
//!     let mut engine = Engine::new(&config, Box::new(window), Box::new(NullBackend::new()));
//!
//!     let scene = engine.scene_mut();
//!     let geometry = scene.add_geometry(Geometry::cube(1.0));
//!     let material = scene.add_material(Material::new().with_hex_color(0x00FF00));
//!     let cube = scene.spawn_mesh(geometry, material);
//!     scene.add(scene.root(), cube)?;
//!
//!     let camera = scene.spawn_camera(PerspectiveProjection::default());
//!     scene.add(scene.root(), camera)?;
//!     scene.set_position(camera, Vec3::new(0.0, 0.0, 5.0));
//!     engine.set_active_camera(camera);
//!
//!     engine.animate(|_scene, _dt| Ok(()))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod controls;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod window;

mod engine;

pub use engine::{Engine, EngineError, LoopState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{EngineConfig, RendererConfig, WindowConfig},
        controls::{FrameController, FrameError, OrbitControls},
        foundation::{
            math::{Mat4, Quat, Transform, Vec2, Vec3},
            time::Timer,
        },
        render::{NullBackend, RenderBackend, RenderError, Renderer},
        scene::{
            Geometry, Light, Material, NodeId, NodeKind, PerspectiveProjection, Scene, SceneError,
        },
        window::{CloseSignal, HeadlessWindow, Window, WindowError, WindowEvent},
        Engine, EngineError, LoopState,
    };
}
