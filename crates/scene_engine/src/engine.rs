//! Core engine implementation
//!
//! The engine owns the scene, the renderer, and the window collaborator, and
//! drives the single-threaded frame loop. Each iteration performs, in strict
//! order: poll events, run controllers and the frame callback, traverse the
//! scene, submit draws, present. Close requests (from the user, from
//! [`crate::window::CloseSignal`], or from [`Engine::request_close`]) are
//! observed at the top of the next iteration, so cancellation latency is at
//! most one frame.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::controls::{FrameController, FrameError};
use crate::foundation::time::Timer;
use crate::render::{RenderBackend, RenderError, Renderer};
use crate::scene::{NodeId, NodeKind, Scene};
use crate::window::{Window, WindowError, WindowEvent};

/// Render loop lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame has been requested yet
    Idle,

    /// The loop is iterating
    Running,

    /// A close was observed; teardown is in progress
    Closing,

    /// The loop has finished and the window is released
    Closed,
}

/// Main engine struct
///
/// Coordinates the scene graph, renderer, window, and per-frame controllers.
pub struct Engine {
    window: Box<dyn Window>,
    renderer: Renderer,
    scene: Scene,
    active_camera: Option<NodeId>,
    controllers: Vec<Box<dyn FrameController>>,
    timer: Timer,
    state: LoopState,
    on_close: Option<Box<dyn FnOnce()>>,
    event_buffer: Vec<WindowEvent>,
}

impl Engine {
    /// Create an engine over a window and a rendering backend
    ///
    /// Both collaborators are created by the host; a failed window creation
    /// therefore aborts before the engine (or any loop iteration) exists.
    pub fn new(
        config: &EngineConfig,
        window: Box<dyn Window>,
        backend: Box<dyn RenderBackend>,
    ) -> Self {
        log::info!("initializing engine...");
        Self {
            window,
            renderer: Renderer::new(backend, config.renderer.clear_color),
            scene: Scene::new(),
            active_camera: None,
            controllers: Vec::new(),
            timer: Timer::new(),
            state: LoopState::Idle,
            on_close: None,
            event_buffer: Vec::new(),
        }
    }

    /// Get the scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get mutable access to the scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Set the camera node used for rendering
    pub fn set_active_camera(&mut self, camera: NodeId) {
        self.active_camera = Some(camera);
    }

    /// Register a per-frame controller
    pub fn add_controller(&mut self, controller: Box<dyn FrameController>) {
        self.controllers.push(controller);
    }

    /// Register a callback to run once when the loop closes
    pub fn set_on_close(&mut self, callback: impl FnOnce() + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the loop has observed (or completed) a close
    pub fn should_close(&self) -> bool {
        matches!(self.state, LoopState::Closing | LoopState::Closed) || self.window.should_close()
    }

    /// Ask the loop to stop; honored at the top of the next iteration
    pub fn request_close(&mut self) {
        log::info!("engine shutdown requested");
        self.window.close();
    }

    /// Current window size in pixels
    pub fn window_size(&self) -> (u32, u32) {
        self.window.size()
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Run the loop until the window closes, invoking `callback` every frame
    ///
    /// This is the canonical way to drive the engine. The callback receives
    /// the scene and the seconds elapsed since the previous frame; its errors
    /// are logged and the loop continues. Renderer and presentation errors end
    /// the loop and propagate.
    pub fn animate<F>(&mut self, mut callback: F) -> Result<(), EngineError>
    where
        F: FnMut(&mut Scene, f32) -> Result<(), FrameError>,
    {
        log::info!("starting main loop...");
        while self.frame_with(&mut callback)? {}
        log::info!("engine shutdown complete");
        Ok(())
    }

    /// Run a single loop iteration without a frame callback
    ///
    /// Enables the manual `while !engine.should_close()` driving style.
    /// Returns `false` once the loop has closed.
    pub fn frame(&mut self) -> Result<bool, EngineError> {
        self.frame_with(&mut |_, _| Ok(()))
    }

    /// Run a single loop iteration with a frame callback
    pub fn frame_with<F>(&mut self, callback: &mut F) -> Result<bool, EngineError>
    where
        F: FnMut(&mut Scene, f32) -> Result<(), FrameError>,
    {
        match self.state {
            LoopState::Closed => return Ok(false),
            LoopState::Closing => {
                self.finish();
                return Ok(false);
            }
            LoopState::Idle => {
                log::debug!("render loop entering Running state");
                self.state = LoopState::Running;
            }
            LoopState::Running => {}
        }

        // (1) Poll pending window events and dispatch them.
        let mut events = std::mem::take(&mut self.event_buffer);
        events.clear();
        self.window.poll_events(&mut events);
        for event in &events {
            match *event {
                WindowEvent::CloseRequested => {
                    log::info!("window close requested");
                    self.window.close();
                    self.state = LoopState::Closing;
                }
                WindowEvent::Resized { width, height } => {
                    log::debug!("window resized to {}x{}", width, height);
                    self.update_camera_aspect(width, height);
                }
                _ => {}
            }
            for controller in &mut self.controllers {
                controller.handle_event(event);
            }
        }
        self.event_buffer = events;

        // Cancellation is cooperative: a close from any source is honored
        // here, before the frame body runs.
        if self.state == LoopState::Closing || self.window.should_close() {
            self.finish();
            return Ok(false);
        }

        // (2) Advance controllers and the user callback.
        self.timer.update();
        let delta_time = self.timer.delta_time();
        for controller in &mut self.controllers {
            if let Err(e) = controller.update(&mut self.scene, delta_time) {
                log::error!("controller failed, skipping it this frame: {}", e);
            }
        }
        if let Err(e) = callback(&mut self.scene, delta_time) {
            log::error!("frame callback failed, continuing: {}", e);
        }

        // (3) + (4) Traverse the graph and submit draw calls.
        let camera = match self.active_camera {
            Some(camera) => camera,
            None => return self.abort_frame(RenderError::NoCamera.into()),
        };
        if let Err(e) = self.renderer.render(&self.scene, camera) {
            return self.abort_frame(e.into());
        }

        // (5) Present the frame.
        if let Err(e) = self.window.swap_buffers() {
            return self.abort_frame(e.into());
        }

        Ok(true)
    }

    fn update_camera_aspect(&mut self, width: u32, height: u32) {
        if let Some(camera) = self.active_camera {
            if let Some(node) = self.scene.node_mut(camera) {
                if let NodeKind::Camera(ref mut projection) = node.kind {
                    projection.set_aspect(width, height);
                }
            }
        }
    }

    /// Renderer/presentation failures are fatal: close and propagate.
    fn abort_frame(&mut self, error: EngineError) -> Result<bool, EngineError> {
        log::error!("fatal frame error, shutting down: {}", error);
        self.state = LoopState::Closing;
        self.finish();
        Err(error)
    }

    /// Closing → window release → on-close callback → Closed.
    fn finish(&mut self) {
        if self.state == LoopState::Closed {
            return;
        }
        self.state = LoopState::Closing;
        self.window.close();
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        self.state = LoopState::Closed;
        log::info!("render loop closed after {} frames", self.timer.frame_count());
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // Window release is guaranteed even when the loop never finished.
        if self.state != LoopState::Closed {
            self.window.close();
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rendering error, fatal to the loop
    #[error("rendering error: {0}")]
    Render(#[from] RenderError),

    /// Window error, fatal to the loop
    #[error("window error: {0}")]
    Window(#[from] WindowError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::{DrawCall, FrameContext, LightInstance};
    use crate::scene::{Geometry, Light, Material, PerspectiveProjection};
    use crate::window::HeadlessWindow;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend counting frame submissions across the loop
    struct CountingBackend {
        renders: Arc<AtomicUsize>,
        draws: Arc<AtomicUsize>,
    }

    impl RenderBackend for CountingBackend {
        fn begin_frame(&mut self, _frame: &FrameContext) -> Result<(), RenderError> {
            Ok(())
        }

        fn submit_lights(&mut self, _lights: &[LightInstance]) -> Result<(), RenderError> {
            Ok(())
        }

        fn draw_mesh(&mut self, _call: &DrawCall<'_>) -> Result<(), RenderError> {
            self.draws.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), RenderError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Backend whose context dies on the given frame
    struct FailingBackend {
        fail_on: u64,
        frame: u64,
    }

    impl RenderBackend for FailingBackend {
        fn begin_frame(&mut self, _frame: &FrameContext) -> Result<(), RenderError> {
            self.frame += 1;
            if self.frame >= self.fail_on {
                return Err(RenderError::ContextLost("test context destroyed".into()));
            }
            Ok(())
        }

        fn submit_lights(&mut self, _lights: &[LightInstance]) -> Result<(), RenderError> {
            Ok(())
        }

        fn draw_mesh(&mut self, _call: &DrawCall<'_>) -> Result<(), RenderError> {
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn build_demo_engine(backend: Box<dyn RenderBackend>) -> (Engine, crate::window::CloseSignal) {
        let config = EngineConfig::default();
        let window = HeadlessWindow::create(&config.window).unwrap();
        let signal = window.close_signal();
        let mut engine = Engine::new(&config, Box::new(window), backend);

        let scene = engine.scene_mut();
        let geometry = scene.add_geometry(Geometry::cube(1.0));
        let material = scene.add_material(Material::new().with_hex_color(0x00FF00));
        let mesh = scene.spawn_mesh(geometry, material);
        let light = scene.spawn_light(Light::ambient(0.5));
        let camera = scene.spawn_camera(PerspectiveProjection::default());
        scene.add(scene.root(), mesh).unwrap();
        scene.add(scene.root(), light).unwrap();
        scene.add(scene.root(), camera).unwrap();
        scene.set_position(camera, Vec3::new(0.0, 0.0, 5.0));
        engine.set_active_camera(camera);

        (engine, signal)
    }

    #[test]
    fn test_three_iterations_three_renders_then_close() {
        let renders = Arc::new(AtomicUsize::new(0));
        let draws = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            renders: Arc::clone(&renders),
            draws: Arc::clone(&draws),
        };
        let (mut engine, signal) = build_demo_engine(Box::new(backend));

        assert_eq!(engine.state(), LoopState::Idle);
        assert!(!engine.should_close());

        let mut frames = 0u32;
        engine
            .animate(move |_scene, _dt| {
                frames += 1;
                if frames == 3 {
                    // External close, observed at the next iteration boundary.
                    signal.request_close();
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(renders.load(Ordering::SeqCst), 3);
        assert_eq!(draws.load(Ordering::SeqCst), 3);
        assert_eq!(engine.state(), LoopState::Closed);
        assert!(engine.should_close());
    }

    #[test]
    fn test_close_before_first_frame_renders_nothing() {
        let renders = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            renders: Arc::clone(&renders),
            draws: Arc::new(AtomicUsize::new(0)),
        };
        let (mut engine, signal) = build_demo_engine(Box::new(backend));

        signal.request_close();
        engine.animate(|_, _| Ok(())).unwrap();

        assert_eq!(renders.load(Ordering::SeqCst), 0);
        assert_eq!(engine.state(), LoopState::Closed);
    }

    #[test]
    fn test_on_close_callback_runs_once() {
        let renders = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            renders: Arc::clone(&renders),
            draws: Arc::new(AtomicUsize::new(0)),
        };
        let (mut engine, signal) = build_demo_engine(Box::new(backend));

        let closed = Rc::new(Cell::new(0u32));
        let closed_flag = Rc::clone(&closed);
        engine.set_on_close(move || closed_flag.set(closed_flag.get() + 1));

        signal.request_close();
        engine.animate(|_, _| Ok(())).unwrap();
        // A second frame request after Closed is a no-op.
        assert!(!engine.frame().unwrap());

        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_renderer_error_aborts_loop() {
        let backend = FailingBackend {
            fail_on: 2,
            frame: 0,
        };
        let (mut engine, _signal) = build_demo_engine(Box::new(backend));

        let closed = Rc::new(Cell::new(false));
        let closed_flag = Rc::clone(&closed);
        engine.set_on_close(move || closed_flag.set(true));

        let result = engine.animate(|_, _| Ok(()));
        assert!(matches!(
            result,
            Err(EngineError::Render(RenderError::ContextLost(_)))
        ));
        // The loop closed and released the window despite the error.
        assert_eq!(engine.state(), LoopState::Closed);
        assert!(closed.get());
    }

    #[test]
    fn test_frame_callback_error_is_not_fatal() {
        let renders = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            renders: Arc::clone(&renders),
            draws: Arc::new(AtomicUsize::new(0)),
        };
        let (mut engine, signal) = build_demo_engine(Box::new(backend));

        let mut frames = 0u32;
        engine
            .animate(move |_, _| {
                frames += 1;
                if frames == 2 {
                    signal.request_close();
                }
                Err(FrameError::Custom("controller hiccup".into()))
            })
            .unwrap();

        // Both frames rendered even though the callback failed each time.
        assert_eq!(renders.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_camera_is_a_render_error() {
        let config = EngineConfig::default();
        let window = HeadlessWindow::create(&config.window).unwrap();
        let mut engine = Engine::new(
            &config,
            Box::new(window),
            Box::new(crate::render::NullBackend::new()),
        );

        let result = engine.frame();
        assert!(matches!(
            result,
            Err(EngineError::Render(RenderError::NoCamera))
        ));
        assert_eq!(engine.state(), LoopState::Closed);
    }

    #[test]
    fn test_resize_updates_active_camera_aspect() {
        let config = EngineConfig::default();
        let mut window = HeadlessWindow::create(&config.window).unwrap();
        window.push_event(WindowEvent::Resized {
            width: 1600,
            height: 800,
        });
        let signal = window.close_signal();
        let mut engine = Engine::new(
            &config,
            Box::new(window),
            Box::new(crate::render::NullBackend::new()),
        );
        let camera = {
            let scene = engine.scene_mut();
            let camera = scene.spawn_camera(PerspectiveProjection::default());
            scene.add(scene.root(), camera).unwrap();
            scene.set_position(camera, Vec3::new(0.0, 0.0, 5.0));
            camera
        };
        engine.set_active_camera(camera);

        assert!(engine.frame().unwrap());
        signal.request_close();
        assert!(!engine.frame().unwrap());

        let node = engine.scene().node(camera).unwrap();
        let NodeKind::Camera(ref projection) = node.kind else {
            panic!("camera node lost its payload");
        };
        assert!((projection.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_timed_close_from_auxiliary_thread() {
        let renders = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            renders: Arc::clone(&renders),
            draws: Arc::new(AtomicUsize::new(0)),
        };
        let (mut engine, signal) = build_demo_engine(Box::new(backend));

        // The one permitted auxiliary thread: it only touches the close flag.
        let aux = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            signal.request_close();
        });

        engine.animate(|_, _| Ok(())).unwrap();
        aux.join().unwrap();

        assert_eq!(engine.state(), LoopState::Closed);
        assert!(renders.load(Ordering::SeqCst) > 0);
    }
}
