//! Orbit camera controller
//!
//! Maintains spherical coordinates around a target point, fed by pointer drag
//! and scroll deltas, and rewrites the camera node's transform once per frame.
//! All state lives in the struct; nothing persists across runs.

use crate::controls::{FrameController, FrameError};
use crate::foundation::math::{constants, Spherical, Vec2, Vec3};
use crate::scene::{NodeId, NodeKind, Scene};
use crate::window::{KeyCode, PointerButton, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    None,
    Rotate,
    Pan,
}

/// Orbit controller for a camera node
///
/// The controller works in the camera's parent space: `target` and the
/// computed camera position are both expressed there. For the usual case of a
/// camera attached directly to the root, that is world space.
pub struct OrbitControls {
    camera: NodeId,

    /// The point the camera orbits and looks at
    pub target: Vec3,

    /// Set to false to ignore input and frame updates
    pub enabled: bool,

    /// Rotation speed multiplier
    pub rotate_speed: f32,

    /// Dolly speed multiplier
    pub zoom_speed: f32,

    /// Pan speed multiplier
    pub pan_speed: f32,

    /// Pixels panned per arrow key press
    pub key_pan_speed: f32,

    /// Closest the camera may dolly in
    pub min_distance: f32,

    /// Farthest the camera may dolly out
    pub max_distance: f32,

    /// Lower polar angle limit in radians
    pub min_polar_angle: f32,

    /// Upper polar angle limit in radians
    pub max_polar_angle: f32,

    viewport: (u32, u32),
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_pixels: Vec2,
    drag: DragMode,
    last_pointer: Option<(f64, f64)>,
}

impl OrbitControls {
    /// Create a controller orbiting `camera` around `target`
    ///
    /// `viewport` is the window size in pixels, used to scale drag deltas;
    /// keep it current by forwarding resize events.
    pub fn new(camera: NodeId, target: Vec3, viewport: (u32, u32)) -> Self {
        Self {
            camera,
            target,
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            key_pan_speed: 7.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: constants::PI,
            viewport,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_pixels: Vec2::zeros(),
            drag: DragMode::None,
            last_pointer: None,
        }
    }

    /// Rotate left around the target by `angle` radians on the next update
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Rotate up towards the pole by `angle` radians on the next update
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Dolly towards the target on the next update
    pub fn dolly_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    /// Dolly away from the target on the next update
    pub fn dolly_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn viewport_height(&self) -> f32 {
        self.viewport.1.max(1) as f32
    }

    fn apply_pointer_drag(&mut self, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.last_pointer else {
            self.last_pointer = Some((x, y));
            return;
        };
        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        self.last_pointer = Some((x, y));

        match self.drag {
            DragMode::Rotate => {
                let height = self.viewport_height();
                self.rotate_left(constants::TAU * dx * self.rotate_speed / height);
                self.rotate_up(constants::TAU * dy * self.rotate_speed / height);
            }
            DragMode::Pan => {
                self.pan_pixels += Vec2::new(dx, dy);
            }
            DragMode::None => {}
        }
    }
}

impl FrameController for OrbitControls {
    fn handle_event(&mut self, event: &WindowEvent) {
        if !self.enabled {
            return;
        }
        match *event {
            WindowEvent::PointerButton { button, pressed } => {
                self.drag = match (button, pressed) {
                    (PointerButton::Left, true) => DragMode::Rotate,
                    (PointerButton::Right, true) => DragMode::Pan,
                    _ => DragMode::None,
                };
                self.last_pointer = None;
            }
            WindowEvent::PointerMoved { x, y } => self.apply_pointer_drag(x, y),
            WindowEvent::Scroll { delta_y, .. } => {
                if delta_y > 0.0 {
                    self.dolly_in();
                } else if delta_y < 0.0 {
                    self.dolly_out();
                }
            }
            WindowEvent::Key { key, pressed: true } => {
                let step = self.key_pan_speed;
                match key {
                    KeyCode::ArrowLeft => self.pan_pixels += Vec2::new(step, 0.0),
                    KeyCode::ArrowRight => self.pan_pixels += Vec2::new(-step, 0.0),
                    KeyCode::ArrowUp => self.pan_pixels += Vec2::new(0.0, step),
                    KeyCode::ArrowDown => self.pan_pixels += Vec2::new(0.0, -step),
                    KeyCode::Escape => {}
                }
            }
            WindowEvent::Resized { width, height } => {
                self.viewport = (width, height);
            }
            _ => {}
        }
    }

    fn update(&mut self, scene: &mut Scene, _delta_time: f32) -> Result<(), FrameError> {
        if !self.enabled {
            return Ok(());
        }
        let node = scene
            .node(self.camera)
            .ok_or_else(|| FrameError::Custom("orbit camera node no longer exists".into()))?;

        let position = node.local.position;
        let rotation = node.local.rotation;
        let fov_y = match node.kind {
            NodeKind::Camera(ref projection) => projection.fov_y_radians(),
            _ => {
                return Err(FrameError::Custom(
                    "orbit controller target is not a camera node".into(),
                ))
            }
        };

        let offset = position - self.target;
        let mut spherical = Spherical::from_vector3(offset);
        spherical.theta += self.delta_theta;
        spherical.phi += self.delta_phi;
        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.min_distance, self.max_distance);

        // Convert accumulated pixel pan into a target shift along the camera
        // right/up axes, scaled by the visible extent at the target distance.
        if self.pan_pixels != Vec2::zeros() {
            let height = self.viewport_height();
            let target_distance = offset.norm() * (fov_y * 0.5).tan();
            let right = rotation * Vec3::x();
            let up = rotation * Vec3::y();
            self.target += right
                * (-2.0 * self.pan_pixels.x * target_distance * self.pan_speed / height)
                + up * (2.0 * self.pan_pixels.y * target_distance * self.pan_speed / height);
        }

        let position = self.target + spherical.to_vector3();
        scene.set_position(self.camera, position);
        scene.look_at(self.camera, self.target, Vec3::y());

        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_pixels = Vec2::zeros();
        Ok(())
    }
}
