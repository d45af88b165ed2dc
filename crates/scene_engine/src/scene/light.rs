//! Light source payloads

use crate::foundation::math::Vec3;

/// Light variant
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Non-directional fill light applied to every surface
    Ambient,

    /// Parallel light (like sunlight) shining along `direction`
    Directional {
        /// World-space direction the light travels in
        direction: Vec3,
    },

    /// Omnidirectional light emitting from the node's world position
    Point,
}

/// Light source payload carried by a light node
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light variant
    pub kind: LightKind,

    /// Light color (RGB)
    pub color: [f32; 3],

    /// Intensity multiplier
    pub intensity: f32,
}

impl Light {
    /// White ambient light with the given intensity
    pub fn ambient(intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    /// Directional light travelling along `direction`
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction },
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    /// Point light; position comes from the owning node's world transform
    pub fn point(intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    /// Set the light color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = [r, g, b];
        self
    }
}
