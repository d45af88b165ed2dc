//! Geometry descriptors and primitive shape generators
//!
//! A [`Geometry`] is immutable once built: it is constructed, inserted into
//! the registry, and referenced by handle. `Clone` deep-copies the buffers, so
//! a clone edited before insertion never aliases the original.

use crate::foundation::math::{constants, Vec3};

/// A single vertex with position and normal
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Unit normal vector
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a vertex from position and normal vectors
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }
}

/// Immutable vertex/index buffer descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Vertex buffer
    pub vertices: Vec<Vertex>,

    /// Triangle index buffer (three indices per face)
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Build a geometry from raw buffers
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles described by the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned box centered at the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

        // Six faces, four vertices each, so normals stay flat per face.
        let faces: [(Vec3, [Vec3; 4]); 6] = [
            (
                Vec3::new(0.0, 0.0, 1.0),
                [
                    Vec3::new(-hw, -hh, hd),
                    Vec3::new(hw, -hh, hd),
                    Vec3::new(hw, hh, hd),
                    Vec3::new(-hw, hh, hd),
                ],
            ),
            (
                Vec3::new(0.0, 0.0, -1.0),
                [
                    Vec3::new(hw, -hh, -hd),
                    Vec3::new(-hw, -hh, -hd),
                    Vec3::new(-hw, hh, -hd),
                    Vec3::new(hw, hh, -hd),
                ],
            ),
            (
                Vec3::new(1.0, 0.0, 0.0),
                [
                    Vec3::new(hw, -hh, hd),
                    Vec3::new(hw, -hh, -hd),
                    Vec3::new(hw, hh, -hd),
                    Vec3::new(hw, hh, hd),
                ],
            ),
            (
                Vec3::new(-1.0, 0.0, 0.0),
                [
                    Vec3::new(-hw, -hh, -hd),
                    Vec3::new(-hw, -hh, hd),
                    Vec3::new(-hw, hh, hd),
                    Vec3::new(-hw, hh, -hd),
                ],
            ),
            (
                Vec3::new(0.0, 1.0, 0.0),
                [
                    Vec3::new(-hw, hh, hd),
                    Vec3::new(hw, hh, hd),
                    Vec3::new(hw, hh, -hd),
                    Vec3::new(-hw, hh, -hd),
                ],
            ),
            (
                Vec3::new(0.0, -1.0, 0.0),
                [
                    Vec3::new(-hw, -hh, -hd),
                    Vec3::new(hw, -hh, -hd),
                    Vec3::new(hw, -hh, hd),
                    Vec3::new(-hw, -hh, hd),
                ],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            for corner in corners {
                vertices.push(Vertex::new(corner, normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Cube with the given edge length
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Flat plane in the XY plane, facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let normal = Vec3::new(0.0, 0.0, 1.0);

        let vertices = vec![
            Vertex::new(Vec3::new(-hw, -hh, 0.0), normal),
            Vertex::new(Vec3::new(hw, -hh, 0.0), normal),
            Vertex::new(Vec3::new(hw, hh, 0.0), normal),
            Vertex::new(Vec3::new(-hw, hh, 0.0), normal),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Self { vertices, indices }
    }

    /// UV sphere centered at the origin
    ///
    /// `segments` is the horizontal resolution, `rings` the vertical one.
    /// Both are clamped to a sane minimum.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::new();
        for ring in 0..=rings {
            let phi = constants::PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let theta = constants::TAU * segment as f32 / segments as f32;
                let normal = Vec3::new(
                    phi.sin() * theta.sin(),
                    phi.cos(),
                    phi.sin() * theta.cos(),
                );
                vertices.push(Vertex::new(normal * radius, normal));
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::new();
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }

        Self { vertices, indices }
    }
}
