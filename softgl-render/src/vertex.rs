// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Vertex records and perspective-correct attribute interpolation.

use softgl_math::{Color, Vector, VectorW};

/// A single vertex.
///
/// `position`, `normal`, `texture` and `color` are caller inputs that get
/// interpolated across the primitive. `output` is the clip-space position
/// filled in by the vertex shader.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vector,
    pub normal: Vector,
    pub texture: Vector,
    pub color: Color,
    pub output: VectorW,
}

impl Vertex {
    /// A vertex carrying only a position.
    pub fn from_position(position: Vector) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// True if the shaded clip-space position lies outside the view volume.
    #[inline]
    pub fn outside(&self) -> bool {
        self.output.outside()
    }

    /// Linear interpolation of every attribute, used by the clipper when a
    /// primitive edge crosses a view-volume plane.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t),
            texture: self.texture.lerp(other.texture, t),
            color: self.color.lerp(other.color, t),
            output: self.output + (other.output - self.output) * t,
        }
    }
}

/// Barycentric combination of three scalars. The weight vector packs the
/// three per-vertex weights in x, y, z and the perspective normalizer in w.
pub fn interpolate_floats(f1: f64, f2: f64, f3: f64, b: VectorW) -> f64 {
    (f1 * b.x + f2 * b.y + f3 * b.z) * b.w
}

/// Barycentric combination of three vectors.
pub fn interpolate_vectors(v1: Vector, v2: Vector, v3: Vector, b: VectorW) -> Vector {
    (v1 * b.x + v2 * b.y + v3 * b.z) * b.w
}

/// Barycentric combination of three colors.
pub fn interpolate_colors(c1: Color, c2: Color, c3: Color, b: VectorW) -> Color {
    (c1 * b.x + c2 * b.y + c3 * b.z) * b.w
}

/// Barycentric combination of three homogeneous vectors.
pub fn interpolate_vector_ws(v1: VectorW, v2: VectorW, v3: VectorW, b: VectorW) -> VectorW {
    (v1 * b.x + v2 * b.y + v3 * b.z) * b.w
}

/// Interpolate a whole vertex; the normal is re-normalized.
pub fn interpolate_vertices(v1: &Vertex, v2: &Vertex, v3: &Vertex, b: VectorW) -> Vertex {
    Vertex {
        position: interpolate_vectors(v1.position, v2.position, v3.position, b),
        normal: interpolate_vectors(v1.normal, v2.normal, v3.normal, b).normalize(),
        texture: interpolate_vectors(v1.texture, v2.texture, v3.texture, b),
        color: interpolate_colors(v1.color, v2.color, v3.color, b),
        output: interpolate_vector_ws(v1.output, v2.output, v3.output, b),
    }
}
