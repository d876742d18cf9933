// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The programmable pipeline stages and the reference shaders.

use std::sync::Arc;

use softgl_math::{Color, Matrix4, Vector};

use crate::texture::Texture;
use crate::vertex::Vertex;

/// A programmable shader pair.
///
/// `vertex` runs exactly once per input vertex and must fill
/// `Vertex::output` with clip-space coordinates; it may rewrite the other
/// attributes. `fragment` receives the perspective-correctly interpolated
/// vertex for a covered pixel; returning `None` discards the pixel (no
/// depth or color update).
pub trait Shader: Send + Sync {
    fn vertex(&self, v: Vertex) -> Vertex;
    fn fragment(&self, v: &Vertex) -> Option<Color>;
}

/// Transforms positions to clip space and paints a constant color.
pub struct SolidColorShader {
    pub matrix: Matrix4,
    pub color: Color,
}

impl SolidColorShader {
    pub fn new(matrix: Matrix4, color: Color) -> Self {
        Self { matrix, color }
    }
}

impl Shader for SolidColorShader {
    fn vertex(&self, mut v: Vertex) -> Vertex {
        v.output = self.matrix.mul_position_w(v.position);
        v
    }

    fn fragment(&self, _v: &Vertex) -> Option<Color> {
        Some(self.color)
    }
}

/// Bilinearly samples a texture by the interpolated uv coordinates.
pub struct TextureShader {
    pub matrix: Matrix4,
    pub texture: Arc<dyn Texture>,
}

impl TextureShader {
    pub fn new(matrix: Matrix4, texture: Arc<dyn Texture>) -> Self {
        Self { matrix, texture }
    }
}

impl Shader for TextureShader {
    fn vertex(&self, mut v: Vertex) -> Vertex {
        v.output = self.matrix.mul_position_w(v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        Some(self.texture.bilinear_sample(v.texture.x, v.texture.y))
    }
}

/// Phong lighting: ambient + diffuse + specular against a single
/// directional light.
pub struct PhongShader {
    pub matrix: Matrix4,
    /// Direction towards the light, unit length.
    pub light_direction: Vector,
    pub camera_position: Vector,
    /// Overrides the interpolated vertex color when set.
    pub object_color: Option<Color>,
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    /// Overrides both vertex and object color when set.
    pub texture: Option<Arc<dyn Texture>>,
    pub specular_power: f64,
}

impl PhongShader {
    pub fn new(matrix: Matrix4, light_direction: Vector, camera_position: Vector) -> Self {
        Self {
            matrix,
            light_direction,
            camera_position,
            object_color: None,
            ambient_color: Color::gray(0.2),
            diffuse_color: Color::gray(0.8),
            specular_color: Color::WHITE,
            texture: None,
            specular_power: 32.0,
        }
    }
}

impl Shader for PhongShader {
    fn vertex(&self, mut v: Vertex) -> Vertex {
        v.output = self.matrix.mul_position_w(v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let mut light = self.ambient_color;
        let mut color = v.color;
        if let Some(c) = self.object_color {
            color = c;
        }
        if let Some(t) = &self.texture {
            color = t.bilinear_sample(v.texture.x, v.texture.y);
        }
        let diffuse = v.normal.dot(self.light_direction).max(0.0);
        light = light + self.diffuse_color * diffuse;
        if diffuse > 0.0 && self.specular_power > 0.0 {
            let camera = (self.camera_position - v.position).normalize();
            let reflected = (-self.light_direction).reflect(v.normal);
            let specular = camera.dot(reflected).max(0.0);
            if specular > 0.0 {
                light = light + self.specular_color * specular.powf(self.specular_power);
            }
        }
        Some((color * light).min(Color::WHITE).with_alpha(color.a))
    }
}
