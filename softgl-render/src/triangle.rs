// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Triangle primitives.

use softgl_math::{Bounds, Color, Matrix4, Vector};

use crate::vertex::Vertex;

/// An owning record of three vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub v1: Vertex,
    pub v2: Vertex,
    pub v3: Vertex,
}

impl Triangle {
    /// Build a triangle and fill any zero vertex normal with the flat face
    /// normal.
    pub fn new(v1: Vertex, v2: Vertex, v3: Vertex) -> Self {
        let mut t = Self { v1, v2, v3 };
        t.fix_normals();
        t
    }

    pub fn from_points(p1: Vector, p2: Vector, p3: Vector) -> Self {
        Self::new(
            Vertex::from_position(p1),
            Vertex::from_position(p2),
            Vertex::from_position(p3),
        )
    }

    /// True if two positions coincide or any position is non-finite.
    pub fn is_degenerate(&self) -> bool {
        let p1 = self.v1.position;
        let p2 = self.v2.position;
        let p3 = self.v3.position;
        if p1 == p2 || p1 == p3 || p2 == p3 {
            return true;
        }
        p1.is_degenerate() || p2.is_degenerate() || p3.is_degenerate()
    }

    /// The flat face normal.
    pub fn normal(&self) -> Vector {
        let e1 = self.v2.position - self.v1.position;
        let e2 = self.v3.position - self.v1.position;
        e1.cross(e2).normalize()
    }

    pub fn area(&self) -> f64 {
        let e1 = self.v2.position - self.v1.position;
        let e2 = self.v3.position - self.v1.position;
        e1.cross(e2).length() / 2.0
    }

    /// Replace exactly-zero vertex normals with the face normal.
    pub fn fix_normals(&mut self) {
        let n = self.normal();
        if self.v1.normal == Vector::ZERO {
            self.v1.normal = n;
        }
        if self.v2.normal == Vector::ZERO {
            self.v2.normal = n;
        }
        if self.v3.normal == Vector::ZERO {
            self.v3.normal = n;
        }
    }

    pub fn bounding_box(&self) -> Bounds {
        let min = self.v1.position.min(self.v2.position).min(self.v3.position);
        let max = self.v1.position.max(self.v2.position).max(self.v3.position);
        Bounds::new(min, max)
    }

    /// Transform positions as points and normals as directions.
    pub fn transform(&mut self, matrix: Matrix4) {
        self.v1.position = matrix.mul_position(self.v1.position);
        self.v2.position = matrix.mul_position(self.v2.position);
        self.v3.position = matrix.mul_position(self.v3.position);
        self.v1.normal = matrix.mul_direction(self.v1.normal);
        self.v2.normal = matrix.mul_direction(self.v2.normal);
        self.v3.normal = matrix.mul_direction(self.v3.normal);
    }

    /// Swap winding order and flip the normals.
    pub fn reverse_winding(&mut self) {
        std::mem::swap(&mut self.v1, &mut self.v3);
        self.v1.normal = -self.v1.normal;
        self.v2.normal = -self.v2.normal;
        self.v3.normal = -self.v3.normal;
    }

    pub fn set_color(&mut self, c: Color) {
        self.v1.color = c;
        self.v2.color = c;
        self.v3.color = c;
    }
}
