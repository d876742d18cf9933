// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line primitives.

use softgl_math::{Bounds, Matrix4, Vector};

use crate::vertex::Vertex;

/// An owning record of two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub v1: Vertex,
    pub v2: Vertex,
}

impl Line {
    pub fn new(v1: Vertex, v2: Vertex) -> Self {
        Self { v1, v2 }
    }

    pub fn from_points(p1: Vector, p2: Vector) -> Self {
        Self::new(Vertex::from_position(p1), Vertex::from_position(p2))
    }

    pub fn bounding_box(&self) -> Bounds {
        Bounds::new(
            self.v1.position.min(self.v2.position),
            self.v1.position.max(self.v2.position),
        )
    }

    /// Transform positions as points and normals as directions.
    pub fn transform(&mut self, matrix: Matrix4) {
        self.v1.position = matrix.mul_position(self.v1.position);
        self.v2.position = matrix.mul_position(self.v2.position);
        self.v1.normal = matrix.mul_direction(self.v1.normal);
        self.v2.normal = matrix.mul_direction(self.v2.normal);
    }
}
