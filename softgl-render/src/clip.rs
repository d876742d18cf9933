// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Homogeneous clipping against the view volume |x| ≤ w, |y| ≤ w, |z| ≤ w.
//!
//! Clipping happens before the perspective divide so primitives crossing
//! the w = 0 surface never reach the rasterizer. All vertex attributes are
//! interpolated at the same parametric crossing as the clip-space
//! position.

use softgl_math::VectorW;

use crate::line::Line;
use crate::triangle::Triangle;
use crate::vertex::Vertex;

/// One face of the homogeneous view volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

const PLANES: [Plane; 6] = [
    Plane::NegX,
    Plane::PosX,
    Plane::NegY,
    Plane::PosY,
    Plane::NegZ,
    Plane::PosZ,
];

/// Signed distance of a clip-space point to a plane; ≥ 0 means inside.
fn signed_distance(plane: Plane, v: VectorW) -> f64 {
    match plane {
        Plane::NegX => v.w + v.x,
        Plane::PosX => v.w - v.x,
        Plane::NegY => v.w + v.y,
        Plane::PosY => v.w - v.y,
        Plane::NegZ => v.w + v.z,
        Plane::PosZ => v.w - v.z,
    }
}

/// Interpolated vertex at the zero crossing between `a` (distance `da`)
/// and `b` (distance `db`).
fn crossing(a: &Vertex, b: &Vertex, da: f64, db: f64) -> Vertex {
    a.lerp(b, da / (da - db))
}

/// Clip a line against all six planes. Returns `None` when fully outside.
pub fn clip_line(line: &Line) -> Option<Line> {
    let mut v1 = line.v1;
    let mut v2 = line.v2;
    for plane in PLANES {
        let d1 = signed_distance(plane, v1.output);
        let d2 = signed_distance(plane, v2.output);
        if d1 < 0.0 && d2 < 0.0 {
            return None;
        }
        if d1 < 0.0 {
            v1 = crossing(&v1, &v2, d1, d2);
        } else if d2 < 0.0 {
            v2 = crossing(&v1, &v2, d1, d2);
        }
    }
    Some(Line::new(v1, v2))
}

/// Sutherland-Hodgman triangle clip followed by fan triangulation around
/// the first surviving vertex. A fully-culled triangle yields an empty
/// vector.
pub fn clip_triangle(triangle: &Triangle) -> Vec<Triangle> {
    let mut polygon = vec![triangle.v1, triangle.v2, triangle.v3];
    for plane in PLANES {
        if polygon.is_empty() {
            break;
        }
        let mut output = Vec::with_capacity(polygon.len() + 1);
        for i in 0..polygon.len() {
            let cur = &polygon[i];
            let next = &polygon[(i + 1) % polygon.len()];
            let dc = signed_distance(plane, cur.output);
            let dn = signed_distance(plane, next.output);
            if dc >= 0.0 {
                output.push(*cur);
            }
            if (dc < 0.0) != (dn < 0.0) {
                output.push(crossing(cur, next, dc, dn));
            }
        }
        polygon = output;
    }
    if polygon.len() < 3 {
        return Vec::new();
    }
    (2..polygon.len())
        .map(|i| Triangle::new(polygon[0], polygon[i - 1], polygon[i]))
        .collect()
}
