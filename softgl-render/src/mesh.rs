// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mesh: linear buffers of owned triangles and lines with a lazily
//! computed, mutation-invalidated bounding box.
//!
//! External producers (file loaders, shape generators) and consumers
//! (post-processing tools) interact with the renderer exclusively through
//! this type.

use std::cell::Cell;
use std::collections::HashMap;

use softgl_math::{Bounds, Color, Matrix4, Vector};

use crate::line::Line;
use crate::triangle::Triangle;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    lines: Vec<Line>,
    cached_bounds: Cell<Option<Bounds>>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>, lines: Vec<Line>) -> Self {
        Self {
            triangles,
            lines,
            cached_bounds: Cell::new(None),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self::new(triangles, Vec::new())
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self::new(Vec::new(), lines)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Mutable triangle access; drops the cached bounding box.
    pub fn triangles_mut(&mut self) -> &mut Vec<Triangle> {
        self.dirty();
        &mut self.triangles
    }

    /// Mutable line access; drops the cached bounding box.
    pub fn lines_mut(&mut self) -> &mut Vec<Line> {
        self.dirty();
        &mut self.lines
    }

    fn dirty(&self) {
        self.cached_bounds.set(None);
    }

    /// Append all primitives of another mesh.
    pub fn add(&mut self, other: &Mesh) {
        self.triangles.extend_from_slice(&other.triangles);
        self.lines.extend_from_slice(&other.lines);
        self.dirty();
    }

    pub fn set_color(&mut self, c: Color) {
        for t in &mut self.triangles {
            t.set_color(c);
        }
    }

    /// The bounding box of all primitives, memoized until the next
    /// mutation.
    pub fn bounding_box(&self) -> Bounds {
        if let Some(b) = self.cached_bounds.get() {
            return b;
        }
        let mut bounds = Bounds::EMPTY;
        for t in &self.triangles {
            bounds = bounds.extend(t.bounding_box());
        }
        for l in &self.lines {
            bounds = bounds.extend(l.bounding_box());
        }
        self.cached_bounds.set(Some(bounds));
        bounds
    }

    pub fn transform(&mut self, matrix: Matrix4) {
        for t in &mut self.triangles {
            t.transform(matrix);
        }
        for l in &mut self.lines {
            l.transform(matrix);
        }
        self.dirty();
    }

    /// Translate so the given bounding-box anchor lands on `position`.
    pub fn move_to(&mut self, position: Vector, anchor: Vector) {
        let matrix = Matrix4::translate(position - self.bounding_box().anchor(anchor));
        self.transform(matrix);
    }

    /// Uniformly scale and translate the mesh to fit inside `bounds`,
    /// distributing the slack by `anchor`.
    pub fn fit_inside(&mut self, bounds: Bounds, anchor: Vector) {
        let scale = (bounds.size() / self.bounding_box().size()).min_component();
        let extra = bounds.size() - self.bounding_box().size() * scale;
        let matrix = Matrix4::IDENTITY
            .translated(-self.bounding_box().min)
            .scaled(Vector::new(scale, scale, scale))
            .translated(bounds.min + extra * anchor);
        self.transform(matrix);
    }

    pub fn reverse_winding(&mut self) {
        for t in &mut self.triangles {
            t.reverse_winding();
        }
        self.dirty();
    }

    /// Average the normals of all vertices sharing a position.
    pub fn smooth_normals(&mut self) {
        let mut lookup: HashMap<PositionKey, Vector> = HashMap::new();
        for t in &self.triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                let e = lookup.entry(position_key(v.position)).or_insert(Vector::ZERO);
                *e = *e + v.normal;
            }
        }
        for (_, n) in lookup.iter_mut() {
            *n = n.normalize();
        }
        for t in &mut self.triangles {
            for v in [&mut t.v1, &mut t.v2, &mut t.v3] {
                v.normal = lookup[&position_key(v.position)];
            }
        }
    }

    /// Average normals across shared positions, but only blend pairs whose
    /// angle is below `radians`; preserves hard creases.
    pub fn smooth_normals_threshold(&mut self, radians: f64) {
        let threshold = radians.cos();
        let mut lookup: HashMap<PositionKey, Vec<Vector>> = HashMap::new();
        for t in &self.triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                lookup.entry(position_key(v.position)).or_default().push(v.normal);
            }
        }
        for t in &mut self.triangles {
            for v in [&mut t.v1, &mut t.v2, &mut t.v3] {
                let normals = &lookup[&position_key(v.position)];
                let mut sum = Vector::ZERO;
                for n in normals {
                    if n.dot(v.normal) >= threshold {
                        sum = sum + *n;
                    }
                }
                v.normal = sum.normalize();
            }
        }
    }
}

/// Bit-exact position key for normal smoothing lookups.
type PositionKey = (u64, u64, u64);

fn position_key(v: Vector) -> PositionKey {
    (v.x.to_bits(), v.y.to_bits(), v.z.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        // Two triangles forming the unit square in the xy plane.
        Mesh::from_triangles(vec![
            Triangle::from_points(
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(1.0, 1.0, 0.0),
            ),
            Triangle::from_points(
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 1.0, 0.0),
                Vector::new(0.0, 1.0, 0.0),
            ),
        ])
    }

    #[test]
    fn test_bounding_box() {
        let m = quad_mesh();
        let b = m.bounding_box();
        assert_eq!(b.min, Vector::ZERO);
        assert_eq!(b.max, Vector::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_bounding_box_invalidated_on_transform() {
        let mut m = quad_mesh();
        let _ = m.bounding_box();
        m.transform(Matrix4::translate(Vector::new(2.0, 0.0, 0.0)));
        let b = m.bounding_box();
        assert_eq!(b.min, Vector::new(2.0, 0.0, 0.0));
        assert_eq!(b.max, Vector::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_bounding_box_invalidated_on_mut_access() {
        let mut m = quad_mesh();
        let _ = m.bounding_box();
        m.triangles_mut().push(Triangle::from_points(
            Vector::new(5.0, 5.0, 5.0),
            Vector::new(6.0, 5.0, 5.0),
            Vector::new(5.0, 6.0, 5.0),
        ));
        assert_eq!(m.bounding_box().max, Vector::new(6.0, 6.0, 5.0));
    }

    #[test]
    fn test_add_extends_bounds() {
        let mut a = quad_mesh();
        let mut b = quad_mesh();
        b.transform(Matrix4::translate(Vector::new(0.0, 0.0, 3.0)));
        let _ = a.bounding_box();
        a.add(&b);
        assert_eq!(a.triangles().len(), 4);
        assert_eq!(a.bounding_box().max, Vector::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn test_move_to() {
        let mut m = quad_mesh();
        m.move_to(Vector::ZERO, Vector::new(0.5, 0.5, 0.5));
        assert_eq!(m.bounding_box().center(), Vector::ZERO);
    }

    #[test]
    fn test_fit_inside_unit() {
        let mut m = quad_mesh();
        m.transform(Matrix4::scale(Vector::new(4.0, 2.0, 1.0)));
        let target = Bounds::new(Vector::ZERO, Vector::new(1.0, 1.0, 1.0));
        m.fit_inside(target, Vector::new(0.0, 0.0, 0.0));
        let b = m.bounding_box();
        assert!(target.contains_bounds(b));
        assert!((b.size().x - 1.0).abs() < 1e-12);
        assert!((b.size().y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_winding_flips_all_faces() {
        let mut m = quad_mesh();
        m.reverse_winding();
        for t in m.triangles() {
            assert_eq!(t.normal(), Vector::new(0.0, 0.0, -1.0));
        }
    }

    #[test]
    fn test_smooth_normals_shared_edge() {
        // Two faces meeting at 90°; after smoothing, shared-position
        // normals are the average of the two face normals.
        let mut m = Mesh::from_triangles(vec![
            Triangle::from_points(
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(1.0, 1.0, 0.0),
            ),
            Triangle::from_points(
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(0.0, 0.0, 1.0),
            ),
        ]);
        m.smooth_normals();
        let n = m.triangles()[0].v1.normal;
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.z > 0.0 && n.y > 0.0);
    }

    #[test]
    fn test_smooth_normals_threshold_keeps_creases() {
        let mut m = Mesh::from_triangles(vec![
            Triangle::from_points(
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(1.0, 1.0, 0.0),
            ),
            Triangle::from_points(
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(0.0, 0.0, 1.0),
            ),
        ]);
        let before = m.triangles()[0].v1.normal;
        // 90° crease stays sharp under a 30° threshold.
        m.smooth_normals_threshold(30f64.to_radians());
        assert_eq!(m.triangles()[0].v1.normal, before);
    }
}
