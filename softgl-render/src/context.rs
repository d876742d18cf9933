// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The rendering context: color/depth targets, pipeline state, and the
//! primitive draw entry points with multi-threaded dispatch.
//!
//! Worker threads share the context immutably. Pixel storage is atomic
//! (packed RGBA8 in an `AtomicU32`, f64 depth bits in an `AtomicU64`); the
//! unlocked early depth read is advisory, and every buffer update happens
//! inside a striped-mutex critical section keyed by the pixel coordinate.
//! Pipeline state and the shader must not be mutated while a draw call is
//! in flight, which the `&mut self`/`&self` split enforces at compile
//! time.

use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use softgl_math::{Color, Matrix4, Vector};

use crate::clip::{clip_line, clip_triangle};
use crate::line::Line;
use crate::mesh::Mesh;
use crate::shader::{Shader, SolidColorShader};
use crate::triangle::Triangle;
use crate::vertex::Vertex;

/// Number of striped pixel locks. Must be a power of two.
pub(crate) const NUM_STRIPE_LOCKS: usize = 256;

/// Screen-space orientation treated as the front face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Cw,
    Ccw,
}

/// Which faces to discard before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Pixel counters for one or more rasterization calls.
///
/// `total_pixels` counts fragments that survived the in-framebuffer check;
/// `updated_pixels` counts fragments that actually wrote to a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizeInfo {
    pub total_pixels: u64,
    pub updated_pixels: u64,
}

impl Add for RasterizeInfo {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total_pixels: self.total_pixels + other.total_pixels,
            updated_pixels: self.updated_pixels + other.updated_pixels,
        }
    }
}

impl AddAssign for RasterizeInfo {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for RasterizeInfo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A render target plus the fixed-function pipeline state around the
/// programmable stages.
pub struct Context {
    width: usize,
    height: usize,
    /// Packed non-premultiplied RGBA8, row-major, top-left origin.
    pub(crate) color_buffer: Vec<AtomicU32>,
    /// f64 bit patterns; smaller is closer, cleared to `f64::MAX`.
    pub(crate) depth_buffer: Vec<AtomicU64>,
    pub clear_color: Color,
    pub shader: Arc<dyn Shader>,
    pub read_depth: bool,
    pub write_depth: bool,
    pub write_color: bool,
    pub alpha_blend: bool,
    pub wireframe: bool,
    pub front_face: Winding,
    pub cull: CullMode,
    /// Line and wireframe width in pixels.
    pub line_width: f64,
    /// Added to the depth-test value only; the stored depth stays raw.
    pub depth_bias: f64,
    /// Worker threads for batched draws; 0 = hardware parallelism.
    pub threads: usize,
    pub(crate) screen_matrix: Matrix4,
    pub(crate) locks: [Mutex<()>; NUM_STRIPE_LOCKS],
}

impl Context {
    /// A `width`×`height` context with both buffers allocated, depth
    /// cleared, and default state.
    pub fn new(width: usize, height: usize) -> Self {
        let pixels = width * height;
        Self {
            width,
            height,
            color_buffer: (0..pixels).map(|_| AtomicU32::new(0)).collect(),
            depth_buffer: (0..pixels)
                .map(|_| AtomicU64::new(f64::MAX.to_bits()))
                .collect(),
            clear_color: Color::TRANSPARENT,
            shader: Arc::new(SolidColorShader::new(
                Matrix4::IDENTITY,
                Color::new(1.0, 0.0, 1.0, 1.0),
            )),
            read_depth: true,
            write_depth: true,
            write_color: true,
            alpha_blend: true,
            wireframe: false,
            front_face: Winding::Ccw,
            cull: CullMode::Back,
            line_width: 2.0,
            depth_bias: 0.0,
            threads: 0,
            screen_matrix: Matrix4::screen(width, height),
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    // ── Buffer access ───────────────────────────────────────────────────

    /// Snapshot of the color buffer as row-major non-premultiplied RGBA8.
    pub fn image(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.color_buffer.len() * 4);
        for px in &self.color_buffer {
            out.extend_from_slice(&px.load(Ordering::Relaxed).to_le_bytes());
        }
        out
    }

    /// Snapshot of one depth value.
    pub fn depth_at(&self, x: usize, y: usize) -> f64 {
        f64::from_bits(self.depth_buffer[y * self.width + x].load(Ordering::Relaxed))
    }

    /// Grayscale visualization of the depth buffer: finite depths are
    /// rescaled into [0, 1] from their observed range; cleared pixels map
    /// to the farthest gray.
    pub fn depth_image(&self) -> Vec<u16> {
        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for d in &self.depth_buffer {
            let d = f64::from_bits(d.load(Ordering::Relaxed));
            if d == f64::MAX {
                continue;
            }
            lo = lo.min(d);
            hi = hi.max(d);
        }
        self.depth_buffer
            .iter()
            .map(|d| {
                let d = f64::from_bits(d.load(Ordering::Relaxed));
                let t = if d == f64::MAX || hi <= lo {
                    1.0
                } else {
                    (d - lo) / (hi - lo)
                };
                (t * f64::from(u16::MAX)) as u16
            })
            .collect()
    }

    pub fn clear_color_buffer(&mut self) {
        self.clear_color_buffer_with(self.clear_color);
    }

    pub fn clear_color_buffer_with(&mut self, color: Color) {
        let packed = u32::from_le_bytes(color.to_rgba8());
        for px in &mut self.color_buffer {
            *px.get_mut() = packed;
        }
    }

    /// Reset every depth sample to the far sentinel.
    pub fn clear_depth_buffer(&mut self) {
        self.clear_depth_buffer_with(f64::MAX);
    }

    pub fn clear_depth_buffer_with(&mut self, value: f64) {
        let bits = value.to_bits();
        for d in &mut self.depth_buffer {
            *d.get_mut() = bits;
        }
    }

    // ── Primitive draws ─────────────────────────────────────────────────

    /// Shade, clip and rasterize one triangle.
    pub fn draw_triangle(&self, t: &Triangle) -> RasterizeInfo {
        let v1 = self.shader.vertex(t.v1);
        let v2 = self.shader.vertex(t.v2);
        let v3 = self.shader.vertex(t.v3);

        if v1.outside() || v2.outside() || v3.outside() {
            clip_triangle(&Triangle::new(v1, v2, v3))
                .iter()
                .map(|t| self.draw_clipped_triangle(&t.v1, &t.v2, &t.v3))
                .sum()
        } else {
            self.draw_clipped_triangle(&v1, &v2, &v3)
        }
    }

    /// Shade, clip and rasterize one line.
    pub fn draw_line(&self, l: &Line) -> RasterizeInfo {
        let v1 = self.shader.vertex(l.v1);
        let v2 = self.shader.vertex(l.v2);

        if v1.outside() || v2.outside() {
            match clip_line(&Line::new(v1, v2)) {
                Some(line) => self.draw_clipped_line(&line.v1, &line.v2),
                None => RasterizeInfo::default(),
            }
        } else {
            self.draw_clipped_line(&v1, &v2)
        }
    }

    /// Draw a batch of triangles across worker threads; triangle `i` is
    /// handled by worker `i % workers`.
    pub fn draw_triangles(&self, triangles: &[Triangle]) -> RasterizeInfo {
        self.dispatch(triangles, |ctx, t| ctx.draw_triangle(t))
    }

    /// Draw a batch of lines across worker threads.
    pub fn draw_lines(&self, lines: &[Line]) -> RasterizeInfo {
        self.dispatch(lines, |ctx, l| ctx.draw_line(l))
    }

    /// Draw all triangles, then all lines of a mesh.
    pub fn draw_mesh(&self, mesh: &Mesh) -> RasterizeInfo {
        let info = self.draw_triangles(mesh.triangles()) + self.draw_lines(mesh.lines());
        log::debug!(
            "draw_mesh: {} triangles, {} lines, {}/{} pixels updated",
            mesh.triangles().len(),
            mesh.lines().len(),
            info.updated_pixels,
            info.total_pixels,
        );
        info
    }

    fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }

    /// Fork/join fan-out: static partition by index, per-worker
    /// accumulation, summed at join.
    fn dispatch<T, F>(&self, items: &[T], draw: F) -> RasterizeInfo
    where
        T: Sync,
        F: Fn(&Self, &T) -> RasterizeInfo + Send + Copy,
    {
        let workers = self.worker_count();
        if workers <= 1 || items.len() <= 1 {
            return items.iter().map(|item| draw(self, item)).sum();
        }
        log::trace!("dispatch: {} primitives across {} workers", items.len(), workers);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|wi| {
                    scope.spawn(move || {
                        items
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| i % workers == wi)
                            .map(|(_, item)| draw(self, item))
                            .sum::<RasterizeInfo>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("rasterizer worker panicked"))
                .sum()
        })
    }

    // ── Post-clip pipeline ──────────────────────────────────────────────

    /// Perspective divide, orientation fix-up, culling, viewport
    /// transform, then filled or wireframe rasterization.
    fn draw_clipped_triangle(&self, v0: &Vertex, v1: &Vertex, v2: &Vertex) -> RasterizeInfo {
        let mut v0 = v0;
        let mut v1 = v1;
        let mut v2 = v2;
        let mut ndc0 = (v0.output / v0.output.w).vector();
        let mut ndc1 = (v1.output / v1.output.w).vector();
        let mut ndc2 = (v2.output / v2.output.w).vector();

        // Orientation in NDC; the sign feeds culling, the swap hands the
        // rasterizer a consistently wound triangle.
        let mut area = (ndc1.x - ndc0.x) * (ndc2.y - ndc0.y) - (ndc2.x - ndc0.x) * (ndc1.y - ndc0.y);
        if area < 0.0 {
            std::mem::swap(&mut v0, &mut v2);
            std::mem::swap(&mut ndc0, &mut ndc2);
        }
        if self.cull == CullMode::Front {
            area = -area;
        }
        if self.front_face == Winding::Cw {
            area = -area;
        }
        if self.cull != CullMode::None && area <= 0.0 {
            return RasterizeInfo::default();
        }

        let s0 = self.screen_matrix.mul_position(ndc0);
        let s1 = self.screen_matrix.mul_position(ndc1);
        let s2 = self.screen_matrix.mul_position(ndc2);

        if self.wireframe {
            self.wireframe_triangle(v0, v1, v2, s0, s1, s2)
        } else {
            self.fill_triangle(v0, v1, v2, s0, s1, s2)
        }
    }

    fn draw_clipped_line(&self, v0: &Vertex, v1: &Vertex) -> RasterizeInfo {
        let ndc0 = (v0.output / v0.output.w).vector();
        let ndc1 = (v1.output / v1.output.w).vector();

        let s0 = self.screen_matrix.mul_position(ndc0);
        let s1 = self.screen_matrix.mul_position(ndc1);

        self.rasterize_line(v0, v1, s0, s1)
    }

    pub(crate) fn wireframe_triangle(
        &self,
        v0: &Vertex,
        v1: &Vertex,
        v2: &Vertex,
        s0: Vector,
        s1: Vector,
        s2: Vector,
    ) -> RasterizeInfo {
        self.rasterize_line(v0, v1, s0, s1)
            + self.rasterize_line(v1, v2, s1, s2)
            + self.rasterize_line(v2, v0, s2, s0)
    }
}
