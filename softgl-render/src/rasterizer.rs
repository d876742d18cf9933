// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pixel-level rasterization of screen-space triangles and lines.
//!
//! Triangles are traversed over their pixel bounding box with three edge
//! functions advanced by forward differences. Each row skips ahead to the
//! first potentially-inside pixel and stops after leaving the inside span
//! (the triangle is convex). Covered pixels get a depth test, perspective
//! correct attribute interpolation, a fragment-shader call, and a
//! stripe-locked buffer update with optional source-over blending.

use std::sync::atomic::Ordering;

use softgl_math::{Color, Vector, VectorW};

use crate::context::{Context, RasterizeInfo};
use crate::vertex::{interpolate_vertices, Vertex};

/// Edge function: signed parallelogram area of (a−c, b−c). Zero on the
/// line through a and b, one sign per side.
#[inline]
pub(crate) fn edge(a: Vector, b: Vector, c: Vector) -> f64 {
    (b.x - c.x) * (a.y - c.y) - (b.y - c.y) * (a.x - c.x)
}

/// Source-over blend of a fragment onto one packed destination pixel, in
/// the 16-bit premultiplied fixed-point form. Input and output bytes are
/// non-premultiplied RGBA8.
fn blend_over(src: Color, dst: [u8; 4]) -> [u8; 4] {
    let [sr, sg, sb, sa] = src.to_rgba8();
    let sa16 = u32::from(sa) * 0x101;
    let pr = u32::from(sr) * 0x101 * u32::from(sa) / 0xff;
    let pg = u32::from(sg) * 0x101 * u32::from(sa) / 0xff;
    let pb = u32::from(sb) * 0x101 * u32::from(sa) / 0xff;
    let a = (0xffff - sa16) * 0x101;
    let over = |d: u8, s: u32| -> u8 { ((u32::from(d) * a / 0xffff + s) >> 8) as u8 };
    [
        over(dst[0], pr),
        over(dst[1], pg),
        over(dst[2], pb),
        over(dst[3], sa16),
    ]
}

impl Context {
    /// Rasterize a filled triangle given its source vertices and their
    /// screen-space positions (x, y in pixels, z in [0, 1]).
    pub(crate) fn fill_triangle(
        &self,
        v0: &Vertex,
        v1: &Vertex,
        v2: &Vertex,
        s0: Vector,
        s1: Vector,
        s2: Vector,
    ) -> RasterizeInfo {
        let mut info = RasterizeInfo::default();

        // Degenerate or non-finite screen triangles (zero area after the
        // viewport transform, zero-length line quads) produce no pixels.
        let area = edge(s0, s1, s2);
        if !area.is_finite() || area.abs() < f64::EPSILON {
            return info;
        }

        // Integer pixel bounding box.
        let min = s0.min(s1.min(s2)).floor();
        let max = s0.max(s1.max(s2)).ceil();
        let x0 = min.x as i64;
        let x1 = max.x as i64;
        let y0 = min.y as i64;
        let y1 = max.y as i64;

        // Edge values at the top-left pixel center plus the per-column
        // (a..) and per-row (b..) forward differences.
        let p = Vector::new(x0 as f64 + 0.5, y0 as f64 + 0.5, 0.0);
        let mut w00 = edge(s1, s2, p);
        let mut w01 = edge(s2, s0, p);
        let mut w02 = edge(s0, s1, p);
        let a01 = s1.y - s0.y;
        let b01 = s0.x - s1.x;
        let a12 = s2.y - s1.y;
        let b12 = s1.x - s2.x;
        let a20 = s0.y - s2.y;
        let b20 = s2.x - s0.x;

        let ra = 1.0 / area;
        let r0 = 1.0 / v0.output.w;
        let r1 = 1.0 / v1.output.w;
        let r2 = 1.0 / v2.output.w;
        let ra12 = 1.0 / a12;
        let ra20 = 1.0 / a20;
        let ra01 = 1.0 / a01;

        let width = self.width() as i64;
        let height = self.height() as i64;

        for y in y0..=y1 {
            // Skip ahead to the first pixel where every currently-negative
            // edge value can have crossed zero.
            let mut d = 0.0;
            let d0 = -w00 * ra12;
            let d1 = -w01 * ra20;
            let d2 = -w02 * ra01;
            if w00 < 0.0 && d0 > d {
                d = d0;
            }
            if w01 < 0.0 && d1 > d {
                d = d1;
            }
            if w02 < 0.0 && d2 > d {
                d = d2;
            }
            let d = d.floor().max(0.0);
            // Saturating: an all-outside row produces an infinite offset
            // and an empty span.
            let step = d as i64;
            let mut w0 = w00 + a12 * d;
            let mut w1 = w01 + a20 * d;
            let mut w2 = w02 + a01 * d;

            let mut was_inside = false;
            for x in x0.saturating_add(step)..=x1 {
                let b0 = w0 * ra;
                let b1 = w1 * ra;
                let b2 = w2 * ra;
                w0 += a12;
                w1 += a20;
                w2 += a01;

                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    if was_inside {
                        break;
                    }
                    continue;
                }
                was_inside = true;

                // Rounding in clipping and wide line quads can reach
                // outside the framebuffer.
                if x < 0 || x >= width || y < 0 || y >= height {
                    continue;
                }
                let i = (y * width + x) as usize;
                info.total_pixels += 1;

                let z = b0 * s0.z + b1 * s1.z + b2 * s2.z;
                let bz = z + self.depth_bias;

                // Advisory unlocked read; the authoritative test runs
                // under the stripe lock below.
                if self.read_depth
                    && bz > f64::from_bits(self.depth_buffer[i].load(Ordering::Relaxed))
                {
                    continue;
                }

                // Perspective-correct weights.
                let mut b = VectorW::new(b0 * r0, b1 * r1, b2 * r2, 0.0);
                b.w = 1.0 / (b.x + b.y + b.z);
                let v = interpolate_vertices(v0, v1, v2, b);

                let color = match self.shader.fragment(&v) {
                    Some(color) => color,
                    None => continue,
                };

                let _guard = self.locks[((x + y) & 0xff) as usize].lock();
                let stored = f64::from_bits(self.depth_buffer[i].load(Ordering::Relaxed));
                if bz <= stored || !self.read_depth {
                    info.updated_pixels += 1;
                    if self.write_depth {
                        // The raw z is stored; the bias only affects the
                        // comparison.
                        self.depth_buffer[i].store(z.to_bits(), Ordering::Relaxed);
                    }
                    if self.write_color {
                        let packed = if self.alpha_blend && color.a < 1.0 {
                            let dst = self.color_buffer[i].load(Ordering::Relaxed).to_le_bytes();
                            u32::from_le_bytes(blend_over(color, dst))
                        } else {
                            u32::from_le_bytes(color.to_rgba8())
                        };
                        self.color_buffer[i].store(packed, Ordering::Relaxed);
                    }
                }
            }

            w00 += b12;
            w01 += b20;
            w02 += b01;
        }

        info
    }

    /// Rasterize a line as a screen-space quad with square end caps: two
    /// triangles sharing the widened endpoints. Attribute interpolation
    /// across the quad is approximate (each source vertex is reused at
    /// both widened corners of its end).
    pub(crate) fn rasterize_line(
        &self,
        v0: &Vertex,
        v1: &Vertex,
        s0: Vector,
        s1: Vector,
    ) -> RasterizeInfo {
        let half = self.line_width / 2.0;
        let n = (s1 - s0).perpendicular() * half;
        // The second cap extends from the already-extended first endpoint.
        let s0 = s0 + (s0 - s1).normalize() * half;
        let s1 = s1 + (s1 - s0).normalize() * half;
        let s00 = s0 + n;
        let s01 = s0 - n;
        let s10 = s1 + n;
        let s11 = s1 - n;
        self.fill_triangle(v1, v0, v0, s11, s01, s00)
            + self.fill_triangle(v1, v1, v0, s10, s11, s00)
    }
}
