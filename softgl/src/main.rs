// SPDX-FileCopyrightText: 2026 softgl contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Demo frontend: renders a colored cube on a ground plane with Phong
//! lighting and writes the color (and optionally depth) image as PNG.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use clap::Parser;
use log::info;

use softgl_math::{Color, Matrix4, Vector};
use softgl_render::{Context, Line, Mesh, PhongShader, Triangle};

#[derive(Parser)]
#[command(name = "softgl", about = "Render the demo scene with the softgl CPU rasterizer")]
struct Args {
    /// Output image width in pixels.
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Color image path.
    #[arg(long, default_value = "softgl.png")]
    output: PathBuf,

    /// Optional grayscale depth visualization path.
    #[arg(long)]
    depth_output: Option<PathBuf>,

    /// Stroke triangle edges instead of filling faces.
    #[arg(long)]
    wireframe: bool,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Two triangles spanning the quad p1..p4 (counter-clockwise), painted in
/// one color.
fn quad(p1: Vector, p2: Vector, p3: Vector, p4: Vector, color: Color) -> [Triangle; 2] {
    let mut a = Triangle::from_points(p1, p2, p3);
    let mut b = Triangle::from_points(p1, p3, p4);
    a.set_color(color);
    b.set_color(color);
    [a, b]
}

/// A unit cube centered at the origin with one color per face, plus its
/// twelve edges as outline lines.
fn cube_mesh() -> Mesh {
    let p = |x: i32, y: i32, z: i32| {
        Vector::new(f64::from(x) * 0.5, f64::from(y) * 0.5, f64::from(z) * 0.5)
    };
    let faces = [
        // +z, -z
        (
            [p(-1, -1, 1), p(1, -1, 1), p(1, 1, 1), p(-1, 1, 1)],
            "#e05252",
        ),
        (
            [p(1, -1, -1), p(-1, -1, -1), p(-1, 1, -1), p(1, 1, -1)],
            "#52a3e0",
        ),
        // +x, -x
        (
            [p(1, -1, 1), p(1, -1, -1), p(1, 1, -1), p(1, 1, 1)],
            "#58c470",
        ),
        (
            [p(-1, -1, -1), p(-1, -1, 1), p(-1, 1, 1), p(-1, 1, -1)],
            "#e0b152",
        ),
        // +y, -y
        (
            [p(-1, 1, 1), p(1, 1, 1), p(1, 1, -1), p(-1, 1, -1)],
            "#b06fd4",
        ),
        (
            [p(-1, -1, -1), p(1, -1, -1), p(1, -1, 1), p(-1, -1, 1)],
            "#7a7a7a",
        ),
    ];

    let mut mesh = Mesh::default();
    for (corners, hex) in faces {
        let color = Color::from_hex(hex).unwrap_or(Color::WHITE);
        mesh.triangles_mut()
            .extend(quad(corners[0], corners[1], corners[2], corners[3], color));
    }

    // Edge outlines.
    for z in [-1, 1] {
        for (a, b) in [((-1, -1), (1, -1)), ((1, -1), (1, 1)), ((1, 1), (-1, 1)), ((-1, 1), (-1, -1))] {
            mesh.lines_mut()
                .push(Line::from_points(p(a.0, a.1, z), p(b.0, b.1, z)));
        }
    }
    for (x, y) in [(-1, -1), (1, -1), (1, 1), (-1, 1)] {
        mesh.lines_mut()
            .push(Line::from_points(p(x, y, -1), p(x, y, 1)));
    }
    mesh
}

fn ground_mesh() -> Mesh {
    let y = -0.5;
    let s = 2.0;
    Mesh::from_triangles(
        quad(
            Vector::new(-s, y, s),
            Vector::new(s, y, s),
            Vector::new(s, y, -s),
            Vector::new(-s, y, -s),
            Color::gray(0.85),
        )
        .to_vec(),
    )
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.clone()),
    )
    .init();

    let mut scene = cube_mesh();
    scene.add(&ground_mesh());

    let eye = Vector::new(1.9, 1.4, 2.6);
    let center = Vector::new(0.0, -0.1, 0.0);
    let up = Vector::new(0.0, 1.0, 0.0);
    let aspect = args.width as f64 / args.height as f64;
    let matrix = Matrix4::look_at(eye, center, up).projected(40.0, aspect, 0.5, 10.0);

    let mut shader = PhongShader::new(
        matrix,
        Vector::new(-0.6, 1.0, 0.8).normalize(),
        eye,
    );
    shader.specular_power = 48.0;

    let mut ctx = Context::new(args.width, args.height);
    ctx.clear_color = Color::gray(0.15);
    ctx.clear_color_buffer();
    ctx.wireframe = args.wireframe;
    ctx.line_width = args.width as f64 / 400.0;
    ctx.shader = Arc::new(shader);

    info!(
        "rendering {} triangles / {} lines at {}x{}",
        scene.triangles().len(),
        scene.lines().len(),
        args.width,
        args.height
    );
    let start = Instant::now();
    let mut stats = ctx.draw_triangles(scene.triangles());
    // Pull the outlines slightly towards the camera so they win the depth
    // test against the faces they sit on.
    ctx.depth_bias = -1e-4;
    stats += ctx.draw_lines(scene.lines());
    info!(
        "rasterized {} pixels ({} updated) in {:.1?}",
        stats.total_pixels,
        stats.updated_pixels,
        start.elapsed()
    );

    let color = image::RgbaImage::from_raw(
        args.width as u32,
        args.height as u32,
        ctx.image(),
    )
    .context("color buffer size mismatch")?;
    color
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    if let Some(path) = &args.depth_output {
        let depth = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
            args.width as u32,
            args.height as u32,
            ctx.depth_image(),
        )
        .context("depth buffer size mismatch")?;
        depth
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    Ok(())
}
