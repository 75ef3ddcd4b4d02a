//! Orbit render demo for chromacloud
//!
//! Samples the colors of a synthetic image, assigns them to a few random
//! cluster centers, and renders the clustered color cloud while dragging the
//! camera around it. Frames are written as PNG files.
//!
//! Usage: `orbit_render [OUTPUT_DIR]` (defaults to `frames`). Set
//! `RUST_LOG=debug` to see per-frame statistics.

use anyhow::{Context, Result};
use chromacloud_core::{ColorState, Rgba, Vector3d};
use chromacloud_render::overlay::points_from_rgba_pixels;
use chromacloud_render::{
    CameraConfig, Cluster, ClusterSceneBuilder, OrbitParams, OverlayConfig, Viewer, ViewerConfig,
};
use image::RgbaImage;
use log::info;
use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

const WIDTH: usize = 400;
const HEIGHT: usize = 400;
const CLUSTERS: usize = 5;
const FRAMES: usize = 24;

/// Smooth color gradient with some noise, standing in for a photo
fn synthetic_image(rng: &mut impl Rng) -> RgbaImage {
    RgbaImage::from_fn(128, 128, |x, y| {
        let noise = rng.gen_range(0..32u8);
        image::Rgba([
            x as u8 + noise,
            y as u8 + noise,
            (255 - x - y) as u8,
            255,
        ])
    })
}

fn nearest(point: &Vector3d, clusters: &[Cluster]) -> usize {
    clusters
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.center - point)
                .norm_squared()
                .total_cmp(&(b.center - point).norm_squared())
        })
        .map_or(0, |(i, _)| i)
}

fn main() -> Result<()> {
    env_logger::init();

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("frames"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    let source = synthetic_image(&mut rng);
    let data = points_from_rgba_pixels(source.as_raw(), |i| i % 7 == 0);
    info!("sampled {} colors", data.len());

    let mut clusters: Vec<Cluster> = (0..CLUSTERS)
        .map(|_| Cluster::new(Vector3d::new(rng.gen(), rng.gen(), rng.gen())))
        .collect();
    clusters[1].state = ColorState::Original;
    clusters[2].state = ColorState::Custom(Rgba::from_hex("#ffcc00")?);
    let assignments: Vec<usize> = data.iter().map(|p| nearest(p, &clusters)).collect();

    let builder = ClusterSceneBuilder::new(OverlayConfig::default());
    let scene = builder.build(&data, &clusters, &assignments)?;

    let config = ViewerConfig {
        camera: CameraConfig {
            distance_to_plane: 0.1,
            focal_point: Vector3d::new(0.5, 0.5, 0.5),
            orbit: OrbitParams::new(2.0, 0.6, 0.4),
            ..CameraConfig::default()
        },
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(WIDTH, HEIGHT, config)?;
    let mut surface = RgbaImage::new(WIDTH as u32, HEIGHT as u32);

    // one full turn of dragging to the left, spread over the frames
    let step = WIDTH as f64 / FRAMES as f64;
    let row = HEIGHT as f64 / 2.0;
    viewer.pointer_down(Vector2::new(row, WIDTH as f64));
    for frame in 0..FRAMES {
        let stats = viewer.render_frame(&scene, &mut surface)?;
        info!(
            "frame {frame}: {} points, {} lines",
            stats.points_drawn, stats.lines_drawn
        );

        let path = output_dir.join(format!("frame_{frame:03}.png"));
        surface
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        let col = WIDTH as f64 - step * (frame + 1) as f64;
        viewer.pointer_move(Vector2::new(row + 2.0, col));
    }
    viewer.pointer_up();
    viewer.wheel(-500.0);
    viewer.render_frame(&scene, &mut surface)?;
    surface.save(output_dir.join("zoomed.png"))?;

    if let Some(timing) = viewer.metrics().summary("frame") {
        info!(
            "{} frames, mean {:.2} ms",
            timing.count,
            timing.mean().as_secs_f64() * 1e3
        );
    }
    Ok(())
}
