use chromacloud_core::Vector3d;
use chromacloud_render::overlay::point_cloud_scene;
use chromacloud_render::{Camera, CameraConfig, Framebuffer, OrbitParams};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use image::RgbaImage;
use rand::{Rng, SeedableRng};

const POINT_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];
const POINT_RADII: [u32; 2] = [1, 3];

fn shoot_scene(c: &mut Criterion) {
    let camera = Camera::new(CameraConfig {
        distance_to_plane: 0.1,
        focal_point: Vector3d::new(0.5, 0.5, 0.5),
        orbit: OrbitParams::new(2.0, 0.7, 0.4),
        ..CameraConfig::default()
    })
    .unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    let mut g = c.benchmark_group("shoot scene");
    g.sample_size(10);

    for count in POINT_COUNTS {
        let data: Vec<Vector3d> = (0..count)
            .map(|_| Vector3d::new(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        for radius in POINT_RADII {
            let scene = point_cloud_scene(&data, radius).unwrap();
            let mut framebuffer = Framebuffer::new(640, 480);
            let mut surface = RgbaImage::new(640, 480);
            g.bench_with_input(BenchmarkId::new(format!("radius {radius}"), count), &scene, |b, scene| {
                b.iter(|| camera.shoot_scene(std::hint::black_box(scene), &mut framebuffer, &mut surface).unwrap());
            });
        }
    }

    g.finish();
}


criterion_group!(benches, shoot_scene);
criterion_main!(benches);
