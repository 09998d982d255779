//! Benchmarks for the per-frame simulation and rasterization work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stardrift::backdrop::Backdrop;
use stardrift::camera::Camera;
use stardrift::canvas::{Canvas, PixelCanvas};
use stardrift::config::{
    BackdropConfig, OrbitConfig, SatelliteConfig, SceneConfig, StarFieldConfig,
};
use stardrift::input::Pointer;
use stardrift::orbit::OrbitalSimulator;
use stardrift::scene::Scene;
use stardrift::starfield::StarField;
use stardrift::visuals::Color;
use stardrift::Vec2;

fn bench_star_field_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_field_step");

    for count in [300usize, 3_000, 30_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = StarFieldConfig {
                star_count: count,
                ..StarFieldConfig::default()
            };
            let mut field = StarField::new(config, Some(1));
            field.resize(1280, 720);
            let pointer = Pointer::at(640.0, 360.0);
            b.iter(|| field.step_with(black_box(&pointer)))
        });
    }

    group.finish();
}

fn bench_star_field_draw(c: &mut Criterion) {
    let mut field = StarField::new(StarFieldConfig::default(), Some(1));
    field.resize(1280, 720);
    let mut canvas = PixelCanvas::new(1280, 720);

    c.bench_function("star_field_draw_300", |b| {
        b.iter(|| {
            canvas.clear(Color::SPACE);
            field.draw(black_box(&mut canvas));
        })
    });
}

fn bench_orbit(c: &mut Criterion) {
    let mut group = c.benchmark_group("orbit");

    group.bench_function("step_single", |b| {
        let mut sim = OrbitalSimulator::new(OrbitConfig::default(), Some(1));
        let mut progress = 0.0f32;
        b.iter(|| {
            progress = (progress + 0.001) % 1.0;
            sim.step(black_box(progress), 1.0 / 60.0);
        })
    });

    group.bench_function("step_fleet_64", |b| {
        let config = OrbitConfig {
            satellites: (0..64)
                .map(|i| SatelliteConfig {
                    start_angle: i as f32 * 0.1,
                    angular_offset: i as f32 * 0.05,
                    scale: 0.5,
                })
                .collect(),
            ..OrbitConfig::default()
        };
        let mut sim = OrbitalSimulator::new(config, Some(1));
        b.iter(|| sim.step(black_box(0.5), 1.0 / 60.0))
    });

    group.bench_function("draw_single", |b| {
        let sim = OrbitalSimulator::new(OrbitConfig::default(), Some(1));
        let camera = Camera::default();
        let mut canvas = PixelCanvas::new(1280, 720);
        b.iter(|| sim.draw(black_box(&mut canvas), &camera))
    });

    group.finish();
}

fn bench_backdrop(c: &mut Criterion) {
    let mut group = c.benchmark_group("backdrop");

    group.bench_function("step", |b| {
        let mut backdrop = Backdrop::new(BackdropConfig::default(), Some(1));
        b.iter(|| backdrop.step(black_box(0.3), Vec2::ZERO, 1.0 / 60.0))
    });

    group.bench_function("draw_1280x720", |b| {
        let backdrop = Backdrop::new(BackdropConfig::default(), Some(1));
        let mut canvas = PixelCanvas::new(1280, 720);
        b.iter(|| {
            canvas.clear(Color::SPACE);
            backdrop.draw(black_box(&mut canvas));
        })
    });

    group.finish();
}

fn bench_scene_frame(c: &mut Criterion) {
    let mut scene = Scene::new(SceneConfig {
        seed: Some(1),
        ..SceneConfig::default()
    });
    c.bench_function("scene_frame_1280x720", |b| b.iter(|| scene.step(black_box(1.0 / 60.0))));
}

criterion_group!(
    benches,
    bench_star_field_step,
    bench_star_field_draw,
    bench_orbit,
    bench_backdrop,
    bench_scene_frame,
);

criterion_main!(benches);
