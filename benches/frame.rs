//! Benchmarks for the per-frame CPU work: simulation step and drawing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use neural_backdrop::canvas::Recorder;
use neural_backdrop::config::{BackdropConfig, ProfileConfig};
use neural_backdrop::input::PointerState;
use neural_backdrop::profile::{DeviceProfile, Viewport};
use neural_backdrop::render::Renderer;
use neural_backdrop::rules::Rule;
use neural_backdrop::spawn::SpawnContext;
use neural_backdrop::widget::NetworkState;

const BOUNDS: Vec2 = Vec2::new(1200.0, 800.0);

fn state(count: usize) -> NetworkState {
    let config = BackdropConfig::default();
    NetworkState::new(count, BOUNDS, SpawnContext::with_seed(&config.simulation, 42))
}

fn bench_step(c: &mut Criterion) {
    let config = BackdropConfig::default();
    let rules = Rule::defaults(&config.simulation);
    let mut group = c.benchmark_group("step");

    for count in [35usize, 80, 500] {
        group.bench_with_input(BenchmarkId::new("pointer_absent", count), &count, |b, &n| {
            let mut state = state(n);
            let pointer = PointerState::absent(150.0);
            b.iter(|| state.step(black_box(&rules), &pointer))
        });

        group.bench_with_input(BenchmarkId::new("pointer_present", count), &count, |b, &n| {
            let mut state = state(n);
            let pointer = PointerState::at(BOUNDS * 0.5, 150.0);
            b.iter(|| state.step(black_box(&rules), &pointer))
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let config = BackdropConfig::default();
    let renderer = Renderer::new(&config.visuals);
    let profile = DeviceProfile::resolve(&Viewport::new(BOUNDS.x, BOUNDS.y), &ProfileConfig::default());
    let mut group = c.benchmark_group("draw");

    // The pair scan is quadratic, so keep an eye on the larger counts.
    for count in [35usize, 80, 500] {
        group.bench_with_input(BenchmarkId::new("recorder", count), &count, |b, &n| {
            let state = state(n);
            let mut canvas = Recorder::new(BOUNDS.x as u32, BOUNDS.y as u32);
            b.iter(|| {
                let stats = renderer.draw(&mut canvas, black_box(&state.particles), &profile);
                canvas.take();
                black_box(stats)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_draw);
criterion_main!(benches);
