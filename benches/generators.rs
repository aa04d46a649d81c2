//! Benchmarks for the CPU generators.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use morphgen::params::{NeighborSearch, NoiseParams, SwarmParams, Viewport};
use morphgen::particles::{ParticleSystem, Swarm};
use morphgen::spline;
use morphgen::time::TickContext;
use morphgen::NoiseFieldRenderer;

fn bench_spline(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline_build");

    for count in [8usize, 64, 512] {
        let points: Vec<Vec2> = (0..count)
            .map(|i| {
                let a = i as f32 / count as f32 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin()) * (100.0 + (a * 5.0).sin() * 20.0)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| black_box(spline::build(points, 1.0, true)))
        });
    }

    group.finish();
}

fn bench_noise_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_field");
    let ctx = TickContext::new(Viewport::new(800.0, 600.0));

    for octaves in [1u32, 4, 8] {
        let params = NoiseParams {
            octaves,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("octaves", octaves), &params, |b, params| {
            let mut renderer = NoiseFieldRenderer::new(42);
            b.iter(|| black_box(renderer.tick(params, &ctx)))
        });
    }

    group.finish();
}

fn bench_swarm(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm_update");
    let ctx = TickContext::new(Viewport::new(1200.0, 800.0));

    for count in [300u32, 1000, 3000] {
        for search in [NeighborSearch::BruteForce, NeighborSearch::Grid] {
            let params = SwarmParams {
                count,
                neighbor_search: search,
                ..Default::default()
            };
            let name = match search {
                NeighborSearch::BruteForce => "brute_force",
                NeighborSearch::Grid => "grid",
            };
            group.bench_with_input(BenchmarkId::new(name, count), &params, |b, params| {
                let mut swarm = Swarm::new(1);
                swarm.update(params, &ctx);
                b.iter(|| {
                    swarm.update(params, &ctx);
                    black_box(swarm.len())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_spline, bench_noise_field, bench_swarm);
criterion_main!(benches);
