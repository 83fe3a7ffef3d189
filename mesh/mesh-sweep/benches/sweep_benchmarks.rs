//! Benchmarks for sweep recomputes.
//!
//! Run with: cargo bench -p mesh-sweep
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-sweep -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-sweep -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_sweep::{
    BlendProfile, DeformStack, FalloffSpec, LocationEdit, Noise, ProfileEdit, Sweep, SweepConfig,
    falloff,
};
use nalgebra::Vector3;
use sweep_curves::{Easing, ShapeConfig, ShapeKind};

// =============================================================================
// Test Configurations
// =============================================================================

/// Closed helix tube with every kind of edit in the stack.
fn loaded_config(rings: usize, points: usize) -> SweepConfig {
    let mut blend_target = ShapeConfig::ellipse(1.5, 1.5, points);
    blend_target.kind = ShapeKind::Ellipse {
        bump_steps: 6,
        bump_amount: 0.3,
        bump_exponent: 2.0,
    };

    let deform = DeformStack {
        twist: 2.0,
        path_edits: vec![LocationEdit::relative(
            0.5,
            Vector3::new(1.0, 1.0, 0.0),
            FalloffSpec::run(0, rings / 2).with_easing(Easing::InOut, 2.0),
        )],
        blends: vec![BlendProfile {
            shape: blend_target,
            rings: FalloffSpec::all().with_easing(Easing::Linear, 1.0).mirrored(),
            factor: 0.8,
            ..BlendProfile::default()
        }],
        profile_edits: vec![ProfileEdit {
            amount: 0.2,
            points: FalloffSpec::run(0, 2).with_repeats(points / 4, 2),
            ..ProfileEdit::default()
        }],
        noise: Noise {
            amplitude: Vector3::new(0.01, 0.01, 0.01),
            seed: 1,
        },
        ..DeformStack::default()
    };

    SweepConfig::new(
        ShapeConfig::helix(4.0, 8.0, 3.0, rings),
        ShapeConfig::ellipse(1.0, 0.5, points),
    )
    .with_deform(deform)
}

// =============================================================================
// Sweep Benchmarks
// =============================================================================

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("Recompute");

    let test_cases = [
        ("64x16", loaded_config(64, 16)),
        ("256x32", loaded_config(256, 32)),
        ("1024x64", loaded_config(1024, 64)),
    ];

    for (name, config) in &test_cases {
        let Ok(mut sweep) = Sweep::new(config) else {
            continue;
        };
        group.throughput(Throughput::Elements(sweep.locs().len() as u64));

        group.bench_with_input(BenchmarkId::new("build", name), config, |b, config| {
            b.iter(|| Sweep::new(black_box(config)));
        });

        group.bench_function(BenchmarkId::new("recompute", name), |b| {
            b.iter(|| sweep.recompute());
        });
    }

    group.finish();
}

fn bench_falloff(c: &mut Criterion) {
    let mut group = c.benchmark_group("Falloff");

    let spec = FalloffSpec::run(3, 17)
        .with_easing(Easing::InOut, 3.0)
        .mirrored()
        .with_repeats(64, 5);

    for total in [256usize, 4096] {
        group.bench_with_input(BenchmarkId::new("repeated_run", total), &total, |b, &total| {
            b.iter(|| falloff::compute(black_box(total), black_box(&spec)));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_recompute, bench_falloff);
criterion_main!(benches);
