//! Benchmarks für die Frame-Hotpaths:
//! - Simulation::step in Ruhe und während eines Drags
//! - Abtastung der Band-Kurve je Parametrisierung

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use portfolio_badge::{
    BadgeOptions, Camera3D, CatmullRomCurve3, CurveType, PointerEvent, Simulation,
    RIBBON_SAMPLE_COUNT,
};
use std::hint::black_box;

const DT: f32 = 1.0 / 60.0;

fn bench_simulation_step(c: &mut Criterion) {
    let camera = Camera3D::new();

    c.bench_function("simulation_step_idle", |b| {
        let mut sim = Simulation::new(&BadgeOptions::new()).expect("Szene");
        b.iter(|| black_box(sim.step(black_box(DT), &[], &camera).steps))
    });

    c.bench_function("simulation_step_dragging", |b| {
        let mut sim = Simulation::new(&BadgeOptions::new()).expect("Szene");
        // Kette einschwingen lassen, dann greifen
        for _ in 0..240 {
            sim.step(DT, &[], &camera);
        }
        let card = sim.card_position().expect("Karte");
        let start = camera.project(card).expect("sichtbar").truncate();
        sim.step(DT, &[PointerEvent::Down { pointer_id: 1, ndc: start }], &camera);

        let mut phase = 0.0f32;
        b.iter(|| {
            phase += 0.05;
            let ndc = start + Vec2::new(phase.sin() * 0.2, 0.15);
            let events = [PointerEvent::Move { pointer_id: 1, ndc }];
            black_box(sim.step(DT, &events, &camera).steps)
        })
    });
}

fn bench_curve_sampling(c: &mut Criterion) {
    let points = [
        Vec3::new(0.8, 1.1, -0.3),
        Vec3::new(0.5, 2.2, -0.1),
        Vec3::new(0.2, 3.05, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
    ];
    let mut out = [Vec3::ZERO; RIBBON_SAMPLE_COUNT];

    for curve_type in [CurveType::Uniform, CurveType::Centripetal, CurveType::Chordal] {
        let curve = CatmullRomCurve3::new(points, curve_type);
        c.bench_with_input(
            BenchmarkId::new("curve_sample_32", format!("{curve_type:?}")),
            &curve,
            |b, curve| {
                b.iter(|| {
                    curve.sample_into(black_box(&mut out));
                    black_box(out[RIBBON_SAMPLE_COUNT / 2])
                })
            },
        );
    }
}

criterion_group!(core_benches, bench_simulation_step, bench_curve_sampling);
criterion_main!(core_benches);
