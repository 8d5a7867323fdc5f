//! Benchmarks for collision detection over a populated container.
//!
//! Run with: `cargo bench -p gas-physics`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gas_physics::{CollisionDetector, ContainerConfig, IdealGasContainer, Particle, RegionConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn populate(container: &IdealGasContainer, count: usize) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(42);
    let bounds = container.inner_bounds();
    (0..count)
        .map(|_| {
            let mut p = Particle::new_heavy().at(
                rng.random_range(bounds.min_x() + 125.0..bounds.max_x() - 125.0),
                rng.random_range(bounds.min_y() + 125.0..bounds.max_y() - 125.0),
            );
            p.set_velocity_polar(517.0, rng.random_range(0.0..std::f64::consts::TAU));
            p
        })
        .collect()
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_update");
    let container = IdealGasContainer::new(ContainerConfig::default()).unwrap();

    for count in [100usize, 500, 1000, 2000] {
        group.bench_with_input(BenchmarkId::new("regions", count), &count, |b, &count| {
            let mut detector = CollisionDetector::new(RegionConfig::default()).unwrap();
            let mut particles = populate(&container, count);
            b.iter(|| {
                for p in &mut particles {
                    p.step(0.04);
                }
                black_box(detector.update(&container, &mut [&mut particles[..]]))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
