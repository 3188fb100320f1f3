//! Benchmarks for the network manager
//!
//! Measures performance of:
//! - Building a long line one segment at a time
//! - Splitting a line by removing its middle segment
//! - Merging many arms through one connector
//! - Destination selection (the per-step routing read)

use conduit_network::{
    Direction, ManagerConfig, NetworkManager, OpenWorld, Position, RoundRobinCursor, RoutingMode,
    SegmentType, StaticWorld,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn item() -> SegmentType {
    SegmentType::new("conduit:item")
}

fn line_manager(world: &StaticWorld, length: i32) -> NetworkManager {
    let mut manager = NetworkManager::with_defaults(ManagerConfig::seeded(1));
    for x in 0..length {
        manager
            .add_segment(world, Position::new(x, 0, 0), &item())
            .unwrap();
    }
    manager
}

/// Benchmark building a line segment by segment
fn bench_build_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_line");
    let world = StaticWorld::new();

    for &length in &[16i32, 64, 256] {
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &n| {
            b.iter(|| line_manager(&world, black_box(n)))
        });
    }
    group.finish();
}

/// Benchmark splitting a line in two and joining it back
fn bench_split_and_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_and_join");
    let world = StaticWorld::new();

    for &length in &[16i32, 64, 256] {
        let mut manager = line_manager(&world, length);
        let middle = Position::new(length / 2, 0, 0);
        group.bench_with_input(BenchmarkId::from_parameter(length), &middle, |b, &pos| {
            b.iter(|| {
                manager.remove_segment(&world, pos).unwrap();
                manager.add_segment(&world, pos, &item()).unwrap();
            })
        });
    }
    group.finish();
}

/// Benchmark merging six arms through a single connector
fn bench_merge_arms(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_arms");

    for &arm in &[4i32, 16, 64] {
        group.bench_with_input(BenchmarkId::new("arm_length", arm), &arm, |b, &n| {
            b.iter(|| {
                let mut manager = NetworkManager::with_defaults(ManagerConfig::seeded(1));
                for dir in Direction::ALL {
                    let step = dir.offset();
                    for i in 1..=n {
                        let pos = Position::new(step.x * i, step.y * i, step.z * i);
                        manager.add_segment(&OpenWorld, pos, &item()).unwrap();
                    }
                }
                manager
                    .add_segment(&OpenWorld, Position::ORIGIN, &item())
                    .unwrap();
                black_box(manager.network_count())
            })
        });
    }
    group.finish();
}

/// Benchmark destination selection on a line with an interface on every segment
fn bench_select_destination(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_destination");

    for &length in &[16i32, 64] {
        let mut world = StaticWorld::new();
        for x in 0..length {
            world.attach(Position::new(x, 0, 0), Direction::Up);
        }
        let manager = line_manager(&world, length);

        for mode in RoutingMode::ALL {
            let mut cursor = RoundRobinCursor::new();
            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), length),
                &Position::ORIGIN,
                |b, &from| {
                    b.iter(|| manager.select_destination(&world, black_box(from), mode, &mut cursor, None))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_line,
    bench_split_and_join,
    bench_merge_arms,
    bench_select_destination,
);
criterion_main!(benches);
