//! Benchmarks for blast sequence analysis
//!
//! Measures performance of:
//! - Endpoint normalization
//! - Validation
//! - Metrics
//! - Cumulative chain scheduling

use blastline_model::{BlastConnection, DrillPoint, PatternData};
use blastline_sequence::{calculate_metrics, normalize_connections, validate, ChainSchedule, Timeline};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Square grid of holes with each row chained left to right and rows tied
/// at the first column.
fn grid(side: usize) -> (PatternData, Vec<BlastConnection>) {
    let id = |row: usize, col: usize| format!("R{}C{}", row, col);

    let holes = (0..side)
        .flat_map(|row| (0..side).map(move |col| (row, col)))
        .map(|(row, col)| DrillPoint::new(id(row, col), col as f64 * 3.0, row as f64 * 2.5))
        .collect();

    let mut conns = Vec::new();
    for row in 0..side {
        for col in 1..side {
            conns.push(BlastConnection::new(
                format!("W{}", conns.len()),
                id(row, col - 1),
                id(row, col),
                (row * 100 + col * 25) as u32,
            ));
        }
        if row > 0 {
            conns.push(BlastConnection::new(
                format!("W{}", conns.len()),
                id(row - 1, 0),
                id(row, 0),
                (row * 100) as u32,
            ));
        }
    }

    (PatternData::new(holes), conns)
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for &side in &[5usize, 10, 20, 40] {
        let (pattern, conns) = grid(side);
        group.throughput(Throughput::Elements(conns.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &conns, |b, conns| {
            b.iter(|| normalize_connections(Some(black_box(&pattern)), conns.clone()))
        });
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for &side in &[5usize, 10, 20, 40] {
        let (pattern, conns) = grid(side);
        group.throughput(Throughput::Elements(conns.len() as u64));

        group.bench_with_input(BenchmarkId::new("validate", side), &conns, |b, conns| {
            b.iter(|| validate(Some(black_box(&pattern)), black_box(conns)))
        });
        group.bench_with_input(BenchmarkId::new("metrics", side), &conns, |b, conns| {
            b.iter(|| calculate_metrics(Some(black_box(&pattern)), black_box(conns)))
        });
        group.bench_with_input(BenchmarkId::new("timeline", side), &conns, |b, conns| {
            b.iter(|| Timeline::build(black_box(conns)))
        });
        group.bench_with_input(BenchmarkId::new("chain", side), &conns, |b, conns| {
            b.iter(|| ChainSchedule::build(black_box(conns)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_analysis);
criterion_main!(benches);
