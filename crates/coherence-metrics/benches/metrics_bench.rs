//! Benchmarks for the metrics engine
//!
//! Run with: cargo bench -p coherence-metrics

use coherence_ir::{Circuit, QubitId};
use coherence_metrics::{MetricsEngine, depth};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

/// Layered circuit: a row of `h`, a row of `rz`, then a ladder of `cx`.
fn layered(num_qubits: u32, rounds: usize) -> Circuit {
    let mut builder = Circuit::builder(num_qubits);
    for _ in 0..rounds {
        for i in 0..num_qubits {
            builder.h(QubitId(i)).unwrap();
            builder.rz(PI / 4.0, QubitId(i)).unwrap();
        }
        for i in (0..num_qubits - 1).step_by(2) {
            builder.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
    }
    builder.build().unwrap()
}

/// Benchmark depth calculation
fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");

    for num_qubits in &[5, 10, 20, 50] {
        let circuit = layered(*num_qubits, 5);
        group.bench_with_input(
            BenchmarkId::new("layered", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(depth(circuit)));
            },
        );
    }

    group.finish();
}

/// Benchmark the full analysis
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = MetricsEngine::default();

    for num_qubits in &[5, 20, 50, 100] {
        let circuit = layered(*num_qubits, 10);
        group.bench_with_input(
            BenchmarkId::new("layered", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(engine.analyze(circuit)));
            },
        );
    }

    for num_qubits in &[4, 8, 16] {
        let circuit = Circuit::qft(*num_qubits).unwrap();
        group.bench_with_input(BenchmarkId::new("qft", num_qubits), &circuit, |b, circuit| {
            b.iter(|| {
                let metrics = engine.analyze(circuit);
                black_box(engine.alerts(&metrics))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_depth, bench_analyze);

criterion_main!(benches);
