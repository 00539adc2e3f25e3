//! Benchmarks for Coherence circuit operations
//!
//! Run with: cargo bench -p coherence-ir

use coherence_ir::{Circuit, GateRegistry, QubitId, neutral};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

/// Benchmark adding gates through the builder
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut builder = Circuit::builder(10);
        b.iter(|| {
            builder.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut builder = Circuit::builder(10);
        b.iter(|| {
            builder
                .rx(black_box(PI / 4.0), black_box(QubitId(0)))
                .unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut builder = Circuit::builder(10);
        b.iter(|| {
            builder
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark GHZ state circuit creation
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 5, 10, 20, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(Circuit::ghz(n).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark the neutral JSON reader and canonical encoding
fn bench_neutral_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("neutral_json");
    let registry = GateRegistry::standard();

    for num_qubits in &[4, 8, 16] {
        let circuit = Circuit::qft(*num_qubits).unwrap();
        let text = neutral::to_string(&circuit).unwrap();

        group.bench_with_input(BenchmarkId::new("parse", num_qubits), &text, |b, text| {
            b.iter(|| black_box(neutral::from_str(text, &registry).unwrap()));
        });
        group.bench_with_input(
            BenchmarkId::new("canonical_bytes", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(neutral::to_canonical_bytes(circuit).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_addition,
    bench_ghz_circuit,
    bench_neutral_json,
);

criterion_main!(benches);
