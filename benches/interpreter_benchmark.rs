/// Quantum BASIC Criterion benchmark suite
///
/// Covers:
///   - Engine gate throughput (H, X, CNOT) at several register sizes
///   - Measurement with collapse
///   - Expression evaluation
///   - Whole-program runs: Bell pair, GHZ, and a classical counting loop
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qbasic::core::QuantumEngine;
use qbasic::language::{Evaluator, Value, Variables};
use qbasic::{Interpreter, RunConfig};

fn engine(n: usize) -> QuantumEngine {
    let mut engine = QuantumEngine::with_seed(7);
    engine.initialize(n as i64).expect("register fits");
    engine
}

// ── Gate throughput ───────────────────────────────────────────────────────

fn bench_single_qubit_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_gates");
    for n in [4usize, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("H", n), &n, |b, &n| {
            b.iter(|| {
                let mut e = engine(n);
                for q in 0..n as i64 {
                    e.hadamard(black_box(q)).unwrap();
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("X", n), &n, |b, &n| {
            b.iter(|| {
                let mut e = engine(n);
                for q in 0..n as i64 {
                    e.pauli_x(black_box(q)).unwrap();
                }
            });
        });
    }
    group.finish();
}

fn bench_ghz_preparation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_state");
    for n in [4usize, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("GHZ", n), &n, |b, &n| {
            b.iter(|| {
                let mut e = engine(n);
                e.hadamard(0).unwrap();
                for q in 1..n as i64 {
                    e.cnot(black_box(0), black_box(q)).unwrap();
                }
            });
        });
    }
    group.finish();
}

fn bench_measure_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_all");
    for n in [4usize, 8, 12] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let mut e = engine(n);
                for q in 0..n as i64 {
                    e.hadamard(q).unwrap();
                }
                (0..n as i64).map(|q| e.measure(q).unwrap()).sum::<u8>()
            });
        });
    }
    group.finish();
}

// ── Evaluator ─────────────────────────────────────────────────────────────

fn bench_expression(c: &mut Criterion) {
    let mut vars = Variables::new();
    vars.insert("B0".into(), Value::Number(1.0));
    vars.insert("B1".into(), Value::Number(0.0));
    vars.insert("B2".into(), Value::Number(1.0));
    let ev = Evaluator::new(&vars);
    c.bench_function("evaluate_arithmetic", |b| {
        b.iter(|| ev.evaluate(black_box("B2 * 4 + B1 * 2 + B0")))
    });
    c.bench_function("evaluate_condition", |b| {
        b.iter(|| ev.evaluate_condition(black_box("B2 * 4 <= 5")))
    });
}

// ── Whole programs ────────────────────────────────────────────────────────

fn bench_program_bell(c: &mut Criterion) {
    let interpreter = Interpreter::new(RunConfig::default().with_seed(1)).unwrap();
    let src = "10 QINIT 2\n20 HADAMARD 0\n30 CNOT 0,1\n40 MEASURE 0\n50 MEASURE 1\n60 END";
    c.bench_function("program_bell", |b| {
        b.iter(|| interpreter.run(black_box(src)).unwrap())
    });
}

fn bench_program_ghz(c: &mut Criterion) {
    let interpreter = Interpreter::new(RunConfig::default().with_seed(1)).unwrap();
    let src = "\
10 QINIT 10
20 HADAMARD 0
30 LET Q = 1
40 CNOT 0,Q
50 LET Q = Q + 1
60 IF Q < 10 THEN 40
70 MEASURE 0
80 END";
    c.bench_function("program_ghz_10qubits_loop", |b| {
        b.iter(|| interpreter.run(black_box(src)).unwrap())
    });
}

fn bench_program_counting_loop(c: &mut Criterion) {
    let interpreter = Interpreter::default();
    let src = "\
10 LET I = 0
20 LET I = I + 1
30 IF I < 1000 THEN GOTO 20
40 PRINT I";
    c.bench_function("program_counting_loop_1000", |b| {
        b.iter(|| interpreter.run(black_box(src)).unwrap())
    });
}

// ── Groups ────────────────────────────────────────────────────────────────

criterion_group!(
    engine_benches,
    bench_single_qubit_gates,
    bench_ghz_preparation,
    bench_measure_all,
);
criterion_group!(evaluator_benches, bench_expression);
criterion_group!(
    program_benches,
    bench_program_bell,
    bench_program_ghz,
    bench_program_counting_loop,
);

criterion_main!(engine_benches, evaluator_benches, program_benches);
