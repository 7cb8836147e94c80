use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lightsout::{generator::Scrambler, solver::Solver};

fn table_build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    group.sample_size(10); // size-4 builds a 65k-entry table per iteration
    for size in 1..=4usize {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| Solver::in_memory(size))
        });
    }
    group.finish();
}

fn solve_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    for size in 2..=4usize {
        let solver = Solver::in_memory(size);
        let mut scrambler = Scrambler::from_seed(0xBEEF);
        let code = scrambler.random_code(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &code, |b, &code| {
            b.iter(|| solver.solve(code).unwrap())
        });
    }
    group.finish();
}

fn landscape_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_landscape");
    group.sample_size(10);
    for size in 2..=3usize {
        let solver = Solver::in_memory(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &solver, |b, solver| {
            b.iter(|| solver.all_scores())
        });
    }
    group.finish();
}

criterion_group!(benches, table_build_benchmark, solve_benchmark, landscape_benchmark);
criterion_main!(benches);
