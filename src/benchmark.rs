use crate::{generator::Scrambler, solver::Solver, LightsOutError, Result};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Results from a benchmark run
#[derive(Debug, Serialize)]
pub struct BenchmarkReport {
    pub size: usize,
    pub build_duration: Duration,
    /// Time to reload the table from the on-disk cache, when measured.
    pub cache_reload_duration: Option<Duration>,
    pub solve_count: usize,
    pub min_solve: Duration,
    pub avg_solve: Duration,
    pub max_solve: Duration,
    pub landscape_duration: Duration,
    pub landscape: ScoreLandscape,
}

/// Distribution of minimal scores across every board of one size.
#[derive(Debug, Default, Serialize)]
pub struct ScoreLandscape {
    /// `counts[s]` = number of board codes whose minimal score is `s`.
    pub counts: Vec<usize>,
    pub worst_score: u8,
}

impl ScoreLandscape {
    fn from_scores(scores: &[u8]) -> Self {
        let mut landscape = Self::default();
        for &score in scores {
            let s = score as usize;
            if s >= landscape.counts.len() {
                landscape.counts.resize(s + 1, 0);
            }
            landscape.counts[s] += 1;
            landscape.worst_score = landscape.worst_score.max(score);
        }
        landscape
    }
}

impl BenchmarkReport {
    /// Pretty prints the benchmark results
    pub fn print_results(&self) {
        println!("\n=== Benchmark Results (size {}) ===", self.size);
        println!("Table Build: {:?}", self.build_duration);
        if let Some(reload) = self.cache_reload_duration {
            println!("Cache Reload: {:?}", reload);
        }
        println!("Solves: {}", self.solve_count);
        println!("Min Solve: {:?}", self.min_solve);
        println!("Average Solve: {:?}", self.avg_solve);
        println!("Max Solve: {:?}", self.max_solve);
        println!("Score Landscape ({:?}):", self.landscape_duration);
        let total: usize = self.landscape.counts.iter().sum();
        for (score, &count) in self.landscape.counts.iter().enumerate() {
            println!(
                "  score {}: {} boards ({:.1}%)",
                score,
                count,
                (count as f64 / total as f64) * 100.0
            );
        }
        println!("Worst Score: {}", self.landscape.worst_score);
    }
}

/// Times table construction, a batch of solve scans over random boards, and
/// the full score landscape. With `with_cache`, also persists the table to
/// a scratch directory and times a cache reload.
pub fn run_benchmark(size: usize, solve_count: usize, with_cache: bool) -> Result<BenchmarkReport> {
    if solve_count == 0 {
        return Err(LightsOutError::BenchmarkError(
            "Solve count must be greater than 0".to_string(),
        ));
    }

    info!("Benchmarking size {} with {} solves...", size, solve_count);
    let build_start = Instant::now();
    let solver = Solver::in_memory(size);
    let build_duration = build_start.elapsed();
    let size = solver.size();

    let cache_reload_duration = if with_cache {
        let dir = std::env::temp_dir().join(format!("lightsout-bench-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        solver.persist(&dir)?;
        let reload_start = Instant::now();
        let reloaded = Solver::with_cache_dir(size, &dir)?;
        let reload = reload_start.elapsed();
        debug_assert_eq!(reloaded.flip_actions(), solver.flip_actions());
        let _ = std::fs::remove_dir_all(&dir);
        Some(reload)
    } else {
        None
    };

    let mut scrambler = Scrambler::from_seed(0xC0FFEE);
    let mut min_solve = Duration::MAX;
    let mut max_solve = Duration::ZERO;
    let mut total_solve = Duration::ZERO;
    for i in 0..solve_count {
        let code = scrambler.random_code(size);
        let solve_start = Instant::now();
        let solution = solver.solve(code)?;
        let duration = solve_start.elapsed();
        debug!(
            "Solve {}/{}: board {:#x}, score {}, {:?}",
            i + 1,
            solve_count,
            code,
            solution.score,
            duration
        );
        min_solve = min_solve.min(duration);
        max_solve = max_solve.max(duration);
        total_solve += duration;
    }

    let landscape_start = Instant::now();
    let scores = solver.all_scores();
    let landscape_duration = landscape_start.elapsed();

    Ok(BenchmarkReport {
        size,
        build_duration,
        cache_reload_duration,
        solve_count,
        min_solve,
        avg_solve: total_solve / solve_count as u32,
        max_solve,
        landscape_duration,
        landscape: ScoreLandscape::from_scores(&scores),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_small_size() {
        let report = run_benchmark(2, 4, false).unwrap();
        assert_eq!(report.size, 2);
        assert_eq!(report.solve_count, 4);
        assert!(report.cache_reload_duration.is_none());
        assert_eq!(report.landscape.counts.iter().sum::<usize>(), 16);
        // Two monochrome boards score zero on a 2x2.
        assert_eq!(report.landscape.counts[0], 2);
    }

    #[test]
    fn benchmark_with_cache_reload() {
        let report = run_benchmark(2, 2, true).unwrap();
        assert!(report.cache_reload_duration.is_some());
    }

    #[test]
    fn benchmark_rejects_zero_solves() {
        match run_benchmark(2, 0, false) {
            Err(LightsOutError::BenchmarkError(_)) => (),
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
