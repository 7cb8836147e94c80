//! Lights Out puzzle driver.
//!
//! This program:
//! 1. Scrambles or decodes a Lights Out board
//! 2. Solves it by exhaustive scan of the precomputed flip-action table
//! 3. Reports the minimum score and the winning presses in chess notation
//! 4. Can sweep the whole score landscape of a board size

use lightsout::{benchmark, generator::Scrambler, grid::TileGrid, pool::SolverPool, solver::Solver};
use std::env;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_ansi(true)
        .init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("solve") => {
            let size = parse_or(&args, 2, 5);
            let code = parse_or(&args, 3, 0);
            let json = args.iter().any(|a| a == "--json");
            solve_code(size, code, json);
        }
        Some("random") => {
            let size = parse_or(&args, 2, 5);
            let count = parse_or(&args, 3, 1);
            let seed = args.get(4).and_then(|s| s.parse().ok());
            solve_random(size, count, seed);
        }
        Some("scores") => {
            let size = parse_or(&args, 2, 3);
            print_landscape(size);
        }
        Some("benchmark") => {
            let size = parse_or(&args, 2, 3);
            let count = parse_or(&args, 3, 10);
            match benchmark::run_benchmark(size, count, true) {
                Ok(report) => report.print_results(),
                Err(e) => error!("Benchmark failed: {}", e),
            }
        }
        _ => {
            eprintln!("Usage: lightsout <command>");
            eprintln!("  solve <size> <code> [--json]   solve one board code");
            eprintln!("  random <size> [count] [seed]   scramble and solve boards");
            eprintln!("  scores <size>                  sweep the score landscape");
            eprintln!("  benchmark <size> [count]       time builds, solves and the sweep");
        }
    }
}

fn parse_or<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn solve_code(size: usize, code: i32, json: bool) {
    let solver = match Solver::new(size) {
        Ok(solver) => solver,
        Err(e) => {
            error!("Failed to build solver: {}", e);
            return;
        }
    };
    let mut grid = TileGrid::new(solver.size());
    grid.load_code(code);
    info!("Board {:#x}:", code);
    print_board(&grid);

    match solver.solve(code) {
        Ok(solution) => {
            if json {
                match serde_json::to_string_pretty(&solution) {
                    Ok(out) => println!("{out}"),
                    Err(e) => error!("Failed to encode solution: {}", e),
                }
                return;
            }
            info!("Number of steps: {}", solution.score);
            for &winning in &solution.codes {
                info!("Presses: {}", display_presses(&solver, winning));
            }
        }
        Err(e) => error!("Failed to solve board: {}", e),
    }
}

fn solve_random(size: usize, count: usize, seed: Option<u64>) {
    let pool = SolverPool::default();
    let mut scrambler = match seed {
        Some(seed) => Scrambler::from_seed(seed),
        None => Scrambler::new(),
    };

    for round in 1..=count {
        let solver = match pool.get(size) {
            Ok(solver) => solver,
            Err(e) => {
                error!("Failed to build solver: {}", e);
                return;
            }
        };
        let mut grid = TileGrid::new(solver.size());
        scrambler.scramble(&mut grid);
        info!("Board {}/{} (code {:#x}):", round, count, grid.to_code());
        print_board(&grid);

        match solver.solve_grid(&mut grid) {
            Ok(solution) => {
                info!(
                    "Code: {}, Number of steps: {}",
                    display_presses(&solver, solution.codes[0]),
                    solution.score
                );
                print_board(&grid);
                if grid.is_monochrome() {
                    info!("✅ Board is monochrome!");
                } else {
                    info!("⚠️  {} tiles left for manual cleanup", grid.count_tiles(true).min(grid.count_tiles(false)));
                }
            }
            Err(e) => error!("Failed to solve board: {}", e),
        }
    }
}

fn print_landscape(size: usize) {
    let solver = Solver::in_memory(size);
    let scores = solver.all_scores();
    let worst = scores.iter().copied().max().unwrap_or(0);
    info!("Score landscape for size {} ({} boards):", solver.size(), scores.len());
    for target in 0..=worst {
        let count = scores.iter().filter(|&&s| s == target).count();
        info!("  score {}: {} boards", target, count);
    }
    if let Some(hardest) = scores.iter().position(|&s| s == worst) {
        info!("Example hardest board: {:#x} (score {})", hardest, worst);
    }
}

fn display_presses(solver: &Solver, code: i32) -> String {
    if code == 0 {
        "(none)".to_string()
    } else {
        solver.to_chess_string(code)
    }
}

/// Prints a board with lit tiles as `■` and unlit as `·`.
fn print_board(grid: &TileGrid) {
    let n = grid.size() as i32;
    let inner = "─".repeat(grid.size() * 2 + 1);
    println!("┌{inner}┐");
    for y in 0..n {
        print!("│ ");
        for x in 0..n {
            print!("{} ", if grid.get(x, y) { '■' } else { '·' });
        }
        println!("│");
    }
    println!("└{inner}┘");
}
