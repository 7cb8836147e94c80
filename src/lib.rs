use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod benchmark;
pub mod generator;
pub mod grid;
pub mod pool;
pub mod solver;

#[derive(Debug, Error)]
pub enum LightsOutError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("grid size {grid} does not match solver size {solver}")]
    SizeMismatch { grid: usize, solver: usize },
    #[error("board code {code} out of range for size {size}")]
    InvalidCode { code: i32, size: usize },
    #[error("Benchmark error: {0}")]
    BenchmarkError(String),
}

/// Outcome of a solve: every press-subset code that ties the minimum score.
///
/// A code is a bitmask over cells, bit `i` meaning cell `(i % size, i / size)`.
/// The same encoding is used for board states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Tying press-subset codes, ascending.
    pub codes: Vec<i32>,
    /// Presses made plus the cheaper of the two single-tile cleanups
    /// (turn the remaining lit tiles off, or the remaining unlit tiles on).
    pub score: u32,
}

pub type Result<T> = std::result::Result<T, LightsOutError>;
