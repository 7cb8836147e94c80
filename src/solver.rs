use crate::{grid::TileGrid, LightsOutError, Result, Solution};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Hard ceiling on solvable board sizes. The flip-action table holds
/// `2^(size^2)` entries: 128 MiB of `i32` at size 5, and hopeless beyond.
pub const MAX_SOLVER_SIZE: usize = 5;

/// Exhaustive minimum-score solver for one board size.
///
/// Construction is expensive: it builds (or reloads from disk) the full
/// flip-action table, one entry per subset of presses. The table is
/// immutable afterwards, so a built `Solver` can be shared freely across
/// threads; see [`SolverPool`](crate::pool::SolverPool) for size-keyed
/// reuse.
pub struct Solver {
    size: usize,
    // flip_actions[code] = combined tile effect of pressing every cell
    // flagged in `code`. GF(2) linear: entry[i ^ j] == entry[i] ^ entry[j].
    flip_actions: Vec<i32>,
}

impl Solver {
    /// Builds or reloads the solver for `size`, keeping the table cache in
    /// the current directory. Sizes above [`MAX_SOLVER_SIZE`] are clamped.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_cache_dir(size, Path::new("."))
    }

    /// Like [`new`](Self::new) with an explicit cache directory.
    ///
    /// The cache file `flip-actions-<size>.bin` is a flat array of
    /// little-endian `i32`. A missing file or one of the wrong length is a
    /// cache miss: the table is recomputed and the file rewritten (via a
    /// temporary sibling and rename, so a crash cannot leave a truncated
    /// cache behind).
    pub fn with_cache_dir(size: usize, dir: &Path) -> Result<Self> {
        let size = clamp_size(size);
        let path = dir.join(cache_file_name(size));
        let len = 1usize << (size * size);

        if let Some(flip_actions) = load_cache(&path, len)? {
            info!("loaded flip-action table for size {} from {}", size, path.display());
            return Ok(Self { size, flip_actions });
        }

        let solver = Self::build(size);
        solver.persist(dir)?;
        Ok(solver)
    }

    /// Builds the table without touching the filesystem.
    pub fn in_memory(size: usize) -> Self {
        Self::build(clamp_size(size))
    }

    fn build(size: usize) -> Self {
        let cells = size * size;
        let basis: Vec<i32> = (0..cells).map(|i| flip_action_basis(i, size)).collect();
        debug!("building flip-action table for size {} ({} entries)", size, 1usize << cells);
        let flip_actions = (0..1usize << cells)
            .into_par_iter()
            .map(|code| fold_flip_action(code as i32, &basis))
            .collect();
        Self { size, flip_actions }
    }

    /// Writes this solver's table to `dir`, returning the cache path.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(cache_file_name(self.size));
        write_cache(&path, &self.flip_actions)?;
        info!("wrote flip-action table for size {} to {}", self.size, path.display());
        Ok(path)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn flip_actions(&self) -> &[i32] {
        &self.flip_actions
    }

    /// Finds every press subset minimizing
    /// `popcount(subset) + min(lit, cells - lit)` for the board `grid_code`,
    /// where `lit` counts the tiles still lit after those presses. The
    /// second term is the cheaper of forcing the leftovers dark or forcing
    /// them all lit; either monochrome color wins.
    pub fn solve(&self, grid_code: i32) -> Result<Solution> {
        let cells = (self.size * self.size) as u32;
        if grid_code < 0 || i64::from(grid_code) >= 1i64 << cells {
            return Err(LightsOutError::InvalidCode { code: grid_code, size: self.size });
        }

        let best = self
            .flip_actions
            .par_iter()
            .enumerate()
            .fold(Best::new, |mut best, (code, &action)| {
                let lit = (grid_code ^ action).count_ones();
                best.offer(code as i32, (code as i32).count_ones() + lit.min(cells - lit));
                best
            })
            .reduce(Best::new, Best::merge);

        let mut codes = best.codes;
        codes.sort_unstable();
        debug!("solved board {:#x}: score {}, {} tying subsets", grid_code, best.score, codes.len());
        Ok(Solution { codes, score: best.score })
    }

    /// Convenience overload: encodes `grid`, solves, then applies the first
    /// winning subset's presses to the grid (parity recorded) so it ends in
    /// its solved configuration.
    pub fn solve_grid(&self, grid: &mut TileGrid) -> Result<Solution> {
        if grid.size() != self.size {
            return Err(LightsOutError::SizeMismatch { grid: grid.size(), solver: self.size });
        }
        let solution = self.solve(grid.to_code())?;
        if let Some(&winning) = solution.codes.first() {
            let n = self.size as i32;
            for i in 0..(self.size * self.size) as i32 {
                if winning & (1 << i) != 0 {
                    grid.imbue(i % n, i / n, true);
                }
            }
        }
        Ok(solution)
    }

    /// Renders a press-subset code as space-separated chess-style labels,
    /// column `a..` and row `1..` counted from the bottom.
    pub fn to_chess_string(&self, code: i32) -> String {
        (0..self.size * self.size)
            .filter(|i| code & (1 << i) != 0)
            .map(|i| self.cell_label(i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn cell_label(&self, index: usize) -> String {
        let (x, y) = (index % self.size, index / self.size);
        let file = (b'a' + x as u8) as char;
        format!("{file}{}", self.size - y)
    }

    /// Minimal score for every board code at once.
    ///
    /// Breadth-first from the two monochrome targets, expanding each code
    /// by one forced tile or one press per step. First assignment is the
    /// minimum, and the whole landscape costs one pass over the state
    /// space instead of a full scan per board.
    pub fn all_scores(&self) -> Vec<u8> {
        let cells = self.size * self.size;
        let len = 1usize << cells;
        let all_on = (len - 1) as i32;

        let mut scores = vec![u8::MAX; len];
        let mut frontier = vec![0i32];
        scores[0] = 0;
        if all_on != 0 {
            scores[all_on as usize] = 0;
            frontier.push(all_on);
        }

        let mut depth = 0u8;
        while !frontier.is_empty() {
            depth += 1;
            let mut next = Vec::new();
            for &code in &frontier {
                for i in 0..cells {
                    // Single-bit subsets of the table are exactly the
                    // per-cell press effects.
                    for step in [code ^ (1 << i), code ^ self.flip_actions[1 << i]] {
                        let slot = &mut scores[step as usize];
                        if *slot == u8::MAX {
                            *slot = depth;
                            next.push(step);
                        }
                    }
                }
            }
            frontier = next;
        }
        scores
    }
}

pub(crate) fn clamp_size(size: usize) -> usize {
    if size > MAX_SOLVER_SIZE {
        warn!("grid size {} exceeds the brute-force ceiling, clamping to {}", size, MAX_SOLVER_SIZE);
        MAX_SOLVER_SIZE
    } else {
        size
    }
}

fn cache_file_name(size: usize) -> String {
    format!("flip-actions-{size}.bin")
}

/// Tile effect of a single press at cell `index`: the cell itself plus its
/// in-bounds axis neighbors.
fn flip_action_basis(index: usize, size: usize) -> i32 {
    let (x, y) = (index % size, index / size);
    let mut action = 1 << index;
    if x > 0 {
        action ^= 1 << (y * size + x - 1);
    }
    if x < size - 1 {
        action ^= 1 << (y * size + x + 1);
    }
    if y > 0 {
        action ^= 1 << ((y - 1) * size + x);
    }
    if y < size - 1 {
        action ^= 1 << ((y + 1) * size + x);
    }
    action
}

/// XOR-fold of the basis entries named by `code`'s set bits. Presses
/// commute and self-cancel, so this is the whole-subset effect.
fn fold_flip_action(code: i32, basis: &[i32]) -> i32 {
    let mut action = 0;
    let mut bits = code as u32;
    while bits != 0 {
        action ^= basis[bits.trailing_zeros() as usize];
        bits &= bits - 1;
    }
    action
}

fn load_cache(path: &Path, len: usize) -> Result<Option<Vec<i32>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let expected = 4 * len as u64;
    let actual = file.metadata()?.len();
    if actual != expected {
        warn!(
            "cache file {} is {} bytes, expected {}; treating as a miss",
            path.display(),
            actual,
            expected
        );
        return Ok(None);
    }
    let mut bytes = vec![0u8; expected as usize];
    file.read_exact(&mut bytes)?;
    Ok(Some(
        bytes
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    ))
}

fn write_cache(path: &Path, table: &[i32]) -> Result<()> {
    let tmp = path.with_extension("bin.tmp");
    let mut bytes = Vec::with_capacity(table.len() * 4);
    for &action in table {
        bytes.extend_from_slice(&action.to_le_bytes());
    }
    File::create(&tmp)?.write_all(&bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// Running minimum plus the tie set, mergeable across rayon chunks.
struct Best {
    score: u32,
    codes: Vec<i32>,
}

impl Best {
    fn new() -> Self {
        Self { score: u32::MAX, codes: Vec::new() }
    }

    fn offer(&mut self, code: i32, cost: u32) {
        if cost < self.score {
            self.score = cost;
            self.codes.clear();
            self.codes.push(code);
        } else if cost == self.score {
            self.codes.push(code);
        }
    }

    fn merge(mut a: Self, mut b: Self) -> Self {
        if b.score < a.score {
            b
        } else {
            if b.score == a.score {
                a.codes.append(&mut b.codes);
            }
            a
        }
    }
}
