use crate::grid::TileGrid;
use rand::prelude::*;
use rand::rngs::SmallRng;

/// Scrambles boards by pressing random cells, so every result is reachable
/// (and hence fully clearable) by presses alone.
pub struct Scrambler {
    rng: SmallRng,
}

impl Scrambler {
    pub fn new() -> Self {
        Self { rng: SmallRng::from_entropy() }
    }

    /// Deterministic scrambler for reproducible puzzles.
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    /// Resets `grid`, then presses each cell with probability 1/2. Parity
    /// is not recorded: the scramble is the puzzle, not the player's doing.
    pub fn scramble(&mut self, grid: &mut TileGrid) {
        grid.reset();
        let n = grid.size() as i32;
        for y in 0..n {
            for x in 0..n {
                if self.rng.gen_bool(0.5) {
                    grid.imbue(x, y, false);
                }
            }
        }
    }

    /// Uniformly random board code for `size`. Unlike
    /// [`scramble`](Self::scramble) the result may need forced tiles to
    /// clear.
    pub fn random_code(&mut self, size: usize) -> i32 {
        let cells = size * size;
        debug_assert!(cells <= 31, "board code overflows i32");
        let mask = ((1i64 << cells) - 1) as i32;
        self.rng.gen::<i32>() & mask
    }
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new()
    }
}
