/// A square board of two-state tiles plus a press-parity table.
///
/// Tile state lives in a single dense vector and the packed bitmask view is
/// derived on demand, so the two representations cannot drift apart.
/// Coordinates are signed: every operation silently ignores out-of-bounds
/// cells, which keeps neighbor arithmetic at the edges branch-free for
/// callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    size: usize,
    state: Vec<bool>,
    // Parity of presses centered on each cell: true = odd.
    press: Vec<bool>,
}

impl TileGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            state: vec![false; size * size],
            press: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let n = self.size as i32;
        if x >= 0 && y >= 0 && x < n && y < n {
            Some((y * n + x) as usize)
        } else {
            None
        }
    }

    /// Tile state at `(x, y)`; out-of-bounds reads as unlit.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |i| self.state[i])
    }

    /// Whether the cell has been pressed an odd number of times.
    pub fn pressed(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |i| self.press[i])
    }

    /// Flips a single tile. Out-of-bounds coordinates are a no-op.
    /// Press parity is untouched.
    pub fn force(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.state[i] = !self.state[i];
        }
    }

    /// The puzzle's primary move: flips `(x, y)` and its four axis
    /// neighbors, each independently bounds-checked. When `flip_parity`
    /// is set, also toggles the press bit at the center. Applying the
    /// same press twice restores both tiles and parity.
    pub fn imbue(&mut self, x: i32, y: i32, flip_parity: bool) {
        self.force(x, y);
        self.force(x - 1, y);
        self.force(x, y - 1);
        self.force(x + 1, y);
        self.force(x, y + 1);

        if flip_parity {
            if let Some(i) = self.index(x, y) {
                self.press[i] = !self.press[i];
            }
        }
    }

    /// All tiles unlit, all press parities even.
    pub fn reset(&mut self) {
        self.state.fill(false);
        self.press.fill(false);
    }

    pub fn count_tiles(&self, value: bool) -> usize {
        self.state.iter().filter(|&&s| s == value).count()
    }

    /// Win condition: every tile the same, either color.
    pub fn is_monochrome(&self) -> bool {
        self.count_tiles(true) == 0 || self.count_tiles(false) == 0
    }

    /// Packs the tile state into a bitmask, bit `i` for cell
    /// `(i % size, i / size)`. Only valid while `size^2 <= 31`.
    pub fn to_code(&self) -> i32 {
        debug_assert!(self.size * self.size <= 31, "board code overflows i32");
        let mut code = 0;
        for (i, &on) in self.state.iter().enumerate() {
            if on {
                code ^= 1 << i;
            }
        }
        code
    }

    /// Inverse of [`to_code`](Self::to_code). Press parity is not part of
    /// the encoding and is left untouched.
    pub fn load_code(&mut self, code: i32) {
        debug_assert!(self.size * self.size <= 31, "board code overflows i32");
        for (i, on) in self.state.iter_mut().enumerate() {
            *on = code & (1 << i) != 0;
        }
    }

    /// Flips every tile on the board.
    pub fn invert(&mut self) {
        for s in &mut self.state {
            *s = !*s;
        }
    }

    /// Classic light chasing: for each row but the last, press below every
    /// lit tile, sweeping the lit tiles into the bottom row.
    pub fn chase_down(&mut self) {
        let n = self.size as i32;
        for y in 0..n - 1 {
            for x in 0..n {
                if self.get(x, y) {
                    self.imbue(x, y + 1, true);
                }
            }
        }
    }

    /// Chase-based solver: chase down, then try every top-row press
    /// pattern until the board clears. Returns whether an all-unlit state
    /// was reached; on failure the board is left as it was after the
    /// initial chase. Only boards reachable by presses alone are solvable
    /// this way.
    pub fn solve_by_chasing(&mut self) -> bool {
        self.chase_down();
        for pattern in 0u64..1 << self.size {
            let saved_state = self.state.clone();
            let saved_press = self.press.clone();
            for x in 0..self.size as i32 {
                if pattern & (1 << x) != 0 {
                    self.imbue(x, 0, true);
                }
            }
            self.chase_down();
            if self.count_tiles(true) == 0 {
                return true;
            }
            self.state = saved_state;
            self.press = saved_press;
        }
        false
    }

    /// Presses every odd-parity cell once, returning the board to its
    /// state before the recorded presses and the parity table to all even.
    pub fn unpress_all(&mut self) {
        let n = self.size as i32;
        for y in 0..n {
            for x in 0..n {
                if self.pressed(x, y) {
                    self.imbue(x, y, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_is_self_inverse() {
        let mut grid = TileGrid::new(4);
        for y in 0..4 {
            for x in 0..4 {
                let before = grid.clone();
                grid.force(x, y);
                assert_ne!(grid.get(x, y), before.get(x, y));
                grid.force(x, y);
                assert_eq!(grid, before);
            }
        }
    }

    #[test]
    fn force_out_of_bounds_is_noop() {
        let mut grid = TileGrid::new(3);
        let before = grid.clone();
        grid.force(-1, 0);
        grid.force(0, -1);
        grid.force(3, 0);
        grid.force(0, 3);
        assert_eq!(grid, before);
    }

    #[test]
    fn imbue_flips_center_and_neighbors() {
        let mut grid = TileGrid::new(3);
        grid.imbue(1, 1, true);
        assert!(grid.get(1, 1));
        assert!(grid.get(0, 1));
        assert!(grid.get(2, 1));
        assert!(grid.get(1, 0));
        assert!(grid.get(1, 2));
        assert!(!grid.get(0, 0));
        assert!(!grid.get(2, 2));
        assert!(grid.pressed(1, 1));
        assert_eq!(grid.count_tiles(true), 5);
    }

    #[test]
    fn imbue_at_corner_skips_off_grid_neighbors() {
        let mut grid = TileGrid::new(3);
        grid.imbue(0, 0, true);
        assert_eq!(grid.count_tiles(true), 3);
        assert!(grid.get(0, 0));
        assert!(grid.get(1, 0));
        assert!(grid.get(0, 1));
    }

    #[test]
    fn imbue_is_self_inverse_including_parity() {
        let mut grid = TileGrid::new(5);
        grid.imbue(2, 3, true);
        let pressed_once = grid.clone();
        grid.imbue(2, 3, true);
        assert_eq!(grid, TileGrid::new(5));
        assert_ne!(pressed_once, grid);
    }

    #[test]
    fn imbue_without_parity_leaves_press_table_alone() {
        let mut grid = TileGrid::new(3);
        grid.imbue(1, 1, false);
        assert!(!grid.pressed(1, 1));
        assert_eq!(grid.count_tiles(true), 5);
    }

    #[test]
    fn code_round_trip() {
        let mut grid = TileGrid::new(4);
        grid.imbue(0, 0, true);
        grid.imbue(3, 2, false);
        grid.force(1, 1);
        let code = grid.to_code();

        let mut reloaded = TileGrid::new(4);
        reloaded.load_code(code);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(reloaded.get(x, y), grid.get(x, y));
            }
        }
        assert_eq!(reloaded.to_code(), code);
        // Parity is not part of the encoding.
        assert!(!reloaded.pressed(0, 0));
    }

    #[test]
    fn code_bit_order_matches_cell_layout() {
        let mut grid = TileGrid::new(3);
        grid.force(2, 1); // index 5
        assert_eq!(grid.to_code(), 1 << 5);
        grid.force(0, 0); // index 0
        assert_eq!(grid.to_code(), (1 << 5) | 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut grid = TileGrid::new(3);
        grid.imbue(1, 1, true);
        grid.reset();
        assert_eq!(grid, TileGrid::new(3));
        assert!(grid.is_monochrome());
    }

    #[test]
    fn invert_flips_every_tile() {
        let mut grid = TileGrid::new(3);
        grid.force(0, 0);
        grid.invert();
        assert!(!grid.get(0, 0));
        assert_eq!(grid.count_tiles(true), 8);
        assert!(!grid.is_monochrome());
    }

    #[test]
    fn monochrome_counts_either_color() {
        let mut grid = TileGrid::new(2);
        assert!(grid.is_monochrome());
        grid.invert();
        assert!(grid.is_monochrome());
        grid.force(0, 0);
        assert!(!grid.is_monochrome());
    }

    #[test]
    fn unpress_all_undoes_recorded_presses() {
        let mut grid = TileGrid::new(4);
        grid.force(3, 3);
        let before = grid.clone();
        grid.imbue(0, 0, true);
        grid.imbue(2, 1, true);
        grid.imbue(1, 3, true);
        grid.unpress_all();
        assert_eq!(grid, before);
    }

    #[test]
    fn chase_solver_clears_press_scrambled_boards() {
        let mut grid = TileGrid::new(5);
        for &(x, y) in &[(0, 0), (2, 3), (4, 4), (1, 2), (3, 0)] {
            grid.imbue(x, y, false);
        }
        assert!(grid.solve_by_chasing());
        assert_eq!(grid.count_tiles(true), 0);
    }

    #[test]
    fn chase_solver_reports_unsolvable_boards() {
        // A single forced tile on a 5x5 board is not reachable by presses.
        let mut grid = TileGrid::new(5);
        grid.force(0, 0);
        assert!(!grid.solve_by_chasing());
    }
}
