use crate::{Grid, GridError, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier, mapped to how many cells are punched out of the solved
/// grid. The mapping follows the classic 9×9 tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Cells removed from a solved grid at this tier.
    pub fn removed_cells(&self) -> usize {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 40,
            Difficulty::Hard => 50,
        }
    }

    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => {
                let tiers = Difficulty::all_levels()
                    .iter()
                    .map(|d| d.to_string().to_ascii_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(format!("unknown difficulty '{}' (expected {})", other, tiers))
            }
        }
    }
}

/// A generated puzzle: the punctured board (clues marked as givens) plus the
/// solved snapshot it was punched out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub grid: Grid,
    pub solution: Grid,
}

/// Sudoku puzzle generator.
///
/// Generic over its random source so tests can inject a seeded one; the
/// default is an entropy-seeded [`StdRng`]. Randomness enters the finished
/// grid only through the diagonal permutations.
pub struct Generator<R: Rng = StdRng> {
    rng: R,
}

impl Generator<StdRng> {
    /// Create an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Generator<R> {
    /// Create a generator driven by the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a puzzle of the given side length and difficulty tier.
    pub fn generate(&mut self, size: usize, difficulty: Difficulty) -> Result<Puzzle, GridError> {
        self.generate_with_removals(size, difficulty.removed_cells())
    }

    /// Generate a puzzle with an explicit removal count.
    pub fn generate_with_removals(
        &mut self,
        size: usize,
        removed_cells: usize,
    ) -> Result<Puzzle, GridError> {
        let solution = self.fill_grid(size)?;
        Ok(self.puncture(solution, removed_cells))
    }

    /// Generate a standard 9×9 puzzle. Unlike [`Generator::generate`] this
    /// cannot fail.
    pub fn generate_classic(&mut self, difficulty: Difficulty) -> Puzzle {
        let solution = self.fill_from(Grid::new_classic());
        self.puncture(solution, difficulty.removed_cells())
    }

    /// Build a fully solved grid of the given side length.
    pub fn fill_grid(&mut self, size: usize) -> Result<Grid, GridError> {
        let template = Grid::new(size)?;
        Ok(self.fill_from(template))
    }

    fn puncture(&mut self, mut solution: Grid, removed_cells: usize) -> Puzzle {
        solution.mark_givens();
        let mut grid = solution.clone();
        self.remove_cells(&mut grid, removed_cells);
        grid.mark_givens();
        Puzzle { grid, solution }
    }

    fn fill_from(&mut self, template: Grid) -> Grid {
        // A dead-ended completion (possible for non-9 sizes) gets a fresh
        // diagonal seed rather than a partial board.
        loop {
            let mut grid = template.clone();
            self.fill_diagonal(&mut grid);
            if self.fill_remaining(&mut grid, 0, 0) {
                return grid;
            }
        }
    }

    /// Fill the boxes on the main diagonal with random permutations of
    /// `1..=N`. They share no row, column, or box, so any permutation is
    /// valid by construction.
    fn fill_diagonal(&mut self, grid: &mut Grid) {
        for start in (0..grid.size()).step_by(grid.box_size()) {
            self.fill_box(grid, start, start);
        }
    }

    fn fill_box(&mut self, grid: &mut Grid, row_start: usize, col_start: usize) {
        let mut values: Vec<u8> = (1..=grid.size() as u8).collect();
        values.shuffle(&mut self.rng);
        for row in row_start..row_start + grid.box_size() {
            for col in col_start..col_start + grid.box_size() {
                grid.set_cell_unchecked(Position::new(row, col), values.pop());
            }
        }
    }

    /// Complete all non-diagonal cells by row-major backtracking: try
    /// candidates in ascending order, recurse on success, undo on dead ends.
    ///
    /// Returns `true` once the scan runs past the last row. Recursion depth is
    /// bounded by N².
    fn fill_remaining(&mut self, grid: &mut Grid, mut row: usize, mut col: usize) -> bool {
        let n = grid.size();
        let b = grid.box_size();
        loop {
            if col >= n {
                row += 1;
                col = 0;
            }
            if row >= n {
                return true;
            }
            // jump past the diagonal box intersecting this row
            let band = row - row % b;
            if col >= band && col < band + b {
                col = band + b;
                continue;
            }
            break;
        }
        let pos = Position::new(row, col);
        for num in 1..=n as u8 {
            if grid.is_valid(pos, num) {
                grid.set_cell_unchecked(pos, Some(num));
                if self.fill_remaining(grid, row, col + 1) {
                    return true;
                }
                grid.set_cell_unchecked(pos, None);
            }
        }
        false
    }

    /// Zero out exactly `count` distinct non-empty cells, picked uniformly at
    /// random with re-roll on already-empty coordinates. Counts above the
    /// number of currently filled cells are clamped so the re-roll loop
    /// terminates.
    ///
    /// Removal is purely random: nothing guarantees the punctured board has a
    /// unique completion.
    pub fn remove_cells(&mut self, grid: &mut Grid, count: usize) {
        let n = grid.size();
        let count = count.min(n * n - grid.empty_count());
        let mut removed = 0;
        while removed < count {
            let pos = Position::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));
            if grid.get(pos).is_some() {
                grid.set_cell_unchecked(pos, None);
                removed += 1;
            }
        }
    }
}

/// Generate a puzzle with an entropy-seeded generator: the punctured grid plus
/// its solved snapshot.
pub fn new_puzzle(size: usize, removed_cells: usize) -> Result<Puzzle, GridError> {
    let mut generator = Generator::new();
    generator.generate_with_removals(size, removed_cells)
}
