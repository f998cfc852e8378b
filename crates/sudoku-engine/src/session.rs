use crate::{Difficulty, Generator, Grid, GridError, Position, Puzzle};
use std::collections::HashMap;

/// How a finished board turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// One interactive game: the live board, the dealt puzzle kept for reset, and
/// the solved snapshot.
///
/// A presentation shell drives this through the cursor/sketch/submit surface
/// and renders the returned state; all calls are serialized by the single
/// `&mut self` owner. Sketches are pencil marks held outside the grid and
/// only touch the board when submitted.
pub struct Session {
    grid: Grid,
    original: Grid,
    solution: Grid,
    difficulty: Difficulty,
    selected: Option<Position>,
    sketches: HashMap<Position, u8>,
}

impl Session {
    /// Start a fresh 9×9 game at the given difficulty.
    pub fn new(difficulty: Difficulty) -> Self {
        let mut generator = Generator::new();
        Self::from_puzzle(generator.generate_classic(difficulty), difficulty)
    }

    /// Build a session around an already-generated puzzle.
    pub fn from_puzzle(puzzle: Puzzle, difficulty: Difficulty) -> Self {
        Self {
            grid: puzzle.grid.clone(),
            original: puzzle.grid,
            solution: puzzle.solution,
            difficulty,
            selected: None,
            sketches: HashMap::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Move the cursor. Out-of-range coordinates are surfaced, not clamped.
    pub fn select(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.selected = Some(self.grid.position(row, col)?);
        Ok(())
    }

    /// Pencil a value on the selected cell. Refused (returning `false`) with
    /// no cursor, on a given cell, or for out-of-domain values.
    pub fn sketch(&mut self, value: u8) -> bool {
        let Some(pos) = self.selected else {
            return false;
        };
        if value == 0 || value as usize > self.grid.size() {
            return false;
        }
        if self.grid.cell(pos).is_given() {
            return false;
        }
        self.sketches.insert(pos, value);
        true
    }

    /// Erase the selected cell's sketch, if any.
    pub fn clear_sketch(&mut self) -> bool {
        match self.selected {
            Some(pos) => self.sketches.remove(&pos).is_some(),
            None => false,
        }
    }

    pub fn sketch_at(&self, pos: Position) -> Option<u8> {
        self.sketches.get(&pos).copied()
    }

    /// Commit the selected cell's sketch as its value.
    ///
    /// This is the player's guess path: non-given cells accept any in-domain
    /// value, right or wrong, so a filled-but-incorrect board is reachable.
    /// Returns `false` when there is nothing to commit.
    pub fn submit(&mut self) -> bool {
        let Some(pos) = self.selected else {
            return false;
        };
        let Some(value) = self.sketches.remove(&pos) else {
            return false;
        };
        self.grid.set_cell_unchecked(pos, Some(value));
        true
    }

    /// The strict engine path: place a value only if the target cell is empty
    /// and the placement passes validity. `Ok(false)` is a normal no-op.
    pub fn set_value(&mut self, row: usize, col: usize, value: u8) -> Result<bool, GridError> {
        let pos = self.grid.position(row, col)?;
        Ok(self.grid.set_value(pos, value))
    }

    /// Restore the board to the puzzle as dealt, dropping sketches. Given
    /// flags come back with the snapshot.
    pub fn reset(&mut self) {
        self.grid = self.original.clone();
        self.sketches.clear();
    }

    pub fn is_full(&self) -> bool {
        self.grid.is_full()
    }

    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    pub fn is_correct(&self) -> bool {
        self.grid.is_correct()
    }

    /// `None` until the board is full; then won iff the filled board is a
    /// correct solution.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.grid.is_full() {
            return None;
        }
        if self.grid.is_correct() {
            Some(Outcome::Won)
        } else {
            Some(Outcome::Lost)
        }
    }
}
