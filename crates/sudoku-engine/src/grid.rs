use crate::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A single cell: its value (`None` = empty) and whether it is a given clue.
///
/// Given cells are the clues dealt with the puzzle; a session must never
/// overwrite them. The flag is derived from "value present at load time" and
/// only re-derived along the reset path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: Option<u8>,
    given: bool,
}

impl Cell {
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    pub fn is_given(&self) -> bool {
        self.given
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// An N×N Sudoku board.
///
/// N must be a perfect square so that the `box_size × box_size` sub-boxes tile
/// it exactly. Values range over `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    box_size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid of the given side length.
    ///
    /// Fails with [`GridError::InvalidSideLength`] when the side length is not
    /// a perfect square (box size undefined) or its values would not fit a
    /// digit.
    pub fn new(size: usize) -> Result<Self, GridError> {
        let box_size = (size as f64).sqrt() as usize;
        if size == 0 || box_size * box_size != size || size > u8::MAX as usize {
            return Err(GridError::InvalidSideLength(size));
        }
        Ok(Self {
            size,
            box_size,
            cells: vec![Cell::default(); size * size],
        })
    }

    /// Create an empty standard 9×9 grid.
    pub fn new_classic() -> Self {
        Self {
            size: 9,
            box_size: 3,
            cells: vec![Cell::default(); 81],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn box_size(&self) -> usize {
        self.box_size
    }

    /// Validate a coordinate pair, surfacing [`GridError::OutOfBounds`].
    pub fn position(&self, row: usize, col: usize) -> Result<Position, GridError> {
        if row >= self.size || col >= self.size {
            return Err(GridError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(Position::new(row, col))
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.row < self.size && pos.col < self.size,
            "position ({}, {}) out of range",
            pos.row,
            pos.col
        );
        pos.row * self.size + pos.col
    }

    /// Borrow a cell. Panics if `pos` is out of range; use [`Grid::position`]
    /// for coordinates that have not been validated.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// Get a cell's value (`None` = empty).
    pub fn get(&self, pos: Position) -> Option<u8> {
        self.cell(pos).value
    }

    /// Set a cell's value without any validity or occupancy checks.
    ///
    /// Generation and reset paths use this; live play goes through
    /// [`Grid::set_value`].
    pub fn set_cell_unchecked(&mut self, pos: Position, value: Option<u8>) {
        self.cell_mut(pos).value = value;
    }

    /// Set a cell's value and mark it as a given clue.
    pub fn set_given(&mut self, pos: Position, value: u8) {
        let cell = self.cell_mut(pos);
        cell.value = Some(value);
        cell.given = true;
    }

    /// Re-derive every given flag from "cell is non-empty".
    pub fn mark_givens(&mut self) {
        for cell in &mut self.cells {
            cell.given = cell.value.is_some();
        }
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|c| c.given).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// True iff `num` does not occur anywhere in `row`.
    pub fn valid_in_row(&self, row: usize, num: u8) -> bool {
        (0..self.size).all(|col| self.get(Position::new(row, col)) != Some(num))
    }

    /// True iff `num` does not occur anywhere in `col`.
    pub fn valid_in_col(&self, col: usize, num: u8) -> bool {
        (0..self.size).all(|row| self.get(Position::new(row, col)) != Some(num))
    }

    /// True iff `num` does not occur in the box whose top-left corner is
    /// `(row_start, col_start)`. Callers align corners to a box boundary via
    /// `coord - coord % box_size`.
    pub fn valid_in_box(&self, row_start: usize, col_start: usize, num: u8) -> bool {
        for row in row_start..row_start + self.box_size {
            for col in col_start..col_start + self.box_size {
                if self.get(Position::new(row, col)) == Some(num) {
                    return false;
                }
            }
        }
        true
    }

    /// Would placing `num` at `pos` violate row, column, or box uniqueness,
    /// judging the grid as it stands everywhere except `pos` itself?
    ///
    /// The probed cell is excluded from the scan; the query never mutates the
    /// grid.
    pub fn is_valid(&self, pos: Position, num: u8) -> bool {
        for col in 0..self.size {
            if col != pos.col && self.get(Position::new(pos.row, col)) == Some(num) {
                return false;
            }
        }
        for row in 0..self.size {
            if row != pos.row && self.get(Position::new(row, pos.col)) == Some(num) {
                return false;
            }
        }
        let row_start = pos.row - pos.row % self.box_size;
        let col_start = pos.col - pos.col % self.box_size;
        for row in row_start..row_start + self.box_size {
            for col in col_start..col_start + self.box_size {
                if (row, col) != (pos.row, pos.col)
                    && self.get(Position::new(row, col)) == Some(num)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Place `num` at `pos` if the cell is empty and the placement is valid.
    ///
    /// Returns `false` without touching the grid otherwise; a normal outcome,
    /// not an error.
    pub fn set_value(&mut self, pos: Position, num: u8) -> bool {
        if num == 0 || num as usize > self.size {
            return false;
        }
        if self.cell(pos).value.is_some() || !self.is_valid(pos, num) {
            return false;
        }
        self.cell_mut(pos).value = Some(num);
        true
    }

    /// True iff no cell is empty. Says nothing about consistency.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_some())
    }

    /// True iff every cell is filled AND still passes [`Grid::is_valid`]
    /// against the rest of the board. A filled-but-contradictory grid is not
    /// complete.
    pub fn is_complete(&self) -> bool {
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Position::new(row, col);
                match self.get(pos) {
                    Some(value) => {
                        if !self.is_valid(pos, value) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }

    /// True iff every row, column, and box is exactly the set `{1..=N}`.
    pub fn is_correct(&self) -> bool {
        let n = self.size;
        let b = self.box_size;
        for row in 0..n {
            if !self.region_is_permutation((0..n).map(|col| Position::new(row, col))) {
                return false;
            }
        }
        for col in 0..n {
            if !self.region_is_permutation((0..n).map(|row| Position::new(row, col))) {
                return false;
            }
        }
        for box_row in (0..n).step_by(b) {
            for box_col in (0..n).step_by(b) {
                let positions = (box_row..box_row + b).flat_map(|row| {
                    (box_col..box_col + b).map(move |col| Position::new(row, col))
                });
                if !self.region_is_permutation(positions) {
                    return false;
                }
            }
        }
        true
    }

    fn region_is_permutation(&self, positions: impl Iterator<Item = Position>) -> bool {
        let mut seen = vec![false; self.size + 1];
        for pos in positions {
            match self.get(pos) {
                Some(v) if v >= 1 && v as usize <= self.size && !seen[v as usize] => {
                    seen[v as usize] = true;
                }
                _ => return false,
            }
        }
        true
    }

    /// Parse a grid from a flat string of `size²` base-36 digits (`1`-`9`,
    /// then `a`-`z`), with `0` or `.` for empty. Non-empty cells become
    /// givens, matching how a dealt board is loaded. Returns `None` for
    /// lengths that are not a valid board area, stray characters, or values
    /// above the side length. The base-36 form covers sizes up to 25.
    pub fn from_string(s: &str) -> Option<Self> {
        let size = (s.len() as f64).sqrt() as usize;
        if size * size != s.len() {
            return None;
        }
        let mut grid = Grid::new(size).ok()?;
        for (i, ch) in s.chars().enumerate() {
            let value = match ch {
                '.' | '0' => continue,
                _ => ch.to_digit(36)? as u8,
            };
            if value as usize > size {
                return None;
            }
            grid.set_given(Position::new(i / size, i % size), value);
        }
        Some(grid)
    }

    /// The inverse of [`Grid::from_string`]: one base-36 digit per cell,
    /// `0` = empty.
    pub fn to_string_compact(&self) -> String {
        self.cells
            .iter()
            .map(|c| match c.value {
                Some(v) => char::from_digit(v as u32, 36).unwrap_or('?'),
                None => '0',
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.box_size;
        let segment = "-".repeat(2 * b + 1);
        let mut border = String::from("+");
        for _ in 0..b {
            border.push_str(&segment);
            border.push('+');
        }
        for row in 0..self.size {
            if row % b == 0 {
                writeln!(f, "{}", border)?;
            }
            for col in 0..self.size {
                if col % b == 0 {
                    write!(f, "| ")?;
                }
                match self.get(Position::new(row, col)) {
                    Some(v) => {
                        let digit = char::from_digit(v as u32, 36)
                            .unwrap_or('?')
                            .to_ascii_uppercase();
                        write!(f, "{} ", digit)?;
                    }
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "{}", border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cyclic-shift solved grid: shift 3 per row within a band, 1 per band.
    const SOLVED: &str =
        "123456789456789123789123456234567891567891234891234567345678912678912345912345678";

    fn solved() -> Grid {
        Grid::from_string(SOLVED).unwrap()
    }

    #[test]
    fn rejects_non_square_side_lengths() {
        assert_eq!(Grid::new(8), Err(GridError::InvalidSideLength(8)));
        assert_eq!(Grid::new(0), Err(GridError::InvalidSideLength(0)));
        assert!(Grid::new(4).is_ok());
        assert!(Grid::new(9).is_ok());
        assert!(Grid::new(16).is_ok());
    }

    #[test]
    fn position_bounds_are_surfaced() {
        let grid = Grid::new_classic();
        assert!(grid.position(8, 8).is_ok());
        assert_eq!(
            grid.position(9, 0),
            Err(GridError::OutOfBounds {
                row: 9,
                col: 0,
                size: 9
            })
        );
        assert_eq!(
            grid.position(0, 42),
            Err(GridError::OutOfBounds {
                row: 0,
                col: 42,
                size: 9
            })
        );
    }

    #[test]
    fn from_string_marks_givens_and_round_trips() {
        let grid = solved();
        assert_eq!(grid.to_string_compact(), SOLVED);
        assert_eq!(grid.given_count(), 81);
        assert!(grid.cell(Position::new(0, 0)).is_given());

        let partial =
            Grid::from_string(&format!("0{}", &SOLVED[1..])).unwrap();
        assert!(!partial.cell(Position::new(0, 0)).is_given());
        assert_eq!(partial.given_count(), 80);
    }

    #[test]
    fn from_string_rejects_garbage() {
        assert!(Grid::from_string("123").is_none());
        assert!(Grid::from_string(&"x".repeat(81)).is_none());
        // value 5 cannot appear on a 4x4 board
        assert!(Grid::from_string("5000000000000000").is_none());
    }

    #[test]
    fn compact_codec_round_trips_double_digit_values() {
        let mut grid = Grid::new(16).unwrap();
        grid.set_given(Position::new(0, 0), 10);
        grid.set_given(Position::new(15, 15), 16);
        let s = grid.to_string_compact();
        assert_eq!(s.len(), 256);
        assert!(s.starts_with('a'));
        assert!(s.ends_with('g'));

        let back = Grid::from_string(&s).unwrap();
        assert_eq!(back.get(Position::new(0, 0)), Some(10));
        assert_eq!(back.get(Position::new(15, 15)), Some(16));
        assert_eq!(back.to_string_compact(), s);
    }

    #[test]
    fn region_predicates() {
        let mut grid = Grid::new_classic();
        grid.set_cell_unchecked(Position::new(0, 4), Some(7));
        assert!(!grid.valid_in_row(0, 7));
        assert!(grid.valid_in_row(1, 7));
        assert!(!grid.valid_in_col(4, 7));
        assert!(grid.valid_in_col(3, 7));
        assert!(!grid.valid_in_box(0, 3, 7));
        assert!(grid.valid_in_box(0, 0, 7));
    }

    #[test]
    fn is_valid_judges_cell_against_the_rest() {
        let grid = solved();
        // Every placed value is still valid in its own cell.
        for row in 0..9 {
            for col in 0..9 {
                let pos = Position::new(row, col);
                let v = grid.get(pos).unwrap();
                assert!(grid.is_valid(pos, v));
            }
        }
        // But a row neighbour's value is not.
        let neighbour = grid.get(Position::new(0, 1)).unwrap();
        assert!(!grid.is_valid(Position::new(0, 0), neighbour));
    }

    #[test]
    fn is_valid_is_side_effect_free() {
        let grid = solved();
        let before = grid.clone();
        for row in 0..9 {
            for col in 0..9 {
                for num in 1..=9 {
                    grid.is_valid(Position::new(row, col), num);
                }
            }
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn set_value_only_fills_empty_valid_cells() {
        let mut grid = solved();
        let pos = Position::new(4, 4);
        let original = grid.get(pos).unwrap();
        grid.set_cell_unchecked(pos, None);

        // wrong value: a row neighbour's digit
        let clash = grid.get(Position::new(4, 5)).unwrap();
        assert!(!grid.set_value(pos, clash));
        assert_eq!(grid.get(pos), None);

        // out-of-domain values are no-ops
        assert!(!grid.set_value(pos, 0));
        assert!(!grid.set_value(pos, 10));

        assert!(grid.set_value(pos, original));
        assert_eq!(grid.get(pos), Some(original));

        // occupied cells never change, whatever the proposed value
        assert!(!grid.set_value(pos, original));
        assert!(!grid.set_value(pos, clash));
        assert_eq!(grid.get(pos), Some(original));
    }

    #[test]
    fn completeness_requires_consistency_not_just_fullness() {
        let mut grid = solved();
        assert!(grid.is_full());
        assert!(grid.is_complete());
        // idempotent without mutation
        assert!(grid.is_complete());

        // Flip one cell to its row neighbour's value: full but contradictory.
        let neighbour = grid.get(Position::new(0, 1)).unwrap();
        grid.set_cell_unchecked(Position::new(0, 0), Some(neighbour));
        assert!(grid.is_full());
        assert!(!grid.is_complete());
        assert!(!grid.is_correct());
        assert!(!grid.is_valid(Position::new(0, 0), neighbour));
    }

    #[test]
    fn is_correct_checks_the_full_partition() {
        assert!(solved().is_correct());
        let mut grid = solved();
        grid.set_cell_unchecked(Position::new(8, 8), None);
        assert!(!grid.is_correct());
    }

    #[test]
    fn serde_round_trip() {
        let grid = solved();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, back);
    }

    #[test]
    fn display_renders_boxes() {
        let mut grid = Grid::new(4).unwrap();
        grid.set_cell_unchecked(Position::new(0, 0), Some(1));
        let out = grid.to_string();
        assert!(out.starts_with("+-----+-----+"));
        assert!(out.contains("| 1 . | . . |"));
    }
}
