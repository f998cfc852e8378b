//! Sudoku generation and live-play engine.
//!
//! The generator seeds the boxes on the main diagonal with random permutations
//! (they share no row, column, or box, so no checking is needed), completes the
//! rest with recursive backtracking, then removes cells to shape difficulty.
//! The same row/column/box validity queries drive both generation and live
//! play. [`Session`] layers a cursor, pencil sketches, submit, and reset on top
//! for a presentation shell to call; the shell itself (rendering, input
//! devices) is out of scope here.

mod error;
mod generator;
mod grid;
mod session;

pub use error::GridError;
pub use generator::{new_puzzle, Difficulty, Generator, Puzzle};
pub use grid::{Cell, Grid, Position};
pub use session::{Outcome, Session};
