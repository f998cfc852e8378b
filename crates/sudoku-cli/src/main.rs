//! Thin command-line shell: generate one puzzle and print it. The interactive
//! surface lives in the engine's `Session`; input handling is out of scope
//! here.

use anyhow::Result;
use clap::Parser;
use sudoku_engine::{Difficulty, Generator, Puzzle};

#[derive(Parser)]
#[command(name = "sudoku", about = "Generate Sudoku puzzles", version)]
struct Args {
    /// Difficulty tier: easy, medium, or hard
    #[arg(short, long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Board side length; must be a perfect square
    #[arg(long, default_value_t = 9)]
    size: usize,

    /// Override the removal count implied by the difficulty
    #[arg(long)]
    removals: Option<usize>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Also print the solved grid
    #[arg(long)]
    solution: bool,

    /// Print the flat one-line form instead of the board
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut generator = match args.seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    };
    let removals = args
        .removals
        .unwrap_or_else(|| args.difficulty.removed_cells());
    let Puzzle { grid, solution } = generator.generate_with_removals(args.size, removals)?;

    if args.compact {
        println!("{}", grid.to_string_compact());
    } else {
        println!("{}", grid);
        println!(
            "{} | givens: {} | empty: {}",
            args.difficulty,
            grid.given_count(),
            grid.empty_count()
        );
    }

    if args.solution {
        if args.compact {
            println!("{}", solution.to_string_compact());
        } else {
            println!("\nSolution:");
            println!("{}", solution);
        }
    }

    Ok(())
}
