//! Place the letters of a list of words on a 4x4 board so that every word can be traced through
//! touching cells (including diagonals), using each cell at most once per word.

pub mod adjacency;
pub mod error;
pub mod grid;
pub mod model;
pub mod solver;
pub mod symbols;
pub mod types;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::error::GridError;
pub use crate::grid::{project, render_grid, trace_word, LetterGrid};
pub use crate::model::{build_model, Constraint, ConstraintModel};
pub use crate::solver::{solve, solve_with_options, Assignment, SolverOptions, Statistics};
pub use crate::symbols::{allocate_symbols, normalize_word, SymbolSet};
pub use crate::types::{Cell, Symbol, SymbolId};

/// Number of columns on the board.
pub const GRID_WIDTH: usize = 4;

/// Number of rows on the board.
pub const GRID_HEIGHT: usize = 4;

/// Number of cells on the board, which is also the exact number of symbols placed.
pub const CELL_COUNT: usize = GRID_WIDTH * GRID_HEIGHT;

/// The most neighbors any cell can have.
pub const MAX_NEIGHBORS: usize = 8;

/// How many search states should we visit between deadline checks?
pub const INTERRUPT_FREQUENCY: u64 = 10;

/// Settings for the whole words-to-grid pipeline.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Seed for the filler letters. If absent, one is picked at random and reported back.
    pub seed: Option<u64>,
    pub solver: SolverOptions,
}

/// A finished board along with everything needed to reproduce or inspect it.
#[derive(Debug)]
pub struct GeneratedGrid {
    pub seed: u64,
    pub model: ConstraintModel,
    pub assignment: Assignment,
    pub letters: LetterGrid,
    pub statistics: Statistics,
}

/// Allocate symbols for `words`, build the constraint model, and solve it.
pub fn generate_grid<S: AsRef<str>>(
    words: &[S],
    options: &GenerateOptions,
) -> Result<GeneratedGrid, GridError> {
    let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let symbols = allocate_symbols(words, &mut rng)?;
    let model = build_model(symbols, words)?;
    let result = solve_with_options(&model, &options.solver)?;
    let letters = project(&result.assignment);

    Ok(GeneratedGrid {
        seed,
        model,
        assignment: result.assignment,
        letters,
        statistics: result.statistics,
    })
}
