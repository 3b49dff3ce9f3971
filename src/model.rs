//! The constraint formulation: one variable per symbol whose value is the cell it lands on, an
//! all-distinct constraint over every variable, and an adjacency constraint for each consecutive
//! pair of letters in each word.

use smallvec::SmallVec;

use crate::adjacency::adjacency_table;
use crate::error::GridError;
use crate::solver::Assignment;
use crate::symbols::{validate_word, word_symbols, SymbolSet};
use crate::types::SymbolId;
use crate::{CELL_COUNT, MAX_NEIGHBORS};

/// A single constraint over the model's variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Every listed variable takes a different cell.
    AllDistinct(SmallVec<[SymbolId; CELL_COUNT]>),

    /// The two variables take neighboring cells.
    Adjacent(SymbolId, SymbolId),
}

/// The static description of a placement problem. Nothing in here changes during search; the
/// solver keeps its own domains.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    symbols: SymbolSet,

    /// For each input word, the symbol chosen for each of its positions.
    word_paths: Vec<Vec<SymbolId>>,

    constraints: Vec<Constraint>,

    /// For each variable, every variable it shares an adjacency constraint with. A symbol can have
    /// more partners than there are neighboring cells; that just makes the model unsatisfiable.
    partners: Vec<SmallVec<[SymbolId; MAX_NEIGHBORS]>>,
}

impl ConstraintModel {
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// How many variables the model has. This is always `CELL_COUNT`.
    pub fn variable_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Iterate over the pairs of variables that must be adjacent.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (SymbolId, SymbolId)> + '_ {
        self.constraints.iter().filter_map(|constraint| match *constraint {
            Constraint::Adjacent(a, b) => Some((a, b)),
            Constraint::AllDistinct(_) => None,
        })
    }

    pub fn partners(&self, symbol_id: SymbolId) -> &[SymbolId] {
        &self.partners[symbol_id]
    }

    /// The symbols spelling out each input word, in input order.
    pub fn word_paths(&self) -> &[Vec<SymbolId>] {
        &self.word_paths
    }

    /// Does the assignment place every symbol on its own cell and keep every word's consecutive
    /// letters on neighboring cells?
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        if assignment.symbols() != &self.symbols {
            return false;
        }

        let table = adjacency_table();

        self.constraints.iter().all(|constraint| match constraint {
            Constraint::AllDistinct(symbol_ids) => symbol_ids.iter().enumerate().all(|(idx, &a)| {
                assignment.cell_of(a) < CELL_COUNT
                    && symbol_ids[idx + 1..]
                        .iter()
                        .all(|&b| assignment.cell_of(a) != assignment.cell_of(b))
            }),
            Constraint::Adjacent(a, b) => {
                table.are_adjacent(assignment.cell_of(*a), assignment.cell_of(*b))
            }
        })
    }
}

/// Build the constraint model for placing `symbols` so that every word in `words` can be traced.
/// Each position of a word uses the lowest-numbered occurrence of its letter not already used by an
/// earlier position in the same word, matching how the symbols were allocated.
pub fn build_model<S: AsRef<str>>(
    symbols: SymbolSet,
    words: &[S],
) -> Result<ConstraintModel, GridError> {
    if symbols.len() != CELL_COUNT {
        return Err(GridError::SymbolCount {
            found: symbols.len(),
        });
    }

    let mut word_paths: Vec<Vec<SymbolId>> = Vec::with_capacity(words.len());
    for word in words {
        let word = word.as_ref();
        validate_word(word)?;

        let path = word_symbols(word)
            .into_iter()
            .map(|symbol| {
                symbols
                    .id_of(symbol)
                    .ok_or(GridError::MissingSymbol { symbol })
            })
            .collect::<Result<Vec<SymbolId>, GridError>>()?;

        word_paths.push(path);
    }

    let mut constraints: Vec<Constraint> = vec![Constraint::AllDistinct(
        (0..symbols.len()).collect(),
    )];
    let mut partners: Vec<SmallVec<[SymbolId; MAX_NEIGHBORS]>> =
        (0..symbols.len()).map(|_| SmallVec::new()).collect();

    for path in &word_paths {
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);

            // Several words can ask for the same pair (e.g. "cat" and "act"); one constraint is
            // enough.
            if partners[a].contains(&b) {
                continue;
            }

            constraints.push(Constraint::Adjacent(a, b));
            partners[a].push(b);
            partners[b].push(a);
        }
    }

    log::debug!(
        "Built model with {} variables and {} adjacency constraints",
        symbols.len(),
        constraints.len() - 1,
    );

    Ok(ConstraintModel {
        symbols,
        word_paths,
        constraints,
        partners,
    })
}
