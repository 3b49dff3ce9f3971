//! This module places symbols using a depth-first backtracking search that maintains arc
//! consistency after every tentative assignment. Variables are chosen most-constrained-first (the
//! smallest remaining domain, with ties going to the earliest symbol), and cells are tried in
//! ascending order, so the result is fully determined by the model.

use bit_set::BitSet;
use instant::{Duration, Instant};
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::adjacency::adjacency_table;
use crate::error::GridError;
use crate::model::ConstraintModel;
use crate::symbols::SymbolSet;
use crate::types::{Cell, Symbol, SymbolId};
use crate::{CELL_COUNT, INTERRUPT_FREQUENCY};

/// A struct tracking statistics about the search process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// Settings for a single solve.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    /// Give up with `GridError::Timeout` once this much time has passed.
    pub timeout: Option<Duration>,
}

/// A complete placement: every symbol on its own cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    symbols: SymbolSet,

    /// Indexed by `SymbolId`.
    cells: SmallVec<[Cell; CELL_COUNT]>,
}

impl Assignment {
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn cell_of(&self, symbol_id: SymbolId) -> Cell {
        self.cells[symbol_id]
    }

    /// Which symbol was placed on `cell`, if any.
    pub fn symbol_at(&self, cell: Cell) -> Option<SymbolId> {
        self.cells.iter().position(|&other| other == cell)
    }

    /// Iterate over (symbol, cell) pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Cell)> + '_ {
        self.symbols.iter().copied().zip(self.cells.iter().copied())
    }
}

/// The results of a successful search.
#[derive(Debug)]
pub struct SolveSuccess {
    pub assignment: Assignment,
    pub statistics: Statistics,
}

/// Data structure used in `SearchState::propagate` to track which variables have had their domains
/// narrowed and still need their partners revisited.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<SymbolId>,
    queued: BitSet,
}

impl ConsistencyQueue {
    fn new() -> ConsistencyQueue {
        ConsistencyQueue {
            queue: VecDeque::with_capacity(CELL_COUNT),
            queued: BitSet::with_capacity(CELL_COUNT),
        }
    }

    fn pop_front(&mut self) -> Option<SymbolId> {
        let symbol_id = self.queue.pop_front()?;
        self.queued.remove(symbol_id);
        Some(symbol_id)
    }

    fn enqueue(&mut self, symbol_id: SymbolId) {
        if self.queued.insert(symbol_id) {
            self.queue.push_back(symbol_id);
        }
    }
}

/// The live state of every variable at one point in the search. Domains only ever shrink; undoing
/// a choice means going back to a saved copy.
#[derive(Debug, Clone)]
struct SearchState {
    domains: SmallVec<[BitSet; CELL_COUNT]>,
    assigned: SmallVec<[Option<Cell>; CELL_COUNT]>,
}

impl SearchState {
    fn new(variable_count: usize) -> SearchState {
        let full_domain: BitSet = (0..CELL_COUNT).collect();

        SearchState {
            domains: (0..variable_count).map(|_| full_domain.clone()).collect(),
            assigned: (0..variable_count).map(|_| None).collect(),
        }
    }

    fn is_assigned(&self, symbol_id: SymbolId) -> bool {
        self.assigned[symbol_id].is_some()
    }

    /// Choose the unassigned variable with the fewest remaining cells.
    fn select_variable(&self) -> Option<SymbolId> {
        (0..self.domains.len())
            .filter(|&symbol_id| !self.is_assigned(symbol_id))
            .min_by_key(|&symbol_id| (self.domains[symbol_id].len(), symbol_id))
    }

    /// Fix `symbol_id` to `cell` and propagate the consequences. Returns false if some variable is
    /// left without any usable cell, in which case this state should be thrown away.
    fn assign(&mut self, model: &ConstraintModel, symbol_id: SymbolId, cell: Cell) -> bool {
        self.assigned[symbol_id] = Some(cell);
        self.domains[symbol_id].clear();
        self.domains[symbol_id].insert(cell);

        let mut queue = ConsistencyQueue::new();
        queue.enqueue(symbol_id);

        // No other variable can use this cell any more.
        for other_id in 0..self.domains.len() {
            if other_id == symbol_id || self.is_assigned(other_id) {
                continue;
            }
            if self.domains[other_id].remove(cell) {
                if self.domains[other_id].is_empty() {
                    return false;
                }
                queue.enqueue(other_id);
            }
        }

        self.propagate(model, queue)
    }

    /// Remove every cell from `target`'s domain that has no neighboring cell left in `source`'s
    /// domain. Returns true if anything was removed.
    fn revise(&mut self, target: SymbolId, source: SymbolId) -> bool {
        let table = adjacency_table();
        let source_domain = &self.domains[source];

        let supported: BitSet = self.domains[target]
            .iter()
            .filter(|&cell| !table.neighbor_set(cell).is_disjoint(source_domain))
            .collect();

        if supported.len() < self.domains[target].len() {
            self.domains[target] = supported;
            true
        } else {
            false
        }
    }

    /// Run AC-3 over the adjacency constraints, starting from the variables in `queue`, and then
    /// check that there's still room for everything.
    fn propagate(&mut self, model: &ConstraintModel, mut queue: ConsistencyQueue) -> bool {
        while let Some(changed_id) = queue.pop_front() {
            for &partner_id in model.partners(changed_id) {
                if self.is_assigned(partner_id) {
                    continue;
                }

                if self.revise(partner_id, changed_id) {
                    if self.domains[partner_id].is_empty() {
                        return false;
                    }
                    queue.enqueue(partner_id);
                }
            }
        }

        self.has_room(model)
    }

    /// Pigeonhole checks that arc consistency can't see on its own: the unassigned variables as a
    /// whole need at least as many cells as there are of them, and so do the unassigned partners of
    /// each placed symbol (which all have to fit around it).
    fn has_room(&self, model: &ConstraintModel) -> bool {
        let mut free_cells = BitSet::with_capacity(CELL_COUNT);
        let mut unassigned_count = 0;

        for (symbol_id, domain) in self.domains.iter().enumerate() {
            if !self.is_assigned(symbol_id) {
                free_cells.union_with(domain);
                unassigned_count += 1;
            }
        }
        if free_cells.len() < unassigned_count {
            return false;
        }

        for symbol_id in 0..self.domains.len() {
            if !self.is_assigned(symbol_id) {
                continue;
            }

            let mut neighborhood = BitSet::with_capacity(CELL_COUNT);
            let mut waiting_count = 0;

            for &partner_id in model.partners(symbol_id) {
                if !self.is_assigned(partner_id) {
                    neighborhood.union_with(&self.domains[partner_id]);
                    waiting_count += 1;
                }
            }
            if neighborhood.len() < waiting_count {
                return false;
            }
        }

        true
    }

    /// Make the model arc-consistent before any choices are made.
    fn establish_initial_consistency(&mut self, model: &ConstraintModel) -> bool {
        let mut queue = ConsistencyQueue::new();
        for symbol_id in 0..self.domains.len() {
            queue.enqueue(symbol_id);
        }

        self.propagate(model, queue)
    }
}

/// A choice point on the search stack: the variable being placed, the cells it could take, how
/// many of those we've tried, and the state to go back to before each try.
struct Frame {
    symbol_id: SymbolId,
    candidates: SmallVec<[Cell; CELL_COUNT]>,
    next_candidate: usize,
    state: SearchState,
}

/// Search for a placement satisfying every constraint in the model.
pub fn solve_with_options(
    model: &ConstraintModel,
    options: &SolverOptions,
) -> Result<SolveSuccess, GridError> {
    let start = Instant::now();
    let deadline = options.timeout.map(|timeout| start + timeout);

    let mut statistics = Statistics::default();

    log::debug!(
        "Solving for {} symbols with {} adjacency constraints",
        model.variable_count(),
        model.adjacent_pairs().count(),
    );

    let mut state = SearchState::new(model.variable_count());
    if !state.establish_initial_consistency(model) {
        log::debug!("Model is inconsistent before search");
        return Err(GridError::NoSolution);
    }

    let mut frames: Vec<Frame> = Vec::with_capacity(CELL_COUNT);

    // Pick the most constrained variable and push a frame for it, then try its candidate cells in
    // order. A candidate that survives propagation becomes the new current state and we move on to
    // the next variable; when a frame runs out of candidates we pop it and resume its parent.
    'variable_selection: loop {
        statistics.states += 1;

        if statistics.states % INTERRUPT_FREQUENCY == 0 {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    log::debug!("Search timed out: {:?}", statistics);
                    return Err(GridError::Timeout {
                        elapsed: start.elapsed(),
                    });
                }
            }
        }

        let symbol_id = match state.select_variable() {
            Some(symbol_id) => symbol_id,
            None => {
                statistics.duration = start.elapsed();
                log::debug!("Found a placement: {:?}", statistics);

                let cells = state
                    .assigned
                    .iter()
                    .map(|cell| cell.expect("Search finished with an unassigned variable"))
                    .collect();

                return Ok(SolveSuccess {
                    assignment: Assignment {
                        symbols: model.symbols().clone(),
                        cells,
                    },
                    statistics,
                });
            }
        };

        let candidates = state.domains[symbol_id].iter().collect();
        frames.push(Frame {
            symbol_id,
            candidates,
            next_candidate: 0,
            state,
        });

        while let Some(frame) = frames.last_mut() {
            let next_cell = frame.candidates.get(frame.next_candidate).copied();

            match next_cell {
                Some(cell) => {
                    frame.next_candidate += 1;

                    log::trace!(
                        "Trying {} at cell {}",
                        model.symbols().get(frame.symbol_id),
                        cell,
                    );

                    let mut candidate_state = frame.state.clone();
                    if candidate_state.assign(model, frame.symbol_id, cell) {
                        state = candidate_state;
                        continue 'variable_selection;
                    }
                }
                None => {
                    frames.pop();
                    statistics.backtracks += 1;
                }
            }
        }

        // Every candidate for the root variable failed.
        statistics.duration = start.elapsed();
        log::debug!("Search space exhausted: {:?}", statistics);

        return Err(GridError::NoSolution);
    }
}

/// Search for a placement with default options.
pub fn solve(model: &ConstraintModel) -> Result<Assignment, GridError> {
    solve_with_options(model, &SolverOptions::default()).map(|success| success.assignment)
}

#[cfg(test)]
mod tests {
    use instant::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::adjacency::adjacency_table;
    use crate::error::GridError;
    use crate::model::{build_model, ConstraintModel};
    use crate::solver::{solve, solve_with_options, Assignment, SolverOptions};
    use crate::symbols::allocate_symbols;
    use crate::types::Symbol;
    use crate::CELL_COUNT;

    fn model_for(words: &[&str]) -> ConstraintModel {
        let symbols = allocate_symbols(words, &mut StdRng::seed_from_u64(42)).unwrap();
        build_model(symbols, words).expect("Failed to build model")
    }

    fn assert_bijection(assignment: &Assignment) {
        let mut cells: Vec<usize> = assignment.iter().map(|(_, cell)| cell).collect();
        cells.sort();
        assert_eq!(cells, (0..CELL_COUNT).collect::<Vec<_>>());
    }

    fn assert_words_adjacent(model: &ConstraintModel, assignment: &Assignment) {
        let table = adjacency_table();

        for path in model.word_paths() {
            for pair in path.windows(2) {
                assert!(
                    table.are_adjacent(assignment.cell_of(pair[0]), assignment.cell_of(pair[1])),
                    "{} and {} aren't adjacent",
                    model.symbols().get(pair[0]),
                    model.symbols().get(pair[1]),
                );
            }
        }
    }

    fn solve_and_check(words: &[&str]) -> Assignment {
        let model = model_for(words);
        let assignment = solve(&model).expect("Failed to find a placement");

        assert_bijection(&assignment);
        assert_words_adjacent(&model, &assignment);
        assert!(model.is_satisfied_by(&assignment));

        assignment
    }

    #[test]
    fn test_solve_cat() {
        solve_and_check(&["cat"]);
    }

    #[test]
    fn test_solve_cat_and_dog() {
        solve_and_check(&["cat", "dog"]);
    }

    #[test]
    fn test_solve_without_words() {
        solve_and_check(&[]);
    }

    #[test]
    fn test_solve_repeated_letters() {
        let assignment = solve_and_check(&["happy", "banana", "puppy"]);

        let p1 = assignment.symbols().id_of(Symbol::new('p', 1)).unwrap();
        let p2 = assignment.symbols().id_of(Symbol::new('p', 2)).unwrap();
        assert_ne!(assignment.cell_of(p1), assignment.cell_of(p2));
    }

    #[test]
    fn test_solve_sixteen_letter_chain() {
        solve_and_check(&["abcdefghijklmnop"]);
    }

    #[test]
    fn test_solve_several_overlapping_words() {
        solve_and_check(&["stone", "notes", "onset", "tones"]);
    }

    #[test]
    fn test_sixteen_letter_chain_with_overloaded_letter() {
        // `a` needs nine distinct neighbors, but no cell has more than eight.
        let model = model_for(&[
            "abcdefghijklmnop",
            "ac",
            "ad",
            "ae",
            "af",
            "ag",
            "ah",
            "ai",
            "aj",
        ]);

        let err = solve(&model).expect_err("Found an impossible placement??");
        assert_eq!(err, GridError::NoSolution);
    }

    #[test]
    fn test_five_mutually_adjacent_letters() {
        // The largest group of mutually touching cells on the board is a 2x2 block.
        let model = model_for(&["ab", "ac", "ad", "ae", "bc", "bd", "be", "cd", "ce", "de"]);

        let err = solve(&model).expect_err("Found an impossible placement??");
        assert_eq!(err, GridError::NoSolution);
    }

    #[test]
    fn test_four_mutually_adjacent_letters() {
        solve_and_check(&["ab", "ac", "ad", "bc", "bd", "cd"]);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let model = model_for(&["cat", "dog", "bird"]);

        let first = solve(&model).unwrap();
        let second = solve(&model).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_symbol_at_inverts_cell_of() {
        let assignment = solve_and_check(&["zebra"]);

        for symbol_id in 0..CELL_COUNT {
            assert_eq!(assignment.symbol_at(assignment.cell_of(symbol_id)), Some(symbol_id));
        }
        assert_eq!(assignment.symbol_at(CELL_COUNT), None);
    }

    #[test]
    fn test_statistics() {
        let model = model_for(&["cat"]);
        let result = solve_with_options(&model, &SolverOptions::default()).unwrap();

        // One state per placed variable plus the final check.
        assert!(result.statistics.states >= CELL_COUNT as u64 + 1);
    }

    #[test]
    fn test_zero_timeout() {
        let model = model_for(&["cat"]);
        let options = SolverOptions {
            timeout: Some(Duration::from_millis(0)),
        };

        match solve_with_options(&model, &options) {
            Err(GridError::Timeout { .. }) => {}
            other => panic!("Expected a timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_generous_timeout() {
        let model = model_for(&["cat", "dog"]);
        let options = SolverOptions {
            timeout: Some(Duration::from_secs(60)),
        };

        let result = solve_with_options(&model, &options).expect("Failed to find a placement");
        assert!(model.is_satisfied_by(&result.assignment));
    }
}
