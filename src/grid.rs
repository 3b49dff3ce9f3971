use bit_set::BitSet;
use smallvec::SmallVec;

use crate::adjacency::adjacency_table;
use crate::solver::Assignment;
use crate::types::Cell;
use crate::{CELL_COUNT, GRID_HEIGHT, GRID_WIDTH};

/// The letters of a finished board, indexed by cell.
pub type LetterGrid = [char; CELL_COUNT];

/// Turn a placement into the letters shown on each cell. Cells without a symbol (which a valid
/// assignment never leaves) are shown as spaces.
pub fn project(assignment: &Assignment) -> LetterGrid {
    let mut grid: LetterGrid = [' '; CELL_COUNT];

    for (symbol, cell) in assignment.iter() {
        if cell < CELL_COUNT {
            grid[cell] = symbol.letter;
        }
    }

    grid
}

/// Turn the given board into an ASCII table, e.g.
///
/// ```text
/// +---+---+---+---+
/// | c | a | t | x |
/// +---+---+---+---+
/// ...
/// ```
pub fn render_grid(grid: &LetterGrid) -> String {
    let divider: String = "+---".repeat(GRID_WIDTH) + "+";
    let mut lines: Vec<String> = Vec::with_capacity(GRID_HEIGHT * 2 + 1);

    for row in grid.chunks(GRID_WIDTH) {
        lines.push(divider.clone());
        lines.push(
            row.iter()
                .map(|letter| format!("| {} ", letter))
                .collect::<String>()
                + "|",
        );
    }
    lines.push(divider);

    lines.join("\n")
}

/// Find a way to spell `word` on the board by moving between touching cells without visiting any
/// cell twice, the same way a player would select tiles. Returns the cells in order, or `None` if
/// the word can't be traced.
pub fn trace_word(grid: &LetterGrid, word: &str) -> Option<Vec<Cell>> {
    let letters: SmallVec<[char; CELL_COUNT]> = word.chars().collect();
    if letters.is_empty() || letters.len() > CELL_COUNT {
        return None;
    }

    fn extend_path(
        grid: &LetterGrid,
        letters: &[char],
        path: &mut Vec<Cell>,
        visited: &mut BitSet,
    ) -> bool {
        if path.len() == letters.len() {
            return true;
        }

        let &last_cell = match path.last() {
            Some(last_cell) => last_cell,
            None => return false,
        };

        for &next_cell in adjacency_table().neighbors(last_cell) {
            if visited.contains(next_cell) || grid[next_cell] != letters[path.len()] {
                continue;
            }

            path.push(next_cell);
            visited.insert(next_cell);

            if extend_path(grid, letters, path, visited) {
                return true;
            }

            path.pop();
            visited.remove(next_cell);
        }

        false
    }

    for start in (0..CELL_COUNT).filter(|&cell| grid[cell] == letters[0]) {
        let mut path: Vec<Cell> = vec![start];
        let mut visited = BitSet::with_capacity(CELL_COUNT);
        visited.insert(start);

        if extend_path(grid, &letters, &mut path, &mut visited) {
            return Some(path);
        }
    }

    None
}
