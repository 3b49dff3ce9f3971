//! The static neighbor relation for the board. Two cells are adjacent when they're one king move
//! apart: row and column each differ by at most one, and they aren't the same cell. Everything is
//! derived from (row, col) pairs rather than raw index arithmetic, so cells 3 and 4 (the end of the
//! first row and the start of the second) are correctly treated as far apart.

use bit_set::BitSet;
use smallvec::SmallVec;
use std::sync::OnceLock;

use crate::types::Cell;
use crate::{CELL_COUNT, GRID_WIDTH, MAX_NEIGHBORS};

/// Row index of a cell, with row 0 at the top.
pub fn row_of(cell: Cell) -> usize {
    cell / GRID_WIDTH
}

/// Column index of a cell, with column 0 on the left.
pub fn col_of(cell: Cell) -> usize {
    cell % GRID_WIDTH
}

/// Precomputed neighbors for every cell, in ascending order, plus the same information as bit sets
/// so that domains can be intersected with them directly.
#[derive(Debug)]
pub struct AdjacencyTable {
    neighbors: Vec<SmallVec<[Cell; MAX_NEIGHBORS]>>,
    neighbor_sets: Vec<BitSet>,
}

impl AdjacencyTable {
    fn build() -> AdjacencyTable {
        let mut neighbors: Vec<SmallVec<[Cell; MAX_NEIGHBORS]>> = Vec::with_capacity(CELL_COUNT);
        let mut neighbor_sets: Vec<BitSet> = Vec::with_capacity(CELL_COUNT);

        for cell in 0..CELL_COUNT {
            let (row, col) = (row_of(cell) as isize, col_of(cell) as isize);

            let cell_neighbors: SmallVec<[Cell; MAX_NEIGHBORS]> = (0..CELL_COUNT)
                .filter(|&other| {
                    let row_delta = row_of(other) as isize - row;
                    let col_delta = col_of(other) as isize - col;

                    row_delta.abs() <= 1 && col_delta.abs() <= 1 && (row_delta, col_delta) != (0, 0)
                })
                .collect();

            let mut cell_neighbor_set = BitSet::with_capacity(CELL_COUNT);
            for &neighbor in &cell_neighbors {
                cell_neighbor_set.insert(neighbor);
            }

            neighbors.push(cell_neighbors);
            neighbor_sets.push(cell_neighbor_set);
        }

        AdjacencyTable { neighbors, neighbor_sets }
    }

    /// The cells one step away from `cell`, in ascending order.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        &self.neighbors[cell]
    }

    /// Same as `neighbors`, as a set.
    pub fn neighbor_set(&self, cell: Cell) -> &BitSet {
        &self.neighbor_sets[cell]
    }

    pub fn are_adjacent(&self, a: Cell, b: Cell) -> bool {
        a < CELL_COUNT && self.neighbor_sets[a].contains(b)
    }
}

/// Return the shared adjacency table, building it on first use.
pub fn adjacency_table() -> &'static AdjacencyTable {
    static TABLE: OnceLock<AdjacencyTable> = OnceLock::new();

    TABLE.get_or_init(AdjacencyTable::build)
}

#[cfg(test)]
mod tests {
    use crate::adjacency::{adjacency_table, col_of, row_of};
    use crate::CELL_COUNT;

    /// The neighbor lists, written out by hand.
    ///
    ///  0  1  2  3
    ///  4  5  6  7
    ///  8  9 10 11
    /// 12 13 14 15
    const EXPECTED_NEIGHBORS: [&[usize]; CELL_COUNT] = [
        &[1, 4, 5],
        &[0, 2, 4, 5, 6],
        &[1, 3, 5, 6, 7],
        &[2, 6, 7],
        &[0, 1, 5, 8, 9],
        &[0, 1, 2, 4, 6, 8, 9, 10],
        &[1, 2, 3, 5, 7, 9, 10, 11],
        &[2, 3, 6, 10, 11],
        &[4, 5, 9, 12, 13],
        &[4, 5, 6, 8, 10, 12, 13, 14],
        &[5, 6, 7, 9, 11, 13, 14, 15],
        &[6, 7, 10, 14, 15],
        &[8, 9, 13],
        &[8, 9, 10, 12, 14],
        &[9, 10, 11, 13, 15],
        &[10, 11, 14],
    ];

    #[test]
    fn test_neighbors_match_hand_written_table() {
        let table = adjacency_table();

        for cell in 0..CELL_COUNT {
            assert_eq!(table.neighbors(cell), EXPECTED_NEIGHBORS[cell], "neighbors of {}", cell);
        }
    }

    #[test]
    fn test_adjacency_is_symmetric_and_irreflexive() {
        let table = adjacency_table();

        for a in 0..CELL_COUNT {
            assert!(!table.are_adjacent(a, a));

            for b in 0..CELL_COUNT {
                assert_eq!(table.are_adjacent(a, b), table.are_adjacent(b, a));

                let row_delta = (row_of(a) as isize - row_of(b) as isize).abs();
                let col_delta = (col_of(a) as isize - col_of(b) as isize).abs();
                assert_eq!(
                    table.are_adjacent(a, b),
                    a != b && row_delta <= 1 && col_delta <= 1,
                );
            }
        }
    }

    #[test]
    fn test_no_wraparound_between_rows() {
        let table = adjacency_table();

        assert!(!table.are_adjacent(3, 4));
        assert!(!table.are_adjacent(7, 8));
        assert!(!table.are_adjacent(11, 12));
        assert!(!table.are_adjacent(3, 8));
        assert!(!table.are_adjacent(0, 15));
        assert!(!table.are_adjacent(15, 16));
    }

    #[test]
    fn test_neighbor_counts() {
        let table = adjacency_table();

        for corner in [0, 3, 12, 15] {
            assert_eq!(table.neighbors(corner).len(), 3);
        }
        for middle in [5, 6, 9, 10] {
            assert_eq!(table.neighbors(middle).len(), 8);
        }
        for edge in [1, 2, 4, 7, 8, 11, 13, 14] {
            assert_eq!(table.neighbors(edge).len(), 5);
        }

        let total: usize = (0..CELL_COUNT).map(|cell| table.neighbor_set(cell).len()).sum();
        assert_eq!(total, 84);
    }
}
