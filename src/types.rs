use std::fmt;
use std::fmt::{Display, Formatter};

/// An index into the 4x4 board, counting left to right and then top to bottom, so that
/// `row = cell / GRID_WIDTH` and `col = cell % GRID_WIDTH`.
pub type Cell = usize;

/// An identifier for a symbol, based on its index in the `SymbolSet` it came from. This is also the
/// index of the corresponding variable in the constraint model.
pub type SymbolId = usize;

/// A placeable letter occurrence. The second `p` in "happy" is `p2`, distinct from `p1`, so that
/// both can land on different cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub letter: char,
    pub occurrence: usize,
}

impl Symbol {
    pub fn new(letter: char, occurrence: usize) -> Symbol {
        Symbol { letter, occurrence }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.occurrence)
    }
}
