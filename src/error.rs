use instant::Duration;
use thiserror::Error;

use crate::types::Symbol;
use crate::CELL_COUNT;

/// Everything that can stop a grid from being generated. None of these are retried internally;
/// the same input will fail the same way again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("the words need {required} distinct letters but the grid only has {cells} cells", cells = CELL_COUNT)]
    TooManySymbols { required: usize },

    #[error("no arrangement of the letters satisfies every word")]
    NoSolution,

    #[error("gave up searching after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("word {word:?} contains {letter:?}; only the letters a-z are allowed")]
    InvalidWord { word: String, letter: char },

    #[error("expected exactly {cells} symbols but got {found}", cells = CELL_COUNT)]
    SymbolCount { found: usize },

    #[error("symbol {symbol} is needed by the words but missing from the symbol set")]
    MissingSymbol { symbol: Symbol },
}
