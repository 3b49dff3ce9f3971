//! Turning a word list into exactly `CELL_COUNT` placeable symbols.
//!
//! Every word contributes one symbol per letter occurrence, numbered per letter within the word, so
//! "happy" needs `h1 a1 p1 p2 y1`. Words share symbols across each other: "pop" after "happy" adds
//! `o1` and reuses `p1` and `p2`. If the union is short of a full board, we pad it first with extra
//! copies of the most common input letters, and then with random letters.

use rand::Rng;
use smallvec::SmallVec;
use std::cmp::Reverse;

use crate::error::GridError;
use crate::types::{Symbol, SymbolId};
use crate::CELL_COUNT;

/// The fixed set of symbols to place on the board, in creation order. The first `required_count`
/// symbols are the ones the words actually use; the rest are fillers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: SmallVec<[Symbol; CELL_COUNT]>,
    required_count: usize,
}

impl SymbolSet {
    /// Build a set from explicit symbols, e.g. to hand-construct a board. Duplicates are dropped
    /// and every symbol counts as required.
    pub fn from_symbols<I>(symbols: I) -> SymbolSet
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut result: SmallVec<[Symbol; CELL_COUNT]> = SmallVec::new();
        for symbol in symbols {
            if !result.contains(&symbol) {
                result.push(symbol);
            }
        }

        let required_count = result.len();
        SymbolSet {
            symbols: result,
            required_count,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// How many of the symbols are needed by the input words (as opposed to padding).
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    pub fn get(&self, symbol_id: SymbolId) -> Symbol {
        self.symbols[symbol_id]
    }

    pub fn id_of(&self, symbol: Symbol) -> Option<SymbolId> {
        self.symbols.iter().position(|&candidate| candidate == symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The lowest occurrence index for `letter` that isn't in the set yet.
    fn next_occurrence(&self, letter: char) -> usize {
        self.symbols
            .iter()
            .filter(|symbol| symbol.letter == letter)
            .map(|symbol| symbol.occurrence)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn is_full(&self) -> bool {
        self.symbols.len() >= CELL_COUNT
    }
}

/// Make sure a word only uses the letters a-z. Case folding is the caller's job, so uppercase
/// letters are rejected too.
pub fn validate_word(word: &str) -> Result<(), GridError> {
    match word.chars().find(|letter| !letter.is_ascii_lowercase()) {
        Some(letter) => Err(GridError::InvalidWord {
            word: word.to_string(),
            letter,
        }),
        None => Ok(()),
    }
}

/// Trim and lowercase a raw word, then validate it.
pub fn normalize_word(raw: &str) -> Result<String, GridError> {
    let word = raw.trim().to_lowercase();
    validate_word(&word)?;
    Ok(word)
}

/// The symbol for each position of `word`, numbering repeats of a letter left to right. This is
/// the rule used both when allocating symbols and when building adjacency constraints, so the two
/// always agree.
pub fn word_symbols(word: &str) -> Vec<Symbol> {
    let mut seen: Vec<char> = Vec::with_capacity(word.len());

    word.chars()
        .map(|letter| {
            let occurrence = seen.iter().filter(|&&other| other == letter).count() + 1;
            seen.push(letter);
            Symbol::new(letter, occurrence)
        })
        .collect()
}

/// Rank the letters appearing in `words` by total occurrence count, most frequent first, breaking
/// ties by order of first appearance.
fn rank_letters<S: AsRef<str>>(words: &[S]) -> Vec<char> {
    let mut counts: Vec<(char, usize)> = vec![];

    for word in words {
        for letter in word.as_ref().chars() {
            match counts.iter_mut().find(|(other, _)| *other == letter) {
                Some((_, count)) => *count += 1,
                None => counts.push((letter, 1)),
            }
        }
    }

    // `sort_by_key` is stable, so equal counts keep their first-appearance order.
    counts.sort_by_key(|&(_, count)| Reverse(count));

    counts.into_iter().map(|(letter, _)| letter).collect()
}

/// Produce exactly `CELL_COUNT` distinct symbols for the given words, drawing any random filler
/// letters from `rng`.
pub fn allocate_symbols<S, R>(words: &[S], rng: &mut R) -> Result<SymbolSet, GridError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    for word in words {
        validate_word(word.as_ref())?;
    }

    // Collect the required symbols in a plain Vec first, since a bad input can produce far more
    // than fit on the board and we want to report the real count.
    let mut required: Vec<Symbol> = vec![];
    for word in words {
        for symbol in word_symbols(word.as_ref()) {
            if !required.contains(&symbol) {
                required.push(symbol);
            }
        }
    }

    if required.len() > CELL_COUNT {
        return Err(GridError::TooManySymbols {
            required: required.len(),
        });
    }

    let mut symbol_set = SymbolSet::from_symbols(required);

    // Pad with one more copy of each input letter, most frequent first.
    for letter in rank_letters(words) {
        if symbol_set.is_full() {
            break;
        }
        let occurrence = symbol_set.next_occurrence(letter);
        symbol_set.symbols.push(Symbol::new(letter, occurrence));
    }

    // Then with random letters. Since the set holds fewer than `CELL_COUNT` symbols at this point,
    // at most that many letters have an occurrence-1 symbol, so there are always unused letters
    // left to find.
    while !symbol_set.is_full() {
        let letter = rng.gen_range(b'a'..=b'z') as char;
        let candidate = Symbol::new(letter, 1);

        if !symbol_set.contains(candidate) {
            symbol_set.symbols.push(candidate);
        }
    }

    log::debug!(
        "Allocated {} symbols ({} required)",
        symbol_set.len(),
        symbol_set.required_count(),
    );

    Ok(symbol_set)
}
