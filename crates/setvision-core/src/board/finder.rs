//! Exhaustive search for valid SETs
//!
//! Three cards form a SET when, for each of count, color, fill and shape,
//! the three values are either all equal or pairwise distinct.

use super::state::BoardState;
use crate::cards::CardFeatures;
use serde::{Deserialize, Serialize};

/// A valid SET: three board indices plus copies of the cards they name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCandidate {
    /// Indices into the board, strictly increasing
    pub card_indices: [usize; 3],
    pub cards: [CardFeatures; 3],
}

/// Result of one search over a board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSearch {
    pub sets: Vec<SetCandidate>,
    /// Number of triples tested
    pub combinations_checked: usize,
}

fn all_same_or_all_different<T: PartialEq>(a: T, b: T, c: T) -> bool {
    let same = a == b && b == c;
    let distinct = a != b && b != c && a != c;
    same || distinct
}

/// The SET rule on attribute values alone; boxes are ignored
pub fn is_valid_set(a: &CardFeatures, b: &CardFeatures, c: &CardFeatures) -> bool {
    all_same_or_all_different(a.count, b.count, c.count)
        && all_same_or_all_different(a.color, b.color, c.color)
        && all_same_or_all_different(a.fill, b.fill, c.fill)
        && all_same_or_all_different(a.shape, b.shape, c.shape)
}

/// All 3-combinations of positions `0..n` in lexicographic order
#[derive(Debug, Clone)]
pub struct Triples {
    n: usize,
    next: Option<[usize; 3]>,
}

impl Triples {
    pub fn new(n: usize) -> Self {
        let next = if n >= 3 { Some([0, 1, 2]) } else { None };
        Self { n, next }
    }

    /// C(n, 3)
    pub fn count_for(n: usize) -> usize {
        if n < 3 { 0 } else { n * (n - 1) * (n - 2) / 6 }
    }
}

impl Iterator for Triples {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let [i, j, k] = current;
        let n = self.n;

        self.next = if k + 1 < n {
            Some([i, j, k + 1])
        } else if j + 2 < n {
            Some([i, j + 1, j + 2])
        } else if i + 3 < n {
            Some([i + 1, i + 2, i + 3])
        } else {
            None
        };

        Some(current)
    }
}

/// Stateless SET finder
#[derive(Debug, Clone, Copy, Default)]
pub struct SetFinder;

impl SetFinder {
    pub fn new() -> Self {
        Self
    }

    /// Every valid SET on the board, in enumeration order
    pub fn find_sets(&self, board: &BoardState) -> Vec<SetCandidate> {
        self.search(board).sets
    }

    /// Search the playable cards of `board`.
    ///
    /// Unknown cards are removed before combinations are generated, so a
    /// board of n playable cards costs exactly C(n, 3) rule checks.
    pub fn search(&self, board: &BoardState) -> SetSearch {
        let playable = board.playable_indices();
        let cards = board.cards();

        let mut search = SetSearch::default();
        for [a, b, c] in Triples::new(playable.len()) {
            search.combinations_checked += 1;

            let indices = [playable[a], playable[b], playable[c]];
            let triple = indices.map(|index| cards[index]);
            if is_valid_set(&triple[0], &triple[1], &triple[2]) {
                search.sets.push(SetCandidate {
                    card_indices: indices,
                    cards: triple,
                });
            }
        }
        search
    }
}
