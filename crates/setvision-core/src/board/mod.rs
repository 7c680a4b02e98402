//! Board state and SET search

pub mod finder;
pub mod state;

pub use finder::{is_valid_set, SetCandidate, SetFinder, SetSearch, Triples};
pub use state::BoardState;
