//! SET game logic
//!
//! Card attributes, board state and the combinatorial search for valid SETs.
//! Nothing in this crate touches pixels; boxes are plain integer rectangles.

pub mod board;
pub mod cards;
pub mod geometry;
pub mod vote;

pub use board::{BoardState, SetCandidate, SetFinder, SetSearch};
pub use cards::{CardFeatures, Color, Fill, Shape};
pub use geometry::BoundingBox;
