//! Card attributes and per-card feature records

pub mod attributes;
pub mod features;

pub use attributes::{Color, Fill, Shape, UnknownLabel};
pub use features::{CardFeatures, PartiallyUnknown};
