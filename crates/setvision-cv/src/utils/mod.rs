//! Utility modules

pub mod image;

pub use image::{ClassifierInput, ImageUtils};
