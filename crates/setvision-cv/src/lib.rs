//! SET board vision pipeline
//!
//! Turns a photographed board into resolved card features and valid SETs.
//! Detection and classification models stay outside the crate behind the
//! [`traits::Detector`] and [`traits::Classifier`] capabilities.

pub mod bbox;
pub mod color;
pub mod deadline;
pub mod detection;
pub mod error;
pub mod features;
pub mod models;
pub mod orientation;
pub mod render;
pub mod segment;
pub mod utils;

// Re-export commonly used types
pub use bbox::{Detection, DetectionCollection};
pub use color::ColorClassifier;
pub use detection::{
    BoardAnalyzer, DetectionOutcome, PipelineConfig, SetPipeline, SetReport,
};
pub use error::{Result, SetError, Stage};
pub use features::CardFeatureExtractor;
pub use models::ModelContext;
pub use orientation::OrientationCorrector;
pub use render::ResultRenderer;
pub use segment::{CardSegmenter, DetectedRegion};
pub use utils::{ClassifierInput, ImageUtils};

/// Capabilities the pipeline consumes from model backends
pub mod traits {
    use crate::bbox::DetectionCollection;
    use crate::utils::ClassifierInput;
    use image::RgbImage;

    /// Object detector returning boxes in the coordinates of the given image
    pub trait Detector: Send + Sync {
        fn detect(&self, image: &RgbImage) -> anyhow::Result<DetectionCollection>;
    }

    impl<F> Detector for F
    where
        F: Fn(&RgbImage) -> anyhow::Result<DetectionCollection> + Send + Sync,
    {
        fn detect(&self, image: &RgbImage) -> anyhow::Result<DetectionCollection> {
            self(image)
        }
    }

    /// Three-class image classifier taking a batch of fixed-size inputs
    pub trait Classifier: Send + Sync {
        /// Required input resolution as (width, height)
        fn input_size(&self) -> (u32, u32);

        /// One score vector per input, in input order
        fn predict(&self, batch: &[ClassifierInput]) -> anyhow::Result<Vec<[f32; 3]>>;
    }
}
