//! High-level detection module

pub mod config;
pub mod outcome;
pub mod pipeline;

pub use config::{ColorThresholds, HueBand, PipelineConfig, RenderConfig};
pub use outcome::{summarize, AnalysisStats, DetectionOutcome, SetReport};
pub use pipeline::{BoardAnalyzer, SetPipeline};
