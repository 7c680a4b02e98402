//! Pipeline configuration

use super::outcome::AnalysisStats;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detections scoring below this are ignored (cards and shapes)
    pub min_detection_confidence: f64,
    /// A shape box must cover more than this fraction of its card
    pub min_shape_area_ratio: f64,
    /// IoU above which duplicate shape boxes are suppressed; `None` keeps all
    pub shape_nms_threshold: Option<f64>,
    /// Per-image budget for model calls, in milliseconds
    pub timeout_ms: Option<u64>,
    pub color: ColorThresholds,
    pub render: RenderConfig,
}

/// Inclusive hue interval in OpenCV units (0..=180)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueBand {
    pub min: u8,
    pub max: u8,
}

impl HueBand {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, hue: u8) -> bool {
        (self.min..=self.max).contains(&hue)
    }
}

/// HSV thresholds for symbol color classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThresholds {
    pub green: HueBand,
    pub purple: HueBand,
    /// Red wraps around hue 0, so it takes two bands
    pub red_low: HueBand,
    pub red_high: HueBand,
    pub min_saturation: u8,
    pub min_value: u8,
}

/// Result drawing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// RGB colors cycled per SET
    pub palette: Vec<(u8, u8, u8)>,
    pub stroke_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_shape_area_ratio: 0.03,
            shape_nms_threshold: None,
            timeout_ms: None,
            color: ColorThresholds::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            green: HueBand::new(40, 80),
            purple: HueBand::new(120, 160),
            red_low: HueBand::new(0, 10),
            red_high: HueBand::new(170, 180),
            min_saturation: 50,
            min_value: 50,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                (255, 0, 0),
                (0, 255, 0),
                (255, 0, 255),
                (255, 255, 0),
                (0, 255, 255),
            ],
            stroke_width: 3,
        }
    }
}

impl PipelineConfig {
    /// Configuration for boards shot under weak or warm light
    pub fn for_dim_lighting() -> Self {
        Self {
            color: ColorThresholds {
                min_saturation: 35,
                min_value: 35,
                ..ColorThresholds::default()
            },
            ..Default::default()
        }
    }

    /// Same configuration with a per-image time budget
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.timeout_ms = Some(AnalysisStats::millis(budget));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }
}
