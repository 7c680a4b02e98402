//! What one analysis hands back to its caller

use anyhow::Context;
use image::RgbImage;
use serde::Serialize;
use setvision_core::{BoardState, SetCandidate};
use std::path::Path;
use std::time::Duration;

/// Counters collected during one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub cards_detected: usize,
    pub unknown_cards: usize,
    pub combinations_checked: usize,
    pub sets_found: usize,
    pub processing_time_ms: u64,
}

impl AnalysisStats {
    /// Whole milliseconds of `elapsed`, saturating at `u64::MAX`
    pub fn millis(elapsed: Duration) -> u64 {
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Result of analysing one board photo.
///
/// Boxes and the annotated image are in the orientation of the input image.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub board: BoardState,
    pub sets: Vec<SetCandidate>,
    pub image: RgbImage,
    pub was_rotated: bool,
    pub stats: AnalysisStats,
}

/// Serializable findings, without the image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReport {
    /// Always `true`: a failed analysis yields a `SetError`, never a report.
    /// Kept so the JSON matches the service response consumers already parse.
    pub success: bool,
    pub set_count: usize,
    pub sets: Vec<SetCandidate>,
    /// Seconds, two decimals
    pub processing_time: String,
    pub stats: AnalysisStats,
}

impl SetReport {
    pub fn new(sets: Vec<SetCandidate>, stats: AnalysisStats) -> Self {
        Self {
            success: true,
            set_count: sets.len(),
            sets,
            processing_time: format!("{:.2}", stats.processing_time_ms as f64 / 1000.0),
            stats,
        }
    }
}

/// Human readable listing of the SETs, one per line
pub fn summarize(sets: &[SetCandidate]) -> String {
    if sets.is_empty() {
        return "No valid SETs found in this image.".to_string();
    }

    let mut message = format!("Found {} valid SET(s)!\n", sets.len());
    for (index, set) in sets.iter().enumerate() {
        let cards: Vec<String> = set.cards.iter().map(|c| c.to_string()).collect();
        message.push_str(&format!("\nSET {}: {}", index + 1, cards.join(" + ")));
    }
    message
}

impl DetectionOutcome {
    pub fn report(&self) -> SetReport {
        SetReport::new(self.sets.clone(), self.stats.clone())
    }

    pub fn summary(&self) -> String {
        summarize(&self.sets)
    }

    /// Export the findings in JSON format
    pub fn export_json(&self, output_path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.report())
            .context("Failed to serialize detection results")?;

        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write JSON to: {:?}", output_path))?;

        Ok(())
    }
}
