//! Detector outputs and batch operations on them
//!
//! Core abstraction for representing and filtering raw detection results
//! before they become cards or shape regions.

use serde::{Deserialize, Serialize};
use setvision_core::BoundingBox;

/// One box reported by a detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f64,
}

impl Detection {
    /// Create a new detection
    pub fn new(bbox: BoundingBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }

    /// Check if this detection overlaps with another
    pub fn overlaps(&self, other: &Detection, threshold: f64) -> bool {
        self.bbox.iou(&other.bbox) > threshold
    }
}

/// Collection of detections in detector output order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionCollection {
    detections: Vec<Detection>,
}

impl DetectionCollection {
    /// Create new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vector of detections
    pub fn from_vec(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Boxes from a detector that reports no scores count as certain
    pub fn from_boxes<I: IntoIterator<Item = BoundingBox>>(boxes: I) -> Self {
        boxes.into_iter().map(|bbox| Detection::new(bbox, 1.0)).collect()
    }

    /// Add a detection to the collection
    pub fn push(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.detections
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Boxes in collection order
    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.detections.iter().map(|d| d.bbox).collect()
    }

    /// Filter by confidence threshold
    pub fn filter_by_confidence(mut self, threshold: f64) -> Self {
        self.detections.retain(|d| d.confidence >= threshold);
        self
    }

    /// Clip every box to the image and drop those left without area
    pub fn clamp_to(mut self, width: u32, height: u32) -> Self {
        for detection in &mut self.detections {
            detection.bbox = detection.bbox.clamp_to(width, height);
        }
        self.detections.retain(|d| d.bbox.is_valid());
        self
    }

    /// Apply non-maximum suppression.
    ///
    /// Higher-confidence boxes suppress overlapping ones; survivors keep
    /// their original relative order.
    pub fn apply_nms(self, threshold: f64) -> Self {
        if self.detections.is_empty() {
            return self;
        }

        let mut order: Vec<usize> = (0..self.detections.len()).collect();
        order.sort_by(|&a, &b| {
            self.detections[b]
                .confidence
                .total_cmp(&self.detections[a].confidence)
        });

        let mut suppressed = vec![false; self.detections.len()];
        for (rank, &i) in order.iter().enumerate() {
            if suppressed[i] {
                continue;
            }
            for &j in &order[rank + 1..] {
                if !suppressed[j] && self.detections[i].overlaps(&self.detections[j], threshold) {
                    suppressed[j] = true;
                }
            }
        }

        self.detections
            .into_iter()
            .zip(suppressed)
            .filter(|(_, gone)| !gone)
            .map(|(detection, _)| detection)
            .collect()
    }

    /// Mean (width, height) over all boxes, or `None` when empty
    pub fn mean_size(&self) -> Option<(f64, f64)> {
        if self.detections.is_empty() {
            return None;
        }
        let n = self.detections.len() as f64;
        let (w, h) = self.detections.iter().fold((0.0, 0.0), |(w, h), d| {
            (w + d.bbox.width() as f64, h + d.bbox.height() as f64)
        });
        Some((w / n, h / n))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }
}

impl IntoIterator for DetectionCollection {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.into_iter()
    }
}

impl FromIterator<Detection> for DetectionCollection {
    fn from_iter<T: IntoIterator<Item = Detection>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
