//! Per-card feature extraction
//!
//! A card crop goes through the shape detector; each surviving symbol is
//! classified for fill, shape and color, and the card takes the majority
//! label of its symbols for each attribute.

use crate::color::ColorClassifier;
use crate::deadline::Deadline;
use crate::detection::config::PipelineConfig;
use crate::error::{Result, SetError, Stage};
use crate::models::ModelContext;
use crate::traits::{Classifier, Detector};
use crate::utils::{ClassifierInput, ImageUtils};
use anyhow::anyhow;
use image::RgbImage;
use log::{debug, warn};
use setvision_core::vote::majority_vote;
use setvision_core::{BoundingBox, CardFeatures, Color, Fill, Shape};

/// Index of the highest score; first wins on equal scores
fn argmax(scores: &[f32; 3]) -> Option<usize> {
    if scores.iter().any(|s| !s.is_finite()) {
        return None;
    }
    let mut best = 0;
    for (index, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = index;
        }
    }
    Some(best)
}

/// Resolves the attributes of single cards
pub struct CardFeatureExtractor<'a> {
    shape_detector: &'a dyn Detector,
    fill_classifier: &'a dyn Classifier,
    shape_classifier: &'a dyn Classifier,
    color_classifier: ColorClassifier,
    min_confidence: f64,
    min_shape_area_ratio: f64,
    shape_nms_threshold: Option<f64>,
    deadline: Deadline,
}

impl<'a> CardFeatureExtractor<'a> {
    pub fn new(models: &'a ModelContext, config: &PipelineConfig) -> Self {
        Self {
            shape_detector: models.shape_detector(),
            fill_classifier: models.fill_classifier(),
            shape_classifier: models.shape_classifier(),
            color_classifier: ColorClassifier::new(config.color),
            min_confidence: config.min_detection_confidence,
            min_shape_area_ratio: config.min_shape_area_ratio,
            shape_nms_threshold: config.shape_nms_threshold,
            deadline: Deadline::unbounded(),
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Symbol boxes on the card, in crop coordinates and detector order
    pub fn shape_boxes(&self, card_crop: &RgbImage) -> Result<Vec<BoundingBox>> {
        let mut detections = self
            .shape_detector
            .detect(card_crop)
            .map_err(|e| SetError::detector(Stage::ShapeDetection, e))?
            .filter_by_confidence(self.min_confidence)
            .clamp_to(card_crop.width(), card_crop.height());
        self.deadline.check(Stage::ShapeDetection)?;

        if let Some(threshold) = self.shape_nms_threshold {
            detections = detections.apply_nms(threshold);
        }

        let card_area = card_crop.width() as f64 * card_crop.height() as f64;
        let min_area = self.min_shape_area_ratio * card_area;
        Ok(detections
            .boxes()
            .into_iter()
            .filter(|b| b.area() as f64 > min_area)
            .collect())
    }

    /// Resolve count, color, fill and shape for one card
    pub fn extract(&self, card_crop: &RgbImage, bbox: BoundingBox) -> Result<CardFeatures> {
        let shape_boxes = self.shape_boxes(card_crop)?;
        if shape_boxes.is_empty() {
            warn!("no symbols resolved on card at {}", bbox);
            return Ok(CardFeatures::unknown(bbox));
        }
        let count = u8::try_from(shape_boxes.len()).map_err(|_| {
            SetError::detector(
                Stage::ShapeDetection,
                anyhow!("{} symbols on card at {}", shape_boxes.len(), bbox),
            )
        })?;

        let regions: Vec<RgbImage> = shape_boxes
            .iter()
            .map(|b| ImageUtils::crop(card_crop, *b))
            .collect();

        let colors: Vec<Color> = regions
            .iter()
            .map(|r| self.color_classifier.classify(r))
            .collect();
        let fills = self.classify(
            self.fill_classifier,
            &regions,
            Stage::FillClassification,
            Fill::from_class_index,
        )?;
        let shapes = self.classify(
            self.shape_classifier,
            &regions,
            Stage::ShapeClassification,
            Shape::from_class_index,
        )?;

        let features = CardFeatures {
            count,
            color: majority_vote(&colors).unwrap_or(Color::Unknown),
            fill: majority_vote(&fills).unwrap_or(Fill::Unknown),
            shape: majority_vote(&shapes).unwrap_or(Shape::Unknown),
            bbox,
        };
        debug!(
            "card at {}: {} (colors {:?}, fills {:?}, shapes {:?})",
            bbox, features, colors, fills, shapes
        );
        Ok(features)
    }

    /// One batched classifier call over all regions of a card
    fn classify<T>(
        &self,
        classifier: &dyn Classifier,
        regions: &[RgbImage],
        stage: Stage,
        label: fn(usize) -> Option<T>,
    ) -> Result<Vec<T>> {
        let size = classifier.input_size();
        if size.0 == 0 || size.1 == 0 {
            return Err(SetError::detector(
                stage,
                anyhow!("classifier declares an empty input size {:?}", size),
            ));
        }

        let batch: Vec<ClassifierInput> = regions
            .iter()
            .map(|r| ImageUtils::to_classifier_input(r, size))
            .collect();
        let scores = classifier
            .predict(&batch)
            .map_err(|e| SetError::detector(stage, e))?;
        self.deadline.check(stage)?;

        if scores.len() != batch.len() {
            return Err(SetError::detector(
                stage,
                anyhow!(
                    "classifier returned {} predictions for {} inputs",
                    scores.len(),
                    batch.len()
                ),
            ));
        }

        scores
            .iter()
            .map(|s| {
                argmax(s)
                    .and_then(label)
                    .ok_or_else(|| SetError::detector(stage, anyhow!("unusable class scores {:?}", s)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::{Detection, DetectionCollection};
    use image::Rgb;
    use std::sync::Mutex;

    /// Classifier answering from a queue of canned score vectors
    struct Scripted {
        scores: Mutex<Vec<[f32; 3]>>,
    }

    impl Scripted {
        fn new(scores: Vec<[f32; 3]>) -> Self {
            Self {
                scores: Mutex::new(scores),
            }
        }
    }

    impl Classifier for Scripted {
        fn input_size(&self) -> (u32, u32) {
            (8, 8)
        }

        fn predict(&self, batch: &[ClassifierInput]) -> anyhow::Result<Vec<[f32; 3]>> {
            let mut scores = self.scores.lock().map_err(|_| anyhow!("poisoned"))?;
            let n = batch.len().min(scores.len());
            Ok(scores.drain(..n).collect())
        }
    }

    const RED: Rgb<u8> = Rgb([220, 20, 30]);
    const GREEN: Rgb<u8> = Rgb([20, 170, 50]);

    /// White 100x60 card with symbols painted at the given boxes
    fn card(symbols: &[(BoundingBox, Rgb<u8>)]) -> RgbImage {
        let mut image = RgbImage::from_pixel(100, 60, Rgb([250, 250, 250]));
        for (bbox, color) in symbols {
            for y in bbox.y1..bbox.y2 {
                for x in bbox.x1..bbox.x2 {
                    image.put_pixel(x as u32, y as u32, *color);
                }
            }
        }
        image
    }

    fn context(shapes: Vec<BoundingBox>, fills: Vec<[f32; 3]>, outlines: Vec<[f32; 3]>) -> ModelContext {
        let card_detector = |_: &RgbImage| -> anyhow::Result<DetectionCollection> { Ok(DetectionCollection::new()) };
        let shape_detector = move |_: &RgbImage| -> anyhow::Result<DetectionCollection> {
            Ok(shapes.iter().map(|b| Detection::new(*b, 0.9)).collect())
        };
        ModelContext::new(card_detector, shape_detector, Scripted::new(fills), Scripted::new(outlines))
    }

    const FULL: [f32; 3] = [0.1, 0.8, 0.1];
    const STRIPED: [f32; 3] = [0.1, 0.2, 0.7];
    const OVAL: [f32; 3] = [0.2, 0.7, 0.1];
    const DIAMOND: [f32; 3] = [0.6, 0.3, 0.1];
    const SQUIGGLE: [f32; 3] = [0.1, 0.1, 0.8];

    #[test]
    fn test_three_symbols_vote_per_attribute() -> Result<()> {
        let boxes = vec![
            BoundingBox::new(5, 10, 25, 50),
            BoundingBox::new(40, 10, 60, 50),
            BoundingBox::new(75, 10, 95, 50),
        ];
        let image = card(&[(boxes[0], RED), (boxes[1], GREEN), (boxes[2], RED)]);
        let models = context(boxes, vec![FULL, STRIPED, STRIPED], vec![OVAL, OVAL, DIAMOND]);
        let card_box = BoundingBox::new(300, 200, 400, 260);

        let features = CardFeatureExtractor::new(&models, &PipelineConfig::default()).extract(&image, card_box)?;
        assert_eq!(features, CardFeatures::new(3, Color::Red, Fill::Striped, Shape::Oval, card_box));
        Ok(())
    }

    #[test]
    fn test_tie_resolves_to_first_detected_symbol() -> Result<()> {
        let boxes = vec![BoundingBox::new(10, 10, 40, 50), BoundingBox::new(60, 10, 90, 50)];
        let image = card(&[(boxes[0], GREEN), (boxes[1], RED)]);
        let models = context(boxes, vec![STRIPED, FULL], vec![SQUIGGLE, DIAMOND]);

        let features = CardFeatureExtractor::new(&models, &PipelineConfig::default())
            .extract(&image, BoundingBox::new(0, 0, 100, 60))?;
        assert_eq!(features.count, 2);
        assert_eq!(features.color, Color::Green);
        assert_eq!(features.fill, Fill::Striped);
        assert_eq!(features.shape, Shape::Squiggle);
        Ok(())
    }

    #[test]
    fn test_small_boxes_are_noise() -> Result<()> {
        // 3% of a 100x60 card is 180 px; 10x18 = 180 is not strictly larger
        let boxes = vec![BoundingBox::new(0, 0, 10, 18), BoundingBox::new(50, 50, 52, 52)];
        let image = card(&[]);
        let models = context(boxes, vec![], vec![]);
        let card_box = BoundingBox::new(7, 8, 107, 68);

        let features = CardFeatureExtractor::new(&models, &PipelineConfig::default()).extract(&image, card_box)?;
        assert_eq!(features, CardFeatures::unknown(card_box));
        Ok(())
    }

    #[test]
    fn test_short_prediction_batch_is_a_failure() {
        let boxes = vec![BoundingBox::new(5, 10, 25, 50), BoundingBox::new(40, 10, 60, 50)];
        let image = card(&[(boxes[0], RED), (boxes[1], RED)]);
        let models = context(boxes, vec![FULL], vec![OVAL, OVAL]);

        let err = CardFeatureExtractor::new(&models, &PipelineConfig::default())
            .extract(&image, BoundingBox::new(0, 0, 100, 60))
            .unwrap_err();
        assert!(matches!(
            err,
            SetError::DetectorFailure {
                stage: Stage::FillClassification,
                ..
            }
        ));
    }

    #[test]
    fn test_nms_merges_duplicate_symbol_boxes() -> Result<()> {
        let boxes = vec![
            BoundingBox::new(5, 10, 25, 50),
            BoundingBox::new(6, 11, 25, 50),
            BoundingBox::new(40, 10, 60, 50),
        ];
        let image = card(&[(boxes[0], RED), (boxes[2], RED)]);
        let models = context(boxes, vec![FULL, FULL], vec![OVAL, OVAL]);
        let config = PipelineConfig {
            shape_nms_threshold: Some(0.5),
            ..PipelineConfig::default()
        };

        let features = CardFeatureExtractor::new(&models, &config).extract(&image, BoundingBox::new(0, 0, 100, 60))?;
        assert_eq!(features.count, 2);
        Ok(())
    }

    #[test]
    fn test_symbol_count_beyond_u8_is_a_failure() {
        let boxes = vec![BoundingBox::new(10, 10, 30, 30); 256];
        let models = context(boxes, vec![], vec![]);

        let err = CardFeatureExtractor::new(&models, &PipelineConfig::default())
            .extract(&card(&[]), BoundingBox::new(0, 0, 100, 60))
            .unwrap_err();
        assert!(matches!(
            err,
            SetError::DetectorFailure {
                stage: Stage::ShapeDetection,
                ..
            }
        ));
    }

    #[test]
    fn test_argmax_rejects_nan() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[f32::NAN, 0.5, 0.1]), None);
    }
}
