//! Card segmentation: board image to per-card crops

use crate::deadline::Deadline;
use crate::error::{Result, SetError, Stage};
use crate::traits::Detector;
use crate::utils::ImageUtils;
use image::RgbImage;
use log::debug;
use setvision_core::BoundingBox;

/// One card cut out of the board
#[derive(Debug, Clone)]
pub struct DetectedRegion {
    pub crop: RgbImage,
    pub bbox: BoundingBox,
}

/// Crops every detected card out of a board image
pub struct CardSegmenter<'a> {
    detector: &'a dyn Detector,
    min_confidence: f64,
    deadline: Deadline,
}

impl<'a> CardSegmenter<'a> {
    pub fn new(detector: &'a dyn Detector, min_confidence: f64) -> Self {
        Self {
            detector,
            min_confidence,
            deadline: Deadline::unbounded(),
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Card boxes on `image`, clipped to it, in detector order
    pub fn detect_boxes(&self, image: &RgbImage) -> Result<Vec<BoundingBox>> {
        let detections = self
            .detector
            .detect(image)
            .map_err(|e| SetError::detector(Stage::CardDetection, e))?;
        self.deadline.check(Stage::CardDetection)?;

        let raw = detections.len();
        let kept = detections
            .filter_by_confidence(self.min_confidence)
            .clamp_to(image.width(), image.height());
        debug!("card detector returned {} boxes, {} usable", raw, kept.len());

        Ok(kept.boxes())
    }

    /// Crop each detected card; the order becomes the board index
    pub fn segment(&self, board_image: &RgbImage) -> Result<Vec<DetectedRegion>> {
        let regions = self
            .detect_boxes(board_image)?
            .into_iter()
            .map(|bbox| DetectedRegion {
                crop: ImageUtils::crop(board_image, bbox),
                bbox,
            })
            .collect();
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::{Detection, DetectionCollection};
    use image::Rgb;

    #[test]
    fn test_segment_keeps_detector_order_and_drops_bad_boxes() -> Result<()> {
        let board = RgbImage::from_fn(100, 50, |x, _| Rgb([x as u8, 0, 0]));
        let detector = |_: &RgbImage| -> anyhow::Result<DetectionCollection> {
            Ok(DetectionCollection::from_vec(vec![
                Detection::new(BoundingBox::new(60, 10, 90, 40), 0.9),
                Detection::new(BoundingBox::new(30, 30, 30, 45), 0.9),
                Detection::new(BoundingBox::new(5, 10, 35, 40), 0.8),
                Detection::new(BoundingBox::new(40, 5, 55, 25), 0.2),
                Detection::new(BoundingBox::new(95, 0, 130, 20), 0.7),
            ]))
        };

        let regions = CardSegmenter::new(&detector, 0.5).segment(&board)?;
        let boxes: Vec<_> = regions.iter().map(|r| r.bbox).collect();
        assert_eq!(
            boxes,
            vec![
                BoundingBox::new(60, 10, 90, 40),
                BoundingBox::new(5, 10, 35, 40),
                BoundingBox::new(95, 0, 100, 20),
            ]
        );
        assert_eq!(regions[0].crop.dimensions(), (30, 30));
        assert_eq!(regions[0].crop.get_pixel(0, 0), &Rgb([60, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_detector_error_is_a_card_detection_failure() {
        let board = RgbImage::new(10, 10);
        let detector = |_: &RgbImage| -> anyhow::Result<DetectionCollection> {
            anyhow::bail!("weights not loaded")
        };

        let err = CardSegmenter::new(&detector, 0.5).segment(&board).unwrap_err();
        assert!(matches!(
            err,
            SetError::DetectorFailure {
                stage: Stage::CardDetection,
                ..
            }
        ));
    }
}
