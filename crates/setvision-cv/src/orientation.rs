//! Board orientation normalization
//!
//! Cards are expected to lie landscape. When the detected card boxes are on
//! average taller than wide, the whole board is turned 90° clockwise before
//! analysis and turned back afterwards.

use crate::utils::ImageUtils;
use image::RgbImage;
use log::debug;
use setvision_core::BoundingBox;

#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationCorrector;

impl OrientationCorrector {
    pub fn new() -> Self {
        Self
    }

    /// True when the mean card height exceeds the mean card width
    pub fn needs_rotation(&self, card_boxes: &[BoundingBox]) -> bool {
        // equal counts, so comparing sums compares means
        let width: i64 = card_boxes.iter().map(|b| b.width() as i64).sum();
        let height: i64 = card_boxes.iter().map(|b| b.height() as i64).sum();
        !card_boxes.is_empty() && height > width
    }

    /// Rotate the board clockwise if its cards stand upright
    pub fn correct(&self, board_image: &RgbImage, card_boxes: &[BoundingBox]) -> (RgbImage, bool) {
        if self.needs_rotation(card_boxes) {
            debug!("cards stand upright, rotating board clockwise");
            (ImageUtils::rotate_cw(board_image), true)
        } else {
            (board_image.clone(), false)
        }
    }

    /// Undo [`Self::correct`]
    pub fn restore(&self, image: RgbImage, was_rotated: bool) -> RgbImage {
        if was_rotated {
            ImageUtils::rotate_ccw(&image)
        } else {
            image
        }
    }

    /// Map a box found on the processed image back onto the original
    pub fn restore_box(&self, bbox: BoundingBox, was_rotated: bool, processed_width: u32) -> BoundingBox {
        if was_rotated {
            bbox.rotated_ccw(processed_width)
        } else {
            bbox
        }
    }
}
