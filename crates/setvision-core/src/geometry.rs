//! Integer pixel rectangles
//!
//! Boxes use slice semantics: `x1..x2` and `y1..y2`, the far edges exclusive.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates of some image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create from top-left corner and size
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Area in pixels; zero for inverted or degenerate boxes
    pub fn area(&self) -> i64 {
        if self.is_valid() {
            self.width() as i64 * self.height() as i64
        } else {
            0
        }
    }

    /// True when the box has positive area
    pub fn is_valid(&self) -> bool {
        self.x2 > self.x1 && self.y2 > self.y1
    }

    /// Calculate intersection over union (IoU) with another box
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) as f64 * (y2 - y1) as f64;
        let union = self.area() as f64 + other.area() as f64 - intersection;

        intersection / union
    }

    /// Clip the box to an image of the given size
    ///
    /// The result may be invalid if the box lies entirely outside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let w = width.min(i32::MAX as u32) as i32;
        let h = height.min(i32::MAX as u32) as i32;
        Self {
            x1: self.x1.clamp(0, w),
            y1: self.y1.clamp(0, h),
            x2: self.x2.clamp(0, w),
            y2: self.y2.clamp(0, h),
        }
    }

    /// Where this box lands after the whole image (of height `image_height`)
    /// is rotated 90° clockwise.
    pub fn rotated_cw(&self, image_height: u32) -> Self {
        let h = image_height as i32;
        Self::new(h - self.y2, self.x1, h - self.y1, self.x2)
    }

    /// Where this box lands after the whole image (of width `image_width`)
    /// is rotated 90° counter-clockwise. Inverse of [`Self::rotated_cw`].
    pub fn rotated_ccw(&self, image_width: u32) -> Self {
        let w = image_width as i32;
        Self::new(self.y1, w - self.x2, self.y2, w - self.x1)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_validity() {
        let bbox = BoundingBox::new(10, 20, 40, 30);
        assert_eq!(bbox.width(), 30);
        assert_eq!(bbox.height(), 10);
        assert_eq!(bbox.area(), 300);
        assert!(bbox.is_valid());

        let flat = BoundingBox::new(5, 5, 5, 9);
        assert!(!flat.is_valid());
        assert_eq!(flat.area(), 0);
    }

    #[test]
    fn test_bbox_iou() {
        let box1 = BoundingBox::from_xywh(0, 0, 10, 10);
        let box2 = BoundingBox::from_xywh(5, 5, 10, 10);

        let iou = box1.iou(&box2);
        assert!((iou - 25.0 / 175.0).abs() < 1e-9);
        assert_eq!(box1.iou(&BoundingBox::from_xywh(20, 20, 5, 5)), 0.0);
    }

    #[test]
    fn test_clamp_to_image() {
        let bbox = BoundingBox::new(-5, 10, 120, 60).clamp_to(100, 50);
        assert_eq!(bbox, BoundingBox::new(0, 10, 100, 50));

        let outside = BoundingBox::new(150, 10, 180, 20).clamp_to(100, 50);
        assert!(!outside.is_valid());
    }

    #[test]
    fn test_rotation_round_trip() {
        // 100 wide, 60 tall; rotated clockwise it becomes 60 wide, 100 tall
        let bbox = BoundingBox::new(10, 5, 30, 25);
        let rotated = bbox.rotated_cw(60);
        assert_eq!(rotated, BoundingBox::new(35, 10, 55, 30));
        assert_eq!(rotated.width(), bbox.height());
        assert_eq!(rotated.height(), bbox.width());
        assert_eq!(rotated.rotated_ccw(60), bbox);
    }
}
