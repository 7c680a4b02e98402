//! Symbol color from HSV pixel statistics
//!
//! HSV follows the OpenCV 8-bit convention: hue in half degrees (0..=180),
//! saturation and value in 0..=255.

use crate::detection::config::ColorThresholds;
use image::{Rgb, RgbImage};
use setvision_core::Color;

/// Convert one RGB pixel to 8-bit HSV
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let saturation = if max == 0.0 { 0.0 } else { diff * 255.0 / max };

    let mut hue = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    [(hue / 2.0).round() as u8, saturation.round() as u8, max as u8]
}

/// Pixel counts per color band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounts {
    pub green: usize,
    pub purple: usize,
    pub red: usize,
}

impl ColorCounts {
    /// Label with the most pixels; ties resolve green, then purple, then red
    pub fn winner(&self) -> Color {
        let ranked = [
            (Color::Green, self.green),
            (Color::Purple, self.purple),
            (Color::Red, self.red),
        ];
        let mut best = ranked[0];
        for candidate in &ranked[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best.0
    }
}

/// Deterministic color classifier for a single shape region
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorClassifier {
    thresholds: ColorThresholds,
}

impl ColorClassifier {
    pub fn new(thresholds: ColorThresholds) -> Self {
        Self { thresholds }
    }

    /// Count the pixels falling into each color band
    pub fn counts(&self, region: &RgbImage) -> ColorCounts {
        let t = &self.thresholds;
        let mut counts = ColorCounts::default();

        for pixel in region.pixels() {
            let [h, s, v] = rgb_to_hsv(*pixel);
            if s < t.min_saturation || v < t.min_value {
                continue;
            }
            if t.green.contains(h) {
                counts.green += 1;
            }
            if t.purple.contains(h) {
                counts.purple += 1;
            }
            if t.red_low.contains(h) || t.red_high.contains(h) {
                counts.red += 1;
            }
        }
        counts
    }

    /// Dominant symbol color. Never returns `Color::Unknown`; a region with
    /// no qualifying pixels reports green.
    pub fn classify(&self, region: &RgbImage) -> Color {
        self.counts(region).winner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(6, 6, Rgb(rgb))
    }

    #[test]
    fn test_hsv_matches_opencv_convention() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(Rgb([0, 200, 0])), [60, 255, 200]);
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), [120, 255, 255]);
        assert_eq!(rgb_to_hsv(Rgb([128, 0, 128])), [150, 255, 128]);
        assert_eq!(rgb_to_hsv(Rgb([90, 90, 90])), [0, 0, 90]);
    }

    #[test]
    fn test_pure_symbol_colors() {
        let classifier = ColorClassifier::default();
        assert_eq!(classifier.classify(&solid([220, 30, 40])), Color::Red);
        assert_eq!(classifier.classify(&solid([20, 160, 60])), Color::Green);
        assert_eq!(classifier.classify(&solid([110, 30, 140])), Color::Purple);
    }

    #[test]
    fn test_red_wraps_around_hue_zero() {
        // magenta-leaning red lands in the upper red band
        let [h, _, _] = rgb_to_hsv(Rgb([230, 20, 60]));
        assert!(h >= 170);
        assert_eq!(ColorClassifier::default().classify(&solid([230, 20, 60])), Color::Red);
    }

    #[test]
    fn test_gray_and_white_pixels_are_ignored() {
        let classifier = ColorClassifier::default();
        let mut region = solid([250, 250, 250]);
        region.put_pixel(0, 0, Rgb([120, 20, 150]));

        let counts = classifier.counts(&region);
        assert_eq!(counts, ColorCounts { green: 0, purple: 1, red: 0 });
        assert_eq!(classifier.classify(&region), Color::Purple);
    }

    #[test]
    fn test_empty_region_defaults_to_green() {
        let classifier = ColorClassifier::default();
        assert_eq!(classifier.classify(&solid([255, 255, 255])), Color::Green);
        assert_eq!(classifier.classify(&RgbImage::new(0, 0)), Color::Green);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = ColorClassifier::default();
        let region = RgbImage::from_fn(9, 9, |x, y| {
            if (x + y) % 2 == 0 { Rgb([200, 20, 20]) } else { Rgb([20, 180, 40]) }
        });
        let first = classifier.classify(&region);
        for _ in 0..5 {
            assert_eq!(classifier.classify(&region), first);
        }
        // 41 red pixels against 40 green ones
        assert_eq!(first, Color::Red);
    }
}
