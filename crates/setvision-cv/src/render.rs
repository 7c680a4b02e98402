//! Drawing found SETs onto the board

use crate::detection::config::RenderConfig;
use crate::utils::ImageUtils;
use image::{Rgb, RgbImage};
use setvision_core::SetCandidate;

/// Outlines the cards of every SET, one palette color per SET
#[derive(Debug, Clone)]
pub struct ResultRenderer {
    palette: Vec<Rgb<u8>>,
    stroke_width: u32,
}

impl ResultRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        let mut palette: Vec<Rgb<u8>> = config
            .palette
            .iter()
            .map(|&(r, g, b)| Rgb([r, g, b]))
            .collect();
        if palette.is_empty() {
            palette.push(Rgb([255, 0, 0]));
        }
        Self {
            palette,
            stroke_width: config.stroke_width,
        }
    }

    /// Color used for the SET at position `index`
    pub fn color_for(&self, index: usize) -> Rgb<u8> {
        self.palette[index % self.palette.len()]
    }

    /// Annotated copy of `image`. Cards shared between SETs get one outline
    /// per SET, later SETs drawn over earlier ones.
    pub fn render(&self, image: &RgbImage, sets: &[SetCandidate]) -> RgbImage {
        let mut output = image.clone();
        for (index, set) in sets.iter().enumerate() {
            let color = self.color_for(index);
            for card in &set.cards {
                ImageUtils::draw_hollow_rect(&mut output, card.bbox, color, self.stroke_width);
            }
        }
        output
    }
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}
