//! Image processing utilities on `image::RgbImage`

use crate::error::{Result, SetError};
use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use setvision_core::BoundingBox;
use std::path::Path;

/// Classifier-ready region: RGB floats in `[0, 1]`, row-major, HWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInput {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Decode an encoded image (PNG, JPEG, ...) into RGB
    pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| SetError::MalformedImage(e.to_string()))?
            .to_rgb8();
        Self::ensure_not_empty(&image)?;
        Ok(image)
    }

    /// Reject images without pixels
    pub fn ensure_not_empty(image: &RgbImage) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SetError::MalformedImage(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(())
    }

    /// Load image from disk as RGB
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> anyhow::Result<RgbImage> {
        let image = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?
            .to_rgb8();
        Ok(image)
    }

    /// Save image, format chosen from the file extension
    pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> anyhow::Result<()> {
        image
            .save(&path)
            .with_context(|| format!("Failed to save image: {:?}", path.as_ref()))
    }

    /// Copy the pixels under `bbox`, clipped to the image
    pub fn crop(image: &RgbImage, bbox: BoundingBox) -> RgbImage {
        let clipped = bbox.clamp_to(image.width(), image.height());
        if !clipped.is_valid() {
            return RgbImage::new(0, 0);
        }
        imageops::crop_imm(
            image,
            clipped.x1 as u32,
            clipped.y1 as u32,
            clipped.width() as u32,
            clipped.height() as u32,
        )
        .to_image()
    }

    pub fn rotate_cw(image: &RgbImage) -> RgbImage {
        imageops::rotate90(image)
    }

    pub fn rotate_ccw(image: &RgbImage) -> RgbImage {
        imageops::rotate270(image)
    }

    /// Resize to `(width, height)` and scale channels to `[0, 1]`
    pub fn to_classifier_input(region: &RgbImage, size: (u32, u32)) -> ClassifierInput {
        let (width, height) = size;
        let resized = imageops::resize(region, width, height, FilterType::Triangle);
        let data = resized
            .as_raw()
            .iter()
            .map(|&channel| channel as f32 / 255.0)
            .collect();
        ClassifierInput {
            width,
            height,
            data,
        }
    }

    /// Draw a rectangle outline of `thickness` pixels centred on the box edge.
    ///
    /// Pixels outside the image are skipped.
    pub fn draw_hollow_rect(image: &mut RgbImage, bbox: BoundingBox, color: Rgb<u8>, thickness: u32) {
        if thickness == 0 || !bbox.is_valid() {
            return;
        }
        // edge lines run along the first and last pixel rows/columns of the box
        let t = thickness.min(i32::MAX as u32) as i32;
        let half = t / 2;
        let outer = BoundingBox::new(
            bbox.x1 - half,
            bbox.y1 - half,
            bbox.x2 - 1 - half + t,
            bbox.y2 - 1 - half + t,
        );
        let inner = BoundingBox::new(
            bbox.x1 - half + t,
            bbox.y1 - half + t,
            bbox.x2 - 1 - half,
            bbox.y2 - 1 - half,
        );

        let region = outer.clamp_to(image.width(), image.height());
        for y in region.y1..region.y2 {
            for x in region.x1..region.x2 {
                let inside = x >= inner.x1 && x < inner.x2 && y >= inner.y1 && y < inner.y2;
                if !inside {
                    image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}

#[cfg(feature = "opencv")]
mod cv {
    use super::ImageUtils;
    use anyhow::{Context, ensure};
    use image::RgbImage;
    use opencv::{
        core::{CV_8UC3, Mat},
        imgproc,
        prelude::*,
    };

    impl ImageUtils {
        /// Convert a BGR OpenCV Mat into an RGB image
        pub fn mat_to_rgb(mat: &Mat) -> anyhow::Result<RgbImage> {
            ensure!(mat.typ() == CV_8UC3, "expected an 8-bit 3-channel Mat");
            let mut rgb = Mat::default();
            imgproc::cvt_color(mat, &mut rgb, imgproc::COLOR_BGR2RGB, 0)
                .context("Failed to convert Mat from BGR to RGB")?;

            let bytes = rgb.data_bytes().context("Mat is not continuous")?.to_vec();
            RgbImage::from_raw(rgb.cols() as u32, rgb.rows() as u32, bytes)
                .context("Mat size does not match its pixel buffer")
        }

        /// Convert an RGB image into a BGR OpenCV Mat
        pub fn rgb_to_mat(image: &RgbImage) -> anyhow::Result<Mat> {
            let flat = Mat::from_slice(image.as_raw()).context("Failed to wrap pixel buffer")?;
            let rgb = flat
                .reshape(3, image.height() as i32)
                .context("Failed to reshape pixel buffer")?
                .try_clone()?;

            let mut bgr = Mat::default();
            imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)
                .context("Failed to convert Mat from RGB to BGR")?;
            Ok(bgr)
        }
    }
}
