//! RGB frame type and face cropping.

use gatekeeper_core::BoundingBox;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("failed to decode frame {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
}

/// A decoded RGB frame.
#[derive(Clone)]
pub struct Frame {
    pub image: RgbImage,
}

impl Frame {
    /// Decode an image file into an RGB frame.
    pub fn open(path: &Path) -> Result<Self, FrameError> {
        let image = image::open(path)
            .map_err(|source| FrameError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgb8();
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Crop the face region, clamped to the frame.
    ///
    /// Returns `None` if the clamped region is empty.
    pub fn crop(&self, bbox: &BoundingBox) -> Option<RgbImage> {
        let left = bbox.left.min(self.width());
        let top = bbox.top.min(self.height());
        let right = bbox.right.min(self.width());
        let bottom = bbox.bottom.min(self.height());

        if right <= left || bottom <= top {
            return None;
        }

        Some(image::imageops::crop_imm(&self.image, left, top, right - left, bottom - top).to_image())
    }
}
