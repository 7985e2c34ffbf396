//! Useful compatibility with the `image` crate

use image;

use crate::framebuffer::Framebuffer;

/// Additional functionality for copying a framebuffer into an image
pub trait ImageFramebuffer {
    /// Copies the RGB color attachment into an `image::RgbImage`.
    ///
    /// Channels were already clamped and quantized at fragment write time,
    /// so this is a plain byte copy.
    fn copy_to_image(&self) -> Option<image::RgbImage>;
}

impl ImageFramebuffer for Framebuffer {
    fn copy_to_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width(), self.height(), self.color_buffer().buffer().to_vec())
    }
}
