//! Minimalist framebuffer structure with an emphasis on performance

use nalgebra::{Matrix4, Vector4};

use crate::error::{RenderError, RenderResult};
use crate::texture::Texture;
use crate::utils::clamp;

const COLOR_CHANNELS: u32 = 3;

/// Render target for the rasterizer.
///
/// It contains an RGB color buffer, a parallel depth buffer, and the fixed
/// viewport transform derived from the buffer dimensions. Dimensions never
/// change after creation.
pub struct Framebuffer {
    color: Texture,
    depth: Vec<f32>,
    viewport: Matrix4<f32>,
}

impl Framebuffer {
    /// Create a framebuffer with cleared color and depth attachments.
    pub fn new(width: u32, height: u32) -> RenderResult<Framebuffer> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions(width, height));
        }

        Ok(Framebuffer {
            color: Texture::new(width, height, COLOR_CHANNELS)?,
            depth: vec![f32::MAX; (width * height) as usize],
            viewport: viewport_matrix(width as f32, height as f32),
        })
    }

    /// Get the width of the framebuffer in pixels
    #[inline(always)]
    pub fn width(&self) -> u32 { self.color.width() }

    /// Get the height of the framebuffer in pixels
    #[inline(always)]
    pub fn height(&self) -> u32 { self.color.height() }

    /// Viewport transform mapping NDC onto this framebuffer
    #[inline(always)]
    pub fn viewport(&self) -> &Matrix4<f32> { &self.viewport }

    /// Color attachment, 3 bytes per pixel
    #[inline]
    pub fn color_buffer(&self) -> &Texture { &self.color }

    /// Depth attachment, one float per pixel, smaller is nearer
    #[inline]
    pub fn depth_buffer(&self) -> &[f32] { &self.depth }

    /// Reset every color byte to 0 and every depth cell to the farthest
    /// finite depth.
    pub fn clear(&mut self) {
        self.color.clear();

        for depth in &mut self.depth {
            *depth = f32::MAX;
        }
    }

    #[inline]
    pub(crate) fn depth_at(&self, index: usize) -> f32 {
        self.depth[index]
    }

    #[inline]
    pub(crate) fn set_depth(&mut self, index: usize, depth: f32) {
        self.depth[index] = depth;
    }

    /// Write a fragment color at the given pixel. Channels are clamped to
    /// `[0,1]` and quantized to a byte; the alpha component is ignored.
    pub(crate) fn write_pixel(&mut self, x: u32, y: u32, color: &Vector4<f32>) {
        let index = ((y * self.width() + x) * COLOR_CHANNELS) as usize;
        let pixel = &mut self.color.buffer_mut()[index..index + COLOR_CHANNELS as usize];
        let rgb = [color.x, color.y, color.z];

        for (channel, value) in pixel.iter_mut().zip(rgb.iter()) {
            *channel = (clamp(*value, 0.0, 1.0) * 255.0).round() as u8;
        }
    }
}

/// Viewport matrix mapping the NDC cube `[-1,1]^3` onto
/// `[0,w] x [0,h] x [0,1]`.
fn viewport_matrix(width: f32, height: f32) -> Matrix4<f32> {
    Matrix4::new(
        width / 2.0, 0.0, 0.0, width / 2.0,
        0.0, height / 2.0, 0.0, height / 2.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(Framebuffer::new(0, 4).is_err());
        assert!(Framebuffer::new(4, 0).is_err());
    }

    #[test]
    fn starts_cleared() {
        let framebuffer = Framebuffer::new(2, 2).unwrap();

        assert!(framebuffer.color_buffer().buffer().iter().all(|&byte| byte == 0));
        assert!(framebuffer.depth_buffer().iter().all(|&depth| depth == f32::MAX));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut framebuffer = Framebuffer::new(2, 2).unwrap();

        framebuffer.write_pixel(1, 1, &Vector4::new(1.0, 0.5, 0.0, 1.0));
        framebuffer.set_depth(3, 0.25);

        framebuffer.clear();
        let color_once: Vec<u8> = framebuffer.color_buffer().buffer().to_vec();
        let depth_once: Vec<f32> = framebuffer.depth_buffer().to_vec();

        framebuffer.clear();
        assert_eq!(framebuffer.color_buffer().buffer(), &color_once[..]);
        assert_eq!(framebuffer.depth_buffer(), &depth_once[..]);
        assert!(depth_once.iter().all(|&depth| depth == f32::MAX));
    }

    #[test]
    fn viewport_maps_ndc_to_screen() {
        let framebuffer = Framebuffer::new(4, 2).unwrap();

        let center = framebuffer.viewport() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!((center.x, center.y, center.z), (2.0, 1.0, 0.5));

        let corner = framebuffer.viewport() * Vector4::new(-1.0, -1.0, -1.0, 1.0);
        assert_eq!((corner.x, corner.y, corner.z), (0.0, 0.0, 0.0));

        let far = framebuffer.viewport() * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!((far.x, far.y, far.z), (4.0, 2.0, 1.0));
    }

    #[test]
    fn write_clamps_out_of_range_channels() {
        let mut framebuffer = Framebuffer::new(2, 2).unwrap();

        framebuffer.write_pixel(0, 0, &Vector4::new(2.0, -1.0, 0.5, 1.0));
        assert_eq!(&framebuffer.color_buffer().buffer()[0..3], &[255, 0, 128]);

        // NaN channels must clamp to zero, not poison the buffer
        framebuffer.write_pixel(1, 0, &Vector4::new(f32::NAN, 1.0, 1.0, 1.0));
        assert_eq!(&framebuffer.color_buffer().buffer()[3..6], &[0, 255, 255]);
    }
}
