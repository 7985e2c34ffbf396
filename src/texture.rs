//! Texture storage and sampling

use nalgebra::{Vector2, Vector4};

use crate::error::{RenderError, RenderResult};

/// Row-major image buffer with a top-left origin and 8 bits per channel.
///
/// A `Texture` doubles as the color attachment of a
/// [`Framebuffer`](crate::framebuffer::Framebuffer) and as sampler input for
/// fragment shaders.
pub struct Texture {
    width: u32,
    height: u32,
    channels: u32,
    buffer: Vec<u8>,
}

impl Texture {
    /// Create a zeroed texture. `channels` must be in `1..=4`.
    pub fn new(width: u32, height: u32, channels: u32) -> RenderResult<Texture> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions(width, height));
        }

        if channels < 1 || channels > 4 {
            return Err(RenderError::InvalidChannelCount(channels));
        }

        Ok(Texture {
            width,
            height,
            channels,
            buffer: vec![0; (width * height * channels) as usize],
        })
    }

    /// Wrap an existing byte buffer, which must hold exactly
    /// `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: u32, buffer: Vec<u8>) -> RenderResult<Texture> {
        let mut texture = Texture::new(width, height, channels)?;

        if buffer.len() != texture.buffer.len() {
            return Err(RenderError::InvalidBufferSize(buffer.len(), width, height, channels));
        }

        texture.buffer = buffer;

        Ok(texture)
    }

    /// Get the width of the texture in pixels
    #[inline(always)]
    pub fn width(&self) -> u32 { self.width }

    /// Get the height of the texture in pixels
    #[inline(always)]
    pub fn height(&self) -> u32 { self.height }

    /// Get the number of color channels per pixel
    #[inline(always)]
    pub fn channels(&self) -> u32 { self.channels }

    /// Raw bytes, row-major from the top-left pixel
    #[inline]
    pub fn buffer(&self) -> &[u8] { &self.buffer }

    /// Mutable access to the raw bytes
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [u8] { &mut self.buffer }

    /// Zero every byte of the buffer
    pub fn clear(&mut self) {
        for byte in &mut self.buffer {
            *byte = 0;
        }
    }

    /// Sample the nearest pixel to a texture coordinate in `[0,1]x[0,1]`.
    ///
    /// Channel values are mapped to floats in `[0,1]`; channels the texture
    /// does not have are returned as 0. The caller is responsible for
    /// wrapping or clamping coordinates beforehand.
    pub fn sample(&self, texcoord: Vector2<f32>) -> Vector4<f32> {
        let u = texcoord.x;
        let v = texcoord.y;

        debug_assert!(0.0 <= u && u <= 1.0 && 0.0 <= v && v <= 1.0,
                      "texture coordinate ({}, {}) outside [0,1]", u, v);

        let x = ((self.width - 1) as f32 * u).round() as u32;
        let y = ((self.height - 1) as f32 * v).round() as u32;

        let index = ((y * self.width + x) * self.channels) as usize;
        let pixel = &self.buffer[index..index + self.channels as usize];

        let mut color = [0.0f32; 4];

        for (value, byte) in color.iter_mut().zip(pixel) {
            *value = *byte as f32 / 255.0;
        }

        Vector4::new(color[0], color[1], color[2], color[3])
    }
}
