#[macro_use]
extern crate failure;

pub mod camera;
pub mod error;
pub mod framebuffer;
pub mod interpolate;
pub mod pipeline;
pub mod texture;
pub mod utils;

#[cfg(feature = "image_compat")]
pub mod image_compat;

#[cfg(feature = "minifb_compat")]
pub mod minifb_compat;
