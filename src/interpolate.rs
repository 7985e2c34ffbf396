//! Interpolation utilities

use std::ops::{Add, Mul};

use nalgebra::{Vector2, Vector3, Vector4};

/// Describes a type that can be interpolated with barycentric coordinates.
///
/// Shader varyings are collapsed from their three per-vertex records into a
/// single fragment-scoped value with this operation. The weighting is linear
/// in screen space, so attributes interpolated this way are not
/// perspective-correct.
pub trait Interpolate {
    /// Interpolate the three values with their corresponding barycentric coordinate weight
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self;
}

/// Convenience method for interpolating three values with barycentric coordinates.
#[inline]
pub fn barycentric_interpolate<T>(u: f32, ux: T, v: f32, vx: T, w: f32, wx: T) -> T where T: Add<Output = T> + Mul<f32, Output = T> {
    ux * u + vx * v + wx * w
}

impl Interpolate for () {
    #[inline(always)]
    fn barycentric_interpolate(_: f32, _: &Self, _: f32, _: &Self, _: f32, _: &Self) -> Self { () }
}

impl Interpolate for f32 {
    #[inline(always)]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        x1 * u + x2 * v + x3 * w
    }
}

macro_rules! vector_interpolate {
    ($($ty:ty),* $(,)*) => {$(
        impl Interpolate for $ty {
            #[inline]
            fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
                x1 * u + x2 * v + x3 * w
            }
        }
    )*}
}

vector_interpolate!(Vector2<f32>, Vector3<f32>, Vector4<f32>);
