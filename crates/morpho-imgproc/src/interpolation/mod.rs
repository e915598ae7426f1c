//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling
//! images during geometric transformations like resizing or warping.
//!
//! Coordinates outside the source image clamp to the nearest edge pixel,
//! so a resampling map may safely produce slightly out-of-range positions.

mod bilinear;
mod nearest;

pub(crate) mod interpolate;

pub use interpolate::{interpolate_pixel, InterpolationMode};
