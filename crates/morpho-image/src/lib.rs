#![deny(missing_docs)]
//! Image container types for generating and manipulating raster images

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// channel stacking and splitting operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
