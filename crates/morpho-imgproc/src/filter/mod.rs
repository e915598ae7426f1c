//! Image filtering module.

pub mod kernels;
mod ops;
mod separable_filter;

pub use ops::{box_blur, gaussian_blur};
pub use separable_filter::separable_filter;
