//! Geometric image warping.
//!
//! The piecewise-affine warp resamples a source image into a destination
//! landmark geometry: the destination point set is triangulated, every
//! triangle gets its own destination-to-source affine transform, and each
//! destination pixel inside the mesh samples the source through the
//! transform of the triangle containing it.

mod piecewise;

pub use piecewise::warp_piecewise_affine;

use crate::mesh::MeshError;
use morpho_image::ImageError;

/// Errors produced by warp operations.
#[derive(thiserror::Error, Debug)]
pub enum WarpError {
    /// The underlying mesh could not be built.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// An image buffer operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}
