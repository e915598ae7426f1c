use morpho_face::{BoundaryConfig, Landmarks};
use morpho_image::{Image, ImageSize};
use morpho_imgproc::interpolation::InterpolationMode;
use morpho_imgproc::warp::warp_piecewise_affine;

use crate::error::MorphError;

/// Warp a face image into a destination landmark geometry.
///
/// Both landmark sets are augmented with the same synthetic boundary
/// points before triangulation so the mesh anchors beyond the facial hull
/// instead of leaving holes at the canvas periphery. The output canvas has
/// the requested size; pixels outside the mesh remain black.
///
/// # Arguments
///
/// * `img` - The source image.
/// * `src_points` - Landmarks detected on the source image.
/// * `dst_points` - The target geometry, same length as `src_points`.
/// * `size` - The output canvas size.
/// * `boundary` - The boundary point derivation applied to both sets.
pub fn warp_face(
    img: &Image<f32, 3>,
    src_points: &Landmarks,
    dst_points: &Landmarks,
    size: ImageSize,
    boundary: &BoundaryConfig,
) -> Result<Image<f32, 3>, MorphError> {
    let src_aug = src_points.with_boundary_points(boundary);
    let dst_aug = dst_points.with_boundary_points(boundary);

    let mut dst = Image::from_size_val(size, 0.0)?;
    warp_piecewise_affine(
        img,
        &mut dst,
        src_aug.as_slice(),
        dst_aug.as_slice(),
        InterpolationMode::Bilinear,
    )?;

    Ok(dst)
}
