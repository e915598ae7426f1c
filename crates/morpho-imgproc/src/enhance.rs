use morpho_image::{Image, ImageError};

use crate::filter::gaussian_blur;
use crate::parallel;

/// Performs weighted addition of two images `src1` and `src2` with weights
/// `alpha` and `beta`, and an optional scalar `gamma`. The formula used is:
///
/// dst(x,y,c) = src1(x,y,c) * alpha + src2(x,y,c) * beta + gamma
///
/// # Arguments
///
/// * `src1` - The first input image.
/// * `alpha` - Weight of the first image elements to be multiplied.
/// * `src2` - The second input image.
/// * `beta` - Weight of the second image elements to be multiplied.
/// * `gamma` - Scalar added to each sum.
/// * `dst` - The output image.
///
/// # Errors
///
/// Returns an error if the sizes of `src1`, `src2` and `dst` do not match.
pub fn add_weighted<const C: usize>(
    src1: &Image<f32, C>,
    alpha: f32,
    src2: &Image<f32, C>,
    beta: f32,
    gamma: f32,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.width(),
            src1.height(),
            src2.width(),
            src2.height(),
        ));
    }

    if src1.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src1.width(),
            src1.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::par_iter_rows_val_two(src1, src2, dst, |&src1_pixel, &src2_pixel, dst_pixel| {
        *dst_pixel = src1_pixel * alpha + src2_pixel * beta + gamma;
    });

    Ok(())
}

/// Sharpen an image by subtracting a fraction of its gaussian blur.
///
/// dst = src * 1.4 + blur(src, sigma=2.5) * -0.4
pub fn sharpen(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    const SIGMA: f32 = 2.5;
    // kernel wide enough to cover three sigmas on each side
    let kernel_size = 2 * (3.0 * SIGMA).ceil() as usize + 1;

    let mut blurred = Image::from_size_val(src.size(), 0.0)?;
    gaussian_blur(
        src,
        &mut blurred,
        (kernel_size, kernel_size),
        (SIGMA, SIGMA),
    )?;

    add_weighted(src, 1.4, &blurred, -0.4, 0.0, dst)
}
