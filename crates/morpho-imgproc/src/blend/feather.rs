use morpho_image::{Image, ImageError};
use rayon::prelude::*;

use crate::enhance::add_weighted;
use crate::filter::box_blur;

/// Per-pixel linear blend of two images.
///
/// dst = a * percent + b * (1 - percent)
pub fn weighted_average(
    a: &Image<f32, 3>,
    b: &Image<f32, 3>,
    percent: f32,
    dst: &mut Image<f32, 3>,
) -> Result<(), ImageError> {
    add_weighted(a, percent, b, 1.0 - percent, 0.0, dst)
}

/// Replace destination pixels with source pixels wherever the mask is set.
///
/// The hard-edged counterpart of [`alpha_feathering`].
pub fn flat_replace(
    src: &Image<f32, 3>,
    dst: &Image<f32, 3>,
    mask: &Image<u8, 1>,
    out: &mut Image<f32, 3>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() || src.size() != out.size() || src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let cols = src.cols();
    out.as_slice_mut()
        .par_chunks_exact_mut(3 * cols)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row = &src.as_slice()[y * 3 * cols..(y + 1) * 3 * cols];
            let dst_row = &dst.as_slice()[y * 3 * cols..(y + 1) * 3 * cols];
            let mask_row = &mask.as_slice()[y * cols..(y + 1) * cols];

            for (x, m) in mask_row.iter().enumerate() {
                let from = if *m != 0 { src_row } else { dst_row };
                out_row[x * 3..x * 3 + 3].copy_from_slice(&from[x * 3..x * 3 + 3]);
            }
        });

    Ok(())
}

/// Blend a source into a destination through a feathered mask.
///
/// The mask is box-blurred to produce a smooth 0..1 gradient at its
/// boundary, then every channel is lerped between destination (mask 0)
/// and source (mask 255).
///
/// # Arguments
///
/// * `src` - The image composited inside the mask.
/// * `dst` - The image kept outside the mask.
/// * `mask` - The face-region mask, same spatial size as the images.
/// * `blur_radius` - The box blur kernel side length applied to the mask.
/// * `out` - The output image.
pub fn alpha_feathering(
    src: &Image<f32, 3>,
    dst: &Image<f32, 3>,
    mask: &Image<u8, 1>,
    blur_radius: usize,
    out: &mut Image<f32, 3>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() || src.size() != out.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            mask.width(),
            mask.height(),
        ));
    }

    let mask_f32 = mask.cast::<f32>()?;
    let mut blurred = Image::from_size_val(mask.size(), 0.0)?;
    box_blur(&mask_f32, &mut blurred, (blur_radius, blur_radius))?;

    let cols = src.cols();
    out.as_slice_mut()
        .par_chunks_exact_mut(3 * cols)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row = &src.as_slice()[y * 3 * cols..(y + 1) * 3 * cols];
            let dst_row = &dst.as_slice()[y * 3 * cols..(y + 1) * 3 * cols];
            let mask_row = &blurred.as_slice()[y * cols..(y + 1) * cols];

            for (x, m) in mask_row.iter().enumerate() {
                let alpha = m / 255.0;
                for c in 0..3 {
                    let i = x * 3 + c;
                    out_row[i] = src_row[i] * alpha + dst_row[i] * (1.0 - alpha);
                }
            }
        });

    Ok(())
}
