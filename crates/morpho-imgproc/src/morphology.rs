use morpho_image::{Image, ImageError};
use rayon::prelude::*;

/// Erode a single channel image with a square structuring element.
///
/// Every output pixel is the minimum of the `kernel_size` x `kernel_size`
/// neighborhood centered on it. Neighbors outside the image are ignored,
/// so the border does not artificially erode the content.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `dst` - The output image with the same shape.
/// * `kernel_size` - The side length of the square kernel, at least 1.
pub fn erode(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (cols, rows) = (src.cols(), src.rows());
    let half = (kernel_size.max(1) / 2) as i64;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (x, out) in dst_row.iter_mut().enumerate() {
                let mut min_val = 255u8;
                for ky in -half..=half {
                    let ny = y as i64 + ky;
                    if ny < 0 || ny >= rows as i64 {
                        continue;
                    }
                    let row = &src_data[ny as usize * cols..(ny as usize + 1) * cols];
                    for kx in -half..=half {
                        let nx = x as i64 + kx;
                        if nx < 0 || nx >= cols as i64 {
                            continue;
                        }
                        min_val = min_val.min(row[nx as usize]);
                    }
                }
                *out = min_val;
            }
        });

    Ok(())
}
