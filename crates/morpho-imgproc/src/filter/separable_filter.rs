use morpho_image::{Image, ImageError};
use rayon::prelude::*;

/// Apply a separable 2d filter as a horizontal then a vertical 1d pass.
///
/// Samples outside the image clamp to the nearest edge pixel, consistent
/// with the resampling kernels in this crate.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with the same shape.
/// * `kernel_x` - The horizontal convolution kernel.
/// * `kernel_y` - The vertical convolution kernel.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
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
    let half_x = (kernel_x.len() / 2) as i64;
    let half_y = (kernel_y.len() / 2) as i64;

    // horizontal pass
    let mut tmp = vec![0.0f32; src.as_slice().len()];
    let src_data = src.as_slice();
    tmp.par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, tmp_row)| {
            let src_row = &src_data[y * C * cols..(y + 1) * C * cols];
            for x in 0..cols {
                for (k_idx, &k) in kernel_x.iter().enumerate() {
                    let nx = (x as i64 + k_idx as i64 - half_x).clamp(0, cols as i64 - 1) as usize;
                    for c in 0..C {
                        tmp_row[x * C + c] += k * src_row[nx * C + c];
                    }
                }
            }
        });

    // vertical pass
    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row.fill(0.0);
            for (k_idx, &k) in kernel_y.iter().enumerate() {
                let ny = (y as i64 + k_idx as i64 - half_y).clamp(0, rows as i64 - 1) as usize;
                let tmp_row = &tmp[ny * C * cols..(ny + 1) * C * cols];
                for (d, t) in dst_row.iter_mut().zip(tmp_row.iter()) {
                    *d += k * t;
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use morpho_image::{Image, ImageSize};

    #[test]
    fn identity_kernel_preserves_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let src = Image::<f32, 1>::new(size, (0..12).map(|x| x as f32).collect())?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        separable_filter(&src, &mut dst, &[1.0], &[1.0])?;
        assert_eq!(dst.as_slice(), src.as_slice());

        Ok(())
    }

    #[test]
    fn uniform_image_is_unchanged_by_blur() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 6,
        };
        let src = Image::<f32, 3>::from_size_val(size, 42.0)?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 0.0)?;

        let kernel = vec![1.0 / 3.0; 3];
        separable_filter(&src, &mut dst, &kernel, &kernel)?;

        for &v in dst.as_slice() {
            assert_relative_eq!(v, 42.0, epsilon = 1e-4);
        }

        Ok(())
    }
}
