use morpho_image::{Image, ImageError};
use rayon::prelude::*;

use crate::interpolation::{interpolate_pixel, InterpolationMode};

/// Resize an image to the size of the destination image.
///
/// Each destination pixel samples the source at the proportionally mapped
/// coordinate using the requested interpolation mode.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with the target shape.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::interpolation::InterpolationMode;
/// use morpho_imgproc::resize::resize_native;
///
/// let image = Image::<f32, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1.0,
/// ).unwrap();
///
/// let mut resized = Image::<f32, 3>::from_size_val(
///     ImageSize {
///         width: 2,
///         height: 3,
///     },
///     0.0,
/// ).unwrap();
///
/// resize_native(&image, &mut resized, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(resized.size().width, 2);
/// assert_eq!(resized.size().height, 3);
/// ```
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.as_slice().is_empty() || dst.as_slice().is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());

    // map destination pixel centers onto the source grid
    let step_x = if dst_cols > 1 {
        (src.cols() - 1) as f32 / (dst_cols - 1) as f32
    } else {
        0.0
    };
    let step_y = if dst_rows > 1 {
        (src.rows() - 1) as f32 / (dst_rows - 1) as f32
    } else {
        0.0
    };

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * dst_cols)
        .enumerate()
        .for_each(|(row, dst_chunk)| {
            let v = row as f32 * step_y;
            dst_chunk
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(col, dst_pixel)| {
                    let u = col as f32 * step_x;
                    for (k, pixel) in dst_pixel.iter_mut().enumerate() {
                        *pixel = interpolate_pixel(src, u, v, k, interpolation);
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::{Image, ImageError, ImageSize};

    #[test]
    fn resize_smoke() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0.0; 4 * 5 * 3],
        )?;

        let mut resized = Image::<f32, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0.0,
        )?;

        resize_native(&image, &mut resized, InterpolationMode::Bilinear)?;

        assert_eq!(resized.num_channels(), 3);
        assert_eq!(resized.size().width, 2);
        assert_eq!(resized.size().height, 3);

        Ok(())
    }

    #[test]
    fn resize_identity_preserves_pixels() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            (0..6).map(|x| x as f32).collect(),
        )?;

        let mut resized = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        resize_native(&image, &mut resized, InterpolationMode::Bilinear)?;

        assert_eq!(resized.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn resize_upscale_corners_match() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0, 10.0, 20.0, 30.0],
        )?;

        let mut resized = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0.0,
        )?;
        resize_native(&image, &mut resized, InterpolationMode::Bilinear)?;

        let data = resized.as_slice();
        assert_eq!(data[0], 0.0);
        assert_eq!(data[3], 10.0);
        assert_eq!(data[12], 20.0);
        assert_eq!(data[15], 30.0);

        Ok(())
    }
}
