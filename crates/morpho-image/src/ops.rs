use crate::error::ImageError;
use crate::image::{Image, ImageDtype};

/// Convert a floating point image to u8 with rounding and clamping to 0..255.
pub fn u8_from_f32<const C: usize>(src: &Image<f32, C>) -> Result<Image<u8, C>, ImageError> {
    let data = src.as_slice().iter().map(|&v| u8::from_f32(v)).collect();
    Image::new(src.size(), data)
}

/// Drop the alpha channel of an RGBA image.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
///
/// # Returns
///
/// The same image with only the three color channels.
pub fn rgb_from_rgba<T>(src: &Image<T, 4>) -> Result<Image<T, 3>, ImageError>
where
    T: Copy,
{
    let mut data = Vec::with_capacity(src.width() * src.height() * 3);
    for pixel in src.as_slice().chunks_exact(4) {
        data.extend_from_slice(&pixel[..3]);
    }

    Image::new(src.size(), data)
}

/// Stack a single channel image onto an RGB image as its alpha channel.
///
/// The two images must share the same spatial size.
pub fn stack_alpha<T>(src: &Image<T, 3>, alpha: &Image<T, 1>) -> Result<Image<T, 4>, ImageError>
where
    T: Copy,
{
    if src.size() != alpha.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            alpha.width(),
            alpha.height(),
        ));
    }

    let mut data = Vec::with_capacity(src.width() * src.height() * 4);
    for (pixel, a) in src.as_slice().chunks_exact(3).zip(alpha.as_slice()) {
        data.extend_from_slice(pixel);
        data.push(*a);
    }

    Image::new(src.size(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSize;

    #[test]
    fn drop_alpha() -> Result<(), ImageError> {
        let rgba = Image::<u8, 4>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2, 3, 255, 4, 5, 6, 128],
        )?;
        let rgb = rgb_from_rgba(&rgba)?;
        assert_eq!(rgb.as_slice(), &[1, 2, 3, 4, 5, 6]);

        Ok(())
    }

    #[test]
    fn stack_alpha_roundtrip() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let rgb = Image::<u8, 3>::new(size, vec![1, 2, 3, 4, 5, 6])?;
        let mask = Image::<u8, 1>::new(size, vec![255, 0])?;

        let rgba = stack_alpha(&rgb, &mask)?;
        assert_eq!(rgba.as_slice(), &[1, 2, 3, 255, 4, 5, 6, 0]);
        assert_eq!(rgb_from_rgba(&rgba)?.as_slice(), rgb.as_slice());

        Ok(())
    }

    #[test]
    fn u8_conversion_rounds_and_clamps() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![-3.0, 0.4, 127.5, 300.0],
        )?;
        let out = u8_from_f32(&img)?;
        assert_eq!(out.as_slice(), &[0, 0, 128, 255]);

        Ok(())
    }

    #[test]
    fn stack_alpha_size_mismatch() {
        let rgb = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )
        .unwrap();
        let mask = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )
        .unwrap();
        assert!(stack_alpha(&rgb, &mask).is_err());
    }
}
