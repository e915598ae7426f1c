//! Image blending and compositing.
//!
//! The compositing strategies form a closed set: flat replacement under a
//! hard mask, alpha feathering with a blurred mask, and seamless
//! gradient-domain blending. All of them combine a source image into a
//! destination under a face-region mask derived from landmarks.

mod feather;
mod mask;
mod poisson;

pub use feather::{alpha_feathering, flat_replace, weighted_average};
pub use mask::mask_from_points;
pub use poisson::poisson_blend;

use morpho_image::{Image, ImageError};

/// Mask blur kernel used by the feathered strategy.
const FEATHER_BLUR_RADIUS: usize = 15;

/// The available compositing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Replace destination pixels inside the hard mask.
    #[default]
    Flat,
    /// Linear blend through a blurred mask boundary.
    Feathered,
    /// Gradient-domain blend with destination-pinned boundary.
    Seamless,
}

/// Composite a source into a destination under a mask with the selected
/// strategy.
///
/// # Arguments
///
/// * `mode` - The compositing strategy.
/// * `src` - The image composited inside the mask.
/// * `dst` - The image kept outside the mask.
/// * `mask` - The face-region mask, same spatial size as the images.
///
/// # Returns
///
/// The composited image.
pub fn composite(
    mode: BlendMode,
    src: &Image<f32, 3>,
    dst: &Image<f32, 3>,
    mask: &Image<u8, 1>,
) -> Result<Image<f32, 3>, ImageError> {
    match mode {
        BlendMode::Flat => {
            let mut out = Image::from_size_val(src.size(), 0.0)?;
            flat_replace(src, dst, mask, &mut out)?;
            Ok(out)
        }
        BlendMode::Feathered => {
            let mut out = Image::from_size_val(src.size(), 0.0)?;
            alpha_feathering(src, dst, mask, FEATHER_BLUR_RADIUS, &mut out)?;
            Ok(out)
        }
        BlendMode::Seamless => poisson_blend(src, dst, mask),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::ImageSize;

    fn block_mask(size: ImageSize) -> Image<u8, 1> {
        let mut mask = Image::from_size_val(size, 0).unwrap();
        for y in 8..16 {
            for x in 8..16 {
                mask.as_slice_mut()[y * size.width + x] = 255;
            }
        }
        mask
    }

    #[test]
    fn flat_strategy_replaces_inside_the_mask_only() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 24,
            height: 24,
        };
        let src = Image::<f32, 3>::from_size_val(size, 200.0)?;
        let dst = Image::<f32, 3>::from_size_val(size, 20.0)?;

        let out = composite(BlendMode::Flat, &src, &dst, &block_mask(size))?;
        assert_eq!(out.get([12, 12, 0]), Some(&200.0));
        assert_eq!(out.get([0, 0, 0]), Some(&20.0));

        Ok(())
    }

    #[test]
    fn feathered_strategy_grades_between_the_images() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 24,
            height: 24,
        };
        let src = Image::<f32, 3>::from_size_val(size, 200.0)?;
        let dst = Image::<f32, 3>::from_size_val(size, 20.0)?;

        let out = composite(BlendMode::Feathered, &src, &dst, &block_mask(size))?;
        let center = out.get([12, 12, 0]).copied().unwrap();
        let corner = out.get([0, 0, 0]).copied().unwrap();
        assert!(corner < 30.0, "corner {corner}");
        assert!(center > 60.0 && center < 200.0, "center {center}");

        Ok(())
    }

    #[test]
    fn seamless_strategy_pins_the_destination_level() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 24,
            height: 24,
        };
        // same gradients, offset level: the solve recovers the destination
        let mut dst_data = Vec::new();
        for y in 0..24 {
            for x in 0..24 {
                for _ in 0..3 {
                    dst_data.push((x + y) as f32 * 2.0);
                }
            }
        }
        let dst = Image::<f32, 3>::new(size, dst_data.clone())?;
        let src = Image::<f32, 3>::new(size, dst_data.iter().map(|v| v + 60.0).collect())?;

        let out = composite(BlendMode::Seamless, &src, &dst, &block_mask(size))?;
        for (o, d) in out.as_slice().iter().zip(dst.as_slice().iter()) {
            assert!((o - d).abs() < 0.5, "got {o}, expected {d}");
        }

        Ok(())
    }
}
