use morpho_image::{Image, ImageError, ImageSize};

use crate::draw::{convex_hull, fill_convex_polygon};
use crate::morphology::erode;

/// Side length of the erosion kernel applied to the rasterized hull.
const MASK_ERODE_KERNEL: usize = 15;

/// Build a face-region mask from a landmark set.
///
/// The convex hull of the points is rasterized as a filled polygon (255
/// inside, 0 outside) and then eroded to pull the boundary inward from the
/// hull edge, so later sampling never touches undefined peripheral pixels.
///
/// # Arguments
///
/// * `size` - The spatial size of the working canvas.
/// * `points` - The landmark set delimiting the face region.
///
/// # Returns
///
/// A binary single channel mask of the given size.
pub fn mask_from_points(size: ImageSize, points: &[[f32; 2]]) -> Result<Image<u8, 1>, ImageError> {
    let mut filled = Image::from_size_val(size, 0)?;
    let hull = convex_hull(points);
    fill_convex_polygon(&mut filled, &hull, 255);

    let mut mask = Image::from_size_val(size, 0)?;
    erode(&filled, &mut mask, MASK_ERODE_KERNEL)?;

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_is_binary_and_inside_bounding_box() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 60,
            height: 60,
        };
        let points = [
            [10.0, 10.0],
            [50.0, 12.0],
            [48.0, 50.0],
            [12.0, 48.0],
            [30.0, 30.0],
        ];
        let mask = mask_from_points(size, &points)?;

        for y in 0..60 {
            for x in 0..60 {
                let v = *mask.get([y, x, 0]).unwrap();
                assert!(v == 0 || v == 255);
                if v == 255 {
                    assert!((10..=50).contains(&x) && (10..=50).contains(&y));
                }
            }
        }

        Ok(())
    }

    #[test]
    fn erosion_leaves_strictly_less_area_than_hull() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 60,
            height: 60,
        };
        let points = [[5.0, 5.0], [55.0, 5.0], [55.0, 55.0], [5.0, 55.0]];

        let mut filled = Image::from_size_val(size, 0)?;
        fill_convex_polygon(&mut filled, &convex_hull(&points), 255);
        let mask = mask_from_points(size, &points)?;

        let hull_area = filled.as_slice().iter().filter(|&&v| v == 255).count();
        let mask_area = mask.as_slice().iter().filter(|&&v| v == 255).count();
        assert!(mask_area > 0);
        assert!(mask_area < hull_area);

        Ok(())
    }

    #[test]
    fn small_point_set_produces_empty_mask() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 30,
            height: 30,
        };
        // a tiny face region is eroded away entirely
        let points = [[14.0, 14.0], [16.0, 14.0], [15.0, 16.0]];
        let mask = mask_from_points(size, &points)?;
        assert!(mask.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }
}
