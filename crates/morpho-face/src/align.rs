use morpho_image::{Image, ImageError, ImageSize};
use morpho_imgproc::interpolation::InterpolationMode;
use morpho_imgproc::resize::resize_native;

use crate::error::FaceError;
use crate::landmarks::Landmarks;

/// Fraction of the target width the face bounding rect is scaled to.
const FACE_WIDTH_FRACTION: f32 = 0.6;

/// Cap a number to ensure it is positive.
///
/// Returns the capped value and the overflow that was cut away.
fn positive_cap(num: i64) -> (i64, i64) {
    if num < 0 {
        (0, -num)
    } else {
        (num, 0)
    }
}

/// Align the face bounding rectangle into the center of the new size.
///
/// Returns the top-left coordinates of the aligned region of interest and
/// the zero border consumed by any overflow: (roi_x, roi_y, border_x, border_y).
fn roi_coordinates(rect: (i64, i64, i64, i64), size: ImageSize, scale: f32) -> (i64, i64, i64, i64) {
    let (rect_x, rect_y, rect_w, rect_h) = rect;
    let mid_x = ((rect_x + rect_w / 2) as f32 * scale) as i64;
    let mid_y = ((rect_y + rect_h / 2) as f32 * scale) as i64;
    let roi_x = mid_x - (size.width / 2) as i64;
    let roi_y = mid_y - (size.height / 2) as i64;

    let (roi_x, border_x) = positive_cap(roi_x);
    let (roi_y, border_y) = positive_cap(roi_y);
    (roi_x, roi_y, border_x, border_y)
}

/// Resize an image and its landmarks and center the face on a new canvas.
///
/// The image is scaled uniformly so the landmark bounding rectangle spans
/// a fixed fraction of the target width, then cropped (or zero-padded when
/// the crop would leave the scaled image) so the rectangle center lands in
/// the middle of the target canvas. Landmarks are remapped by the same
/// scale and offset.
///
/// # Arguments
///
/// * `img` - The image to be aligned.
/// * `points` - The landmark set detected on `img`.
/// * `size` - The target canvas size.
///
/// # Returns
///
/// The aligned image of exactly `size` and the remapped landmarks.
pub fn resize_align(
    img: &Image<f32, 3>,
    points: &Landmarks,
    size: ImageSize,
) -> Result<(Image<f32, 3>, Landmarks), FaceError> {
    if points.is_empty() {
        return Err(FaceError::EmptyLandmarks);
    }

    let rect = points.bounding_rect();
    let (_, _, rect_w, _) = rect;
    if rect_w <= 0 {
        return Err(FaceError::EmptyLandmarks);
    }

    // uniform scale that brings the face rect to the canonical width
    let scale = FACE_WIDTH_FRACTION * size.width as f32 / rect_w as f32;
    let scaled_size = ImageSize {
        width: ((scale * img.width() as f32) as usize).max(1),
        height: ((scale * img.height() as f32) as usize).max(1),
    };

    let mut scaled = Image::from_size_val(scaled_size, 0.0)?;
    resize_native(img, &mut scaled, InterpolationMode::Bilinear)?;

    let (roi_x, roi_y, border_x, border_y) = roi_coordinates(rect, size, scale);

    let mut crop = Image::from_size_val(size, 0.0)?;
    copy_region(
        &scaled,
        &mut crop,
        (roi_x, roi_y),
        (border_x, border_y),
        size,
    )?;

    let offset = [
        (border_x - roi_x) as f32,
        (border_y - roi_y) as f32,
    ];
    let points = points.remap(scale, offset);

    Ok((crop, points))
}

/// Copy the overlapping region of the scaled source into the target canvas.
fn copy_region(
    scaled: &Image<f32, 3>,
    crop: &mut Image<f32, 3>,
    roi: (i64, i64),
    border: (i64, i64),
    size: ImageSize,
) -> Result<(), ImageError> {
    let (roi_x, roi_y) = roi;
    let (border_x, border_y) = border;

    let roi_h = (size.height as i64).min(scaled.height() as i64 - roi_y) - border_y;
    let roi_w = (size.width as i64).min(scaled.width() as i64 - roi_x) - border_x;
    if roi_h <= 0 || roi_w <= 0 {
        return Ok(());
    }

    let (roi_x, roi_y) = (roi_x as usize, roi_y as usize);
    let (border_x, border_y) = (border_x as usize, border_y as usize);
    let (roi_w, roi_h) = (roi_w as usize, roi_h as usize);

    let src_cols = scaled.cols();
    let dst_cols = crop.cols();
    let src_data = scaled.as_slice();
    let dst_data = crop.as_slice_mut();

    for row in 0..roi_h {
        let src_start = ((roi_y + row) * src_cols + roi_x) * 3;
        let dst_start = ((border_y + row) * dst_cols + border_x) * 3;
        dst_data[dst_start..dst_start + roi_w * 3]
            .copy_from_slice(&src_data[src_start..src_start + roi_w * 3]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: usize, height: usize) -> Image<f32, 3> {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                data.push((x % 256) as f32);
                data.push((y % 256) as f32);
                data.push(100.0);
            }
        }
        Image::new(ImageSize { width, height }, data).unwrap()
    }

    fn face_landmarks() -> Landmarks {
        Landmarks::new(vec![
            [100.0, 120.0],
            [200.0, 120.0],
            [150.0, 180.0],
            [120.0, 220.0],
            [180.0, 220.0],
        ])
    }

    #[test]
    fn output_matches_requested_size() -> Result<(), FaceError> {
        let img = test_image(320, 240);
        let size = ImageSize {
            width: 500,
            height: 600,
        };
        let (aligned, points) = resize_align(&img, &face_landmarks(), size)?;

        assert_eq!(aligned.size(), size);
        assert_eq!(points.len(), 5);

        Ok(())
    }

    #[test]
    fn face_rect_is_scaled_and_centered() -> Result<(), FaceError> {
        let img = test_image(320, 240);
        let size = ImageSize {
            width: 500,
            height: 600,
        };
        let (_, points) = resize_align(&img, &face_landmarks(), size)?;

        let (x, _, w, _) = points.bounding_rect();
        // the face rect width lands at the canonical fraction of the canvas
        let expected_w = (0.6 * 500.0) as i64;
        assert!((w - expected_w).abs() <= 2, "width {w} vs {expected_w}");

        // and its center sits in the middle of the canvas
        let center_x = x + w / 2;
        assert!((center_x - 250).abs() <= 2, "center_x {center_x}");

        Ok(())
    }

    #[test]
    fn near_border_face_pads_instead_of_cropping() -> Result<(), FaceError> {
        let img = test_image(100, 100);
        // face hugging the top-left corner forces a negative roi
        let points = Landmarks::new(vec![[2.0, 2.0], [30.0, 2.0], [16.0, 30.0]]);
        let size = ImageSize {
            width: 200,
            height: 200,
        };
        let (aligned, remapped) = resize_align(&img, &points, size)?;

        assert_eq!(aligned.size(), size);
        for p in remapped.as_slice() {
            assert!(p[0] >= 0.0 && p[1] >= 0.0, "landmark {p:?}");
        }

        Ok(())
    }

    #[test]
    fn empty_landmarks_are_rejected() {
        let img = test_image(10, 10);
        let res = resize_align(
            &img,
            &Landmarks::new(vec![]),
            ImageSize {
                width: 10,
                height: 10,
            },
        );
        assert!(matches!(res, Err(FaceError::EmptyLandmarks)));
    }
}
