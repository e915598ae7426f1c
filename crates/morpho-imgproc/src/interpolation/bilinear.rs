use morpho_image::Image;

/// Kernel for bilinear interpolation
///
/// Coordinates outside the image are clamped to the nearest edge pixel
/// before sampling, so the four taps are always in bounds.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let u = u.clamp(0.0, (cols - 1) as f32);
    let v = v.clamp(0.0, (rows - 1) as f32);

    let iu0 = u.trunc() as usize;
    let iv0 = v.trunc() as usize;
    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let data = image.as_slice();
    let q11 = data[(iv0 * cols + iu0) * C + c];
    let q21 = data[(iv0 * cols + iu1) * C + c];
    let q12 = data[(iv1 * cols + iu0) * C + c];
    let q22 = data[(iv1 * cols + iu1) * C + c];

    let btm = frac_u * q21 + (1.0 - frac_u) * q11;
    let top = frac_u * q22 + (1.0 - frac_u) * q12;

    frac_v * top + (1.0 - frac_v) * btm
}
