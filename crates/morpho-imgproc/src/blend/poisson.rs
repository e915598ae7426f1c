use morpho_image::{Image, ImageError};
use rayon::prelude::*;

/// Successive over-relaxation factor for the Gauss-Seidel sweeps.
const SOR_OMEGA: f32 = 1.85;
/// Stop once no pixel moved by more than this intensity per sweep.
const TOLERANCE: f32 = 0.05;
/// Hard cap on the number of sweeps.
const MAX_ITERATIONS: usize = 500;

/// Gradient-domain (Poisson) blend of a source into a destination.
///
/// Solves the discrete membrane equation per masked pixel: coefficient 4 on
/// the pixel, -1 on each in-bounds axis neighbor, with the right-hand side
/// equal to the source Laplacian. Pixels outside the mask are pinned to the
/// destination intensity, so the blend carries the source gradients while
/// matching the destination at the mask boundary. Each color channel is
/// solved independently and the result is clamped to the 0..255 range.
///
/// # Arguments
///
/// * `src` - The image whose gradients fill the mask interior.
/// * `dst` - The image providing the boundary and exterior.
/// * `mask` - The face-region mask, same spatial size as the images.
///
/// # Returns
///
/// The blended image.
pub fn poisson_blend(
    src: &Image<f32, 3>,
    dst: &Image<f32, 3>,
    mask: &Image<u8, 1>,
) -> Result<Image<f32, 3>, ImageError> {
    if src.size() != dst.size() {
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

    let (cols, rows) = (src.cols(), src.rows());

    let masked: Vec<usize> = mask
        .as_slice()
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| (m != 0).then_some(i))
        .collect();

    if masked.is_empty() {
        return Ok(dst.clone());
    }

    let src_planes = src.split_channels()?;
    let dst_planes = dst.split_channels()?;

    let solved: Vec<Vec<f32>> = src_planes
        .par_iter()
        .zip(dst_planes.par_iter())
        .map(|(s, d)| solve_channel(s.as_slice(), d.as_slice(), &masked, cols, rows))
        .collect();

    let mut data = Vec::with_capacity(rows * cols * 3);
    for i in 0..rows * cols {
        for plane in &solved {
            data.push(plane[i].clamp(0.0, 255.0));
        }
    }

    Image::new(src.size(), data)
}

/// In-bounds 4-neighborhood of a flat index.
fn neighbors(index: usize, cols: usize, rows: usize) -> [Option<usize>; 4] {
    let x = index % cols;
    let y = index / cols;

    [
        (x > 0).then(|| index - 1),
        (x + 1 < cols).then(|| index + 1),
        (y > 0).then(|| index - cols),
        (y + 1 < rows).then(|| index + cols),
    ]
}

fn solve_channel(
    src: &[f32],
    dst: &[f32],
    masked: &[usize],
    cols: usize,
    rows: usize,
) -> Vec<f32> {
    // right-hand side: source Laplacian over the masked region
    let rhs: Vec<f32> = masked
        .iter()
        .map(|&i| {
            let mut b = 4.0 * src[i];
            for n in neighbors(i, cols, rows).into_iter().flatten() {
                b -= src[n];
            }
            b
        })
        .collect();

    let mut x = dst.to_vec();

    let mut iterations = 0;
    for iter in 0..MAX_ITERATIONS {
        iterations = iter + 1;
        let mut max_delta = 0.0f32;

        for (&i, &b) in masked.iter().zip(rhs.iter()) {
            let mut acc = b;
            for n in neighbors(i, cols, rows).into_iter().flatten() {
                acc += x[n];
            }
            let delta = SOR_OMEGA * (acc / 4.0 - x[i]);
            x[i] += delta;
            max_delta = max_delta.max(delta.abs());
        }

        if max_delta < TOLERANCE {
            break;
        }
    }

    log::debug!("poisson channel solve converged after {iterations} sweep(s)");

    x
}
