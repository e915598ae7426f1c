use std::path::{Path, PathBuf};

use morpho_face::align::resize_align;
use morpho_face::{BoundaryConfig, Landmarks, LandmarkDetector};
use morpho_image::{Image, ImageSize};
use morpho_io::functional::{has_image_extension, read_image_any_rgb8};

use crate::error::MorphError;

/// List the image files of a folder in a stable order.
pub fn list_image_paths(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>, MorphError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(folder.as_ref())
        .map_err(morpho_io::IoError::FileError)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| has_image_extension(p))
        .collect();
    paths.sort();

    Ok(paths)
}

/// Load an image, detect its landmarks and align both to the target size.
///
/// The detected landmarks are augmented with the standard boundary points
/// before alignment so every later stage works with the same point count.
/// Returns `None` when the detector reports no face; the caller decides
/// whether that skips the image or aborts the run.
pub fn load_image_points(
    detector: &dyn LandmarkDetector,
    path: &Path,
    size: ImageSize,
    boundary: &BoundaryConfig,
) -> Result<Option<(Image<f32, 3>, Landmarks)>, MorphError> {
    let points = match detector.detect(path)? {
        Some(points) => points.with_boundary_points(boundary),
        None => return Ok(None),
    };

    let img = read_image_any_rgb8(path)?;
    let img = img.cast::<f32>()?;

    let (aligned, aligned_points) = resize_align(&img, &points, size)?;

    Ok(Some((aligned, aligned_points)))
}

/// Load every usable (image, landmarks) pair from `paths`, skipping images
/// without a detectable face.
///
/// Returns the pairs together with the number of skipped images.
pub fn load_valid_image_points(
    detector: &dyn LandmarkDetector,
    paths: &[PathBuf],
    size: ImageSize,
    boundary: &BoundaryConfig,
) -> Result<(Vec<(Image<f32, 3>, Landmarks)>, usize), MorphError> {
    let mut pairs = Vec::new();
    let mut skipped = 0usize;

    for path in paths {
        match load_image_points(detector, path, size, boundary)? {
            Some(pair) => pairs.push(pair),
            None => {
                log::warn!("skipping {}: no face detected", path.display());
                skipped += 1;
            }
        }
    }

    Ok((pairs, skipped))
}
