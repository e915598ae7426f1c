use std::path::PathBuf;

use morpho_face::landmarks::average_points;
use morpho_face::{BoundaryConfig, Landmarks, LandmarkDetector};
use morpho_image::ops::{stack_alpha, u8_from_f32};
use morpho_image::{Image, ImageSize};
use morpho_imgproc::blend::{composite, mask_from_points, BlendMode};
use morpho_imgproc::enhance::sharpen;
use morpho_imgproc::filter::box_blur;

use crate::error::MorphError;
use crate::loader::load_valid_image_points;
use crate::video::Frame;
use crate::warp::warp_face;

/// Box blur kernel applied to the mask when edge blurring is requested.
const EDGE_BLUR_RADIUS: usize = 10;

/// Options for face averaging.
#[derive(Clone, Copy, Debug)]
pub struct AverageOptions {
    /// The canonical canvas size the average is produced at.
    pub size: ImageSize,
    /// Stack the face mask as an alpha channel on the output.
    pub alpha: bool,
    /// Blur the mask edges before using it as alpha.
    pub blur_edges: bool,
    /// Sharpen the average and composite it onto the first image with the
    /// given strategy.
    pub composite: Option<BlendMode>,
    /// Boundary point derivation used for warping.
    pub boundary: BoundaryConfig,
}

impl Default for AverageOptions {
    fn default() -> Self {
        Self {
            size: ImageSize {
                width: 500,
                height: 600,
            },
            alpha: false,
            blur_edges: false,
            composite: None,
            boundary: BoundaryConfig::default(),
        }
    }
}

/// Outcome tally of a batch operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// Images that contributed to the output.
    pub processed: usize,
    /// Images dropped because no face was detected.
    pub skipped: usize,
}

/// Average a set of aligned face images into one composite.
///
/// Every image is warped into the target geometry (the elementwise mean of
/// all landmark sets, unless supplied externally) and accumulated in
/// floating point; the sum is divided by the image count. Optionally the
/// result is sharpened and composited onto the first image with the chosen
/// strategy, and the face mask can be blurred and stacked as an alpha
/// channel.
///
/// # Arguments
///
/// * `pairs` - The aligned (image, landmarks) pairs; must not be empty.
/// * `dest_points` - Optional externally supplied target geometry.
/// * `opts` - Averaging options.
pub fn average_faces(
    pairs: &[(Image<f32, 3>, Landmarks)],
    dest_points: Option<&Landmarks>,
    opts: &AverageOptions,
) -> Result<Frame, MorphError> {
    if pairs.is_empty() {
        return Err(MorphError::NoValidImages);
    }

    let ave_points = match dest_points {
        Some(points) => points.clone(),
        None => {
            let sets: Vec<Landmarks> = pairs.iter().map(|(_, lm)| lm.clone()).collect();
            average_points(&sets)?
        }
    };

    let mut result = Image::<f32, 3>::from_size_val(opts.size, 0.0)?;
    for (i, (img, points)) in pairs.iter().enumerate() {
        log::debug!("warping face {} of {}", i + 1, pairs.len());
        let warped = warp_face(img, points, &ave_points, opts.size, &opts.boundary)?;
        for (acc, w) in result.as_slice_mut().iter_mut().zip(warped.as_slice()) {
            *acc += w;
        }
    }

    let n = pairs.len() as f32;
    for v in result.as_slice_mut() {
        *v /= n;
    }

    let mut mask = mask_from_points(opts.size, ave_points.as_slice())?;

    if let Some(mode) = opts.composite {
        let mut sharpened = Image::from_size_val(opts.size, 0.0)?;
        sharpen(&result, &mut sharpened)?;
        result = composite(mode, &sharpened, &pairs[0].0, &mask)?;
    }

    if opts.blur_edges {
        let mask_f32 = mask.cast::<f32>()?;
        let mut blurred = Image::from_size_val(opts.size, 0.0)?;
        box_blur(&mask_f32, &mut blurred, (EDGE_BLUR_RADIUS, EDGE_BLUR_RADIUS))?;
        mask = u8_from_f32(&blurred)?;
    }

    let result_u8 = u8_from_f32(&result)?;
    let frame = if opts.alpha {
        Frame::Rgba(stack_alpha(&result_u8, &mask)?)
    } else {
        Frame::Rgb(result_u8)
    };

    Ok(frame)
}

/// Average the faces found in a list of image files.
///
/// Images without a detectable face are skipped and tallied; the run only
/// fails when nothing usable remains.
pub fn average_from_paths(
    detector: &dyn LandmarkDetector,
    paths: &[PathBuf],
    opts: &AverageOptions,
) -> Result<(Frame, BatchReport), MorphError> {
    let (pairs, skipped) = load_valid_image_points(detector, paths, opts.size, &opts.boundary)?;

    if pairs.is_empty() {
        return Err(MorphError::NoValidImages);
    }

    let frame = average_faces(&pairs, None, opts)?;
    let report = BatchReport {
        processed: pairs.len(),
        skipped,
    };
    log::info!(
        "processed {} faces, skipped {}",
        report.processed,
        report.skipped
    );

    Ok((frame, report))
}
