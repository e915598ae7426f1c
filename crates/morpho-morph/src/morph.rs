use std::path::Path;

use morpho_face::landmarks::weighted_average_points;
use morpho_face::{BoundaryConfig, Landmarks, LandmarkDetector};
use morpho_image::ops::{stack_alpha, u8_from_f32};
use morpho_image::{Image, ImageError, ImageSize};
use morpho_imgproc::blend::{mask_from_points, weighted_average};

use crate::error::MorphError;
use crate::loader::{list_image_paths, load_image_points, load_valid_image_points};
use crate::video::{Frame, FrameSink};
use crate::warp::warp_face;

/// Options for a morph sequence.
#[derive(Clone, Copy, Debug)]
pub struct MorphOptions {
    /// The canonical canvas size every frame is produced at.
    pub size: ImageSize,
    /// Total number of frames, including the stalled endpoint frames.
    pub num_frames: usize,
    /// Frame rate of the downstream sink; only controls the stall length.
    pub fps: u32,
    /// Stack the face mask as an alpha channel on the interpolated frames.
    pub alpha: bool,
    /// Boundary point derivation used for warping.
    pub boundary: BoundaryConfig,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            size: ImageSize {
                width: 500,
                height: 600,
            },
            num_frames: 20,
            fps: 10,
            alpha: false,
            boundary: BoundaryConfig::default(),
        }
    }
}

/// Number of frames the sequence endpoints are held for, so the eye gets
/// a pause at the sequence boundary.
fn stall_frames(fps: u32) -> usize {
    let fps = fps.max(1) as usize;
    ((fps as f32 * 0.15) as usize).clamp(1, fps)
}

/// Produce a morph sequence between two aligned face images.
///
/// The source frame is held, `num_frames - 2 * stall` interpolated frames
/// are produced with the blend percent linearly spaced from 1 to 0, and
/// the destination frame is held. Exactly `num_frames` frames reach the
/// sink.
///
/// # Arguments
///
/// * `src_img` / `src_points` - The aligned source image and landmarks.
/// * `dest_img` / `dest_points` - The aligned destination image and landmarks.
/// * `opts` - Sequencing options.
/// * `sink` - Receiver of the ordered frames.
///
/// # Returns
///
/// The number of frames written.
pub fn morph(
    src_img: &Image<f32, 3>,
    src_points: &Landmarks,
    dest_img: &Image<f32, 3>,
    dest_points: &Landmarks,
    opts: &MorphOptions,
    sink: &mut dyn FrameSink,
) -> Result<usize, MorphError> {
    if src_img.size() != opts.size || dest_img.size() != opts.size {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            src_img.width(),
            src_img.height(),
            opts.size.width,
            opts.size.height,
        )));
    }

    let stall = stall_frames(opts.fps);
    let interior = opts.num_frames.saturating_sub(2 * stall);

    sink.write_repeated(&Frame::Rgb(u8_from_f32(src_img)?), stall)?;

    for i in 0..interior {
        let percent = if interior > 1 {
            1.0 - i as f32 / (interior - 1) as f32
        } else {
            1.0
        };

        let points = weighted_average_points(src_points, dest_points, percent)?;
        let src_face = warp_face(src_img, src_points, &points, opts.size, &opts.boundary)?;
        let end_face = warp_face(dest_img, dest_points, &points, opts.size, &opts.boundary)?;

        let mut average_face = Image::from_size_val(opts.size, 0.0)?;
        weighted_average(&src_face, &end_face, percent, &mut average_face)?;

        let frame_rgb = u8_from_f32(&average_face)?;
        let frame = if opts.alpha {
            let mask = mask_from_points(opts.size, points.as_slice())?;
            Frame::Rgba(stack_alpha(&frame_rgb, &mask)?)
        } else {
            Frame::Rgb(frame_rgb)
        };
        sink.write_frame(&frame)?;
    }

    sink.write_repeated(&Frame::Rgb(u8_from_f32(dest_img)?), stall)?;
    sink.finish()?;

    Ok(stall * 2 + interior)
}

/// Morph between two image files, detecting and aligning both faces.
///
/// Both endpoints are mandatory: a detector miss on either file aborts
/// the run.
pub fn morph_from_paths(
    detector: &dyn LandmarkDetector,
    src_path: &Path,
    dest_path: &Path,
    opts: &MorphOptions,
    sink: &mut dyn FrameSink,
) -> Result<usize, MorphError> {
    let (src_img, src_points) = load_image_points(detector, src_path, opts.size, &opts.boundary)?
        .ok_or_else(|| MorphError::NoFaceDetected(src_path.to_path_buf()))?;
    let (dest_img, dest_points) = load_image_points(detector, dest_path, opts.size, &opts.boundary)?
        .ok_or_else(|| MorphError::NoFaceDetected(dest_path.to_path_buf()))?;

    morph(&src_img, &src_points, &dest_img, &dest_points, opts, sink)
}

/// Morph through every consecutive pair of usable images in a folder.
///
/// Images without a detectable face are skipped; at least two usable
/// images must remain.
///
/// # Returns
///
/// The total number of frames written across all pairs.
pub fn morph_folder(
    detector: &dyn LandmarkDetector,
    folder: &Path,
    opts: &MorphOptions,
    sink: &mut dyn FrameSink,
) -> Result<usize, MorphError> {
    let paths = list_image_paths(folder)?;
    let (pairs, skipped) = load_valid_image_points(detector, &paths, opts.size, &opts.boundary)?;

    if pairs.len() < 2 {
        return Err(MorphError::NoValidImages);
    }
    if skipped > 0 {
        log::info!("morphing {} images, skipped {skipped}", pairs.len());
    }

    let mut total = 0;
    for window in pairs.windows(2) {
        let (src_img, src_points) = &window[0];
        let (dest_img, dest_points) = &window[1];
        total += morph(src_img, src_points, dest_img, dest_points, opts, sink)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::MemorySink;

    fn flat_image(size: ImageSize, val: f32) -> Image<f32, 3> {
        Image::from_size_val(size, val).unwrap()
    }

    fn quad_landmarks(offset: f32) -> Landmarks {
        Landmarks::new(vec![
            [16.0 + offset, 16.0],
            [48.0 + offset, 16.0],
            [48.0 + offset, 48.0],
            [16.0 + offset, 48.0],
            [32.0 + offset, 32.0],
        ])
    }

    fn test_options() -> MorphOptions {
        MorphOptions {
            size: ImageSize {
                width: 64,
                height: 64,
            },
            num_frames: 20,
            fps: 10,
            alpha: false,
            boundary: BoundaryConfig::default(),
        }
    }

    #[test]
    fn stall_length_tracks_fps() {
        assert_eq!(stall_frames(10), 1);
        assert_eq!(stall_frames(30), 4);
        // tiny frame rates still stall at least one frame
        assert_eq!(stall_frames(1), 1);
        assert_eq!(stall_frames(0), 1);
    }

    #[test]
    fn produces_exactly_the_requested_frames() -> Result<(), MorphError> {
        let opts = test_options();
        let src = flat_image(opts.size, 200.0);
        let dest = flat_image(opts.size, 40.0);

        let mut sink = MemorySink::new();
        let written = morph(
            &src,
            &quad_landmarks(0.0),
            &dest,
            &quad_landmarks(4.0),
            &opts,
            &mut sink,
        )?;

        assert_eq!(written, 20);
        assert_eq!(sink.frames.len(), 20);

        Ok(())
    }

    #[test]
    fn endpoint_frames_are_the_input_images() -> Result<(), MorphError> {
        let opts = test_options();
        let src = flat_image(opts.size, 200.0);
        let dest = flat_image(opts.size, 40.0);

        let mut sink = MemorySink::new();
        morph(
            &src,
            &quad_landmarks(0.0),
            &dest,
            &quad_landmarks(4.0),
            &opts,
            &mut sink,
        )?;

        match (&sink.frames[0], sink.frames.last().unwrap()) {
            (Frame::Rgb(first), Frame::Rgb(last)) => {
                assert!(first.as_slice().iter().all(|&v| v == 200));
                assert!(last.as_slice().iter().all(|&v| v == 40));
            }
            _ => panic!("expected rgb endpoint frames"),
        }

        Ok(())
    }

    #[test]
    fn alpha_mode_stacks_a_mask_on_interpolated_frames() -> Result<(), MorphError> {
        let mut opts = test_options();
        opts.alpha = true;
        opts.num_frames = 6;

        let src = flat_image(opts.size, 200.0);
        let dest = flat_image(opts.size, 40.0);

        let mut sink = MemorySink::new();
        morph(
            &src,
            &quad_landmarks(0.0),
            &dest,
            &quad_landmarks(4.0),
            &opts,
            &mut sink,
        )?;

        assert!(matches!(sink.frames[0], Frame::Rgb(_)));
        assert!(matches!(sink.frames[1], Frame::Rgba(_)));
        assert!(matches!(sink.frames.last(), Some(Frame::Rgb(_))));

        Ok(())
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let opts = test_options();
        let src = flat_image(
            ImageSize {
                width: 32,
                height: 32,
            },
            0.0,
        );
        let dest = flat_image(opts.size, 0.0);

        let mut sink = MemorySink::new();
        let res = morph(
            &src,
            &quad_landmarks(0.0),
            &dest,
            &quad_landmarks(0.0),
            &opts,
            &mut sink,
        );
        assert!(res.is_err());
    }
}
