use std::path::PathBuf;

/// An error type for the sequence drivers.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// The detector found no face in a mandatory input image.
    #[error("No face found in {0}")]
    NoFaceDetected(PathBuf),

    /// After filtering, no usable image/landmark pairs remained.
    #[error("No valid images with detectable faces were supplied")]
    NoValidImages,

    /// A face-domain operation failed.
    #[error(transparent)]
    Face(#[from] morpho_face::FaceError),

    /// An image buffer operation failed.
    #[error(transparent)]
    Image(#[from] morpho_image::ImageError),

    /// A warp operation failed.
    #[error(transparent)]
    Warp(#[from] morpho_imgproc::warp::WarpError),

    /// An image read or write failed.
    #[error(transparent)]
    Io(#[from] morpho_io::IoError),
}
