/// An error type for face-domain operations.
#[derive(thiserror::Error, Debug)]
pub enum FaceError {
    /// The landmark set is empty or spans no area.
    #[error("The landmark set is empty or degenerate")]
    EmptyLandmarks,

    /// Two corresponding landmark sets differ in length.
    #[error("Landmark sets must have the same length, expected {expected}, got {got}")]
    PointCountMismatch {
        /// The length every set is expected to share.
        expected: usize,
        /// The offending length.
        got: usize,
    },

    /// The external detector could not be executed or produced garbage.
    #[error("Landmark detector failed: {0}")]
    DetectorFailure(String),

    /// An image buffer operation failed.
    #[error(transparent)]
    Image(#[from] morpho_image::ImageError),

    /// A filesystem or subprocess error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
