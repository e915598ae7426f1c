#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// face averaging driver.
pub mod average;

/// Error types for the sequence drivers.
pub mod error;

/// image and landmark loading helpers.
pub mod loader;

/// morph sequence driver.
pub mod morph;

/// frame sinks consuming the produced sequences.
pub mod video;

/// landmark-driven warping entry point.
pub mod warp;

pub use crate::average::{average_faces, average_from_paths, AverageOptions, BatchReport};
pub use crate::error::MorphError;
pub use crate::morph::{morph, morph_folder, morph_from_paths, MorphOptions};
pub use crate::video::{DirectorySink, Frame, FrameSink, MemorySink};
pub use crate::warp::warp_face;
