use std::path::PathBuf;

use morpho_image::{Image, ImageSize};
use morpho_io::png::{write_image_png_rgb8, write_image_png_rgba8};

use crate::error::MorphError;

/// A single frame of a produced sequence.
///
/// Frames are RGB; alpha output stacks the derived face mask as a fourth
/// channel.
#[derive(Clone, Debug)]
pub enum Frame {
    /// A three channel frame.
    Rgb(Image<u8, 3>),
    /// A frame carrying the face mask as its alpha channel.
    Rgba(Image<u8, 4>),
}

impl Frame {
    /// The spatial size of the frame.
    pub fn size(&self) -> ImageSize {
        match self {
            Frame::Rgb(img) => img.size(),
            Frame::Rgba(img) => img.size(),
        }
    }
}

/// An append-only consumer of ordered frames.
///
/// The video container itself is an external collaborator; sinks only see
/// equally-sized frames in order, plus a `finish` call at sequence end.
pub trait FrameSink {
    /// Append one frame to the sequence.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), MorphError>;

    /// Append the same frame several times (used to stall on a frame).
    fn write_repeated(&mut self, frame: &Frame, count: usize) -> Result<(), MorphError> {
        for _ in 0..count {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    /// Flush and close the sequence.
    fn finish(&mut self) -> Result<(), MorphError> {
        Ok(())
    }
}

/// A sink writing every frame as a numbered PNG into a folder.
pub struct DirectorySink {
    folder: PathBuf,
    index: usize,
}

impl DirectorySink {
    /// Create a sink writing into `folder`, creating it if needed.
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, MorphError> {
        let folder = folder.into();
        std::fs::create_dir_all(&folder).map_err(morpho_io::IoError::FileError)?;
        Ok(Self { folder, index: 0 })
    }

    /// The number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.index
    }
}

impl FrameSink for DirectorySink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), MorphError> {
        let path = self.folder.join(format!("frame_{:04}.png", self.index));
        match frame {
            Frame::Rgb(img) => write_image_png_rgb8(&path, img)?,
            Frame::Rgba(img) => write_image_png_rgba8(&path, img)?,
        }
        self.index += 1;
        Ok(())
    }
}

/// A sink collecting frames in memory, mostly for inspection and tests.
#[derive(Default)]
pub struct MemorySink {
    /// The collected frames, in append order.
    pub frames: Vec<Frame>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), MorphError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
