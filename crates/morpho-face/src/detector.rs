use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FaceError;
use crate::landmarks::Landmarks;

/// Sentinel emitted by the external locator when no face is present.
const NO_FACE_SENTINEL: &str = "No face found";

/// A pluggable facial landmark detector.
///
/// Implementations return `None` when no face is present in the image;
/// that is an expected outcome, not an error. Errors are reserved for a
/// detector that could not run at all or produced unparseable output.
pub trait LandmarkDetector {
    /// Locate the facial landmarks of the dominant face in an image file.
    fn detect(&self, image_path: &Path) -> Result<Option<Landmarks>, FaceError>;
}

/// A detector that shells out to an external landmark locator binary.
///
/// The binary path and its classifier data folder are explicit state of
/// this value; nothing is cached process-wide. The binary is expected to
/// print one `x y` pair per line, or a line starting with "No face found".
pub struct ExternalDetector {
    binary: PathBuf,
    data_dir: PathBuf,
}

impl ExternalDetector {
    /// Create a detector context from a locator binary and its data folder.
    pub fn new(binary: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            data_dir: data_dir.into(),
        }
    }
}

impl LandmarkDetector for ExternalDetector {
    fn detect(&self, image_path: &Path) -> Result<Option<Landmarks>, FaceError> {
        let output = Command::new(&self.binary)
            .arg("-f")
            .arg(&self.data_dir)
            .arg(image_path)
            .output()?;

        if !output.status.success() {
            return Err(FaceError::DetectorFailure(format!(
                "{} exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let landmarks = parse_locator_output(&stdout)?;
        if landmarks.is_none() {
            log::warn!("no face found in {}", image_path.display());
        }

        Ok(landmarks)
    }
}

/// Parse the locator's stdout into landmarks, or `None` on the no-face
/// sentinel.
fn parse_locator_output(output: &str) -> Result<Option<Landmarks>, FaceError> {
    if output.trim_start().starts_with(NO_FACE_SENTINEL) {
        return Ok(None);
    }

    let mut points = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (x, y) = match (parts.next(), parts.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(FaceError::DetectorFailure(format!(
                    "malformed locator line: {line:?}"
                )))
            }
        };

        let x: f32 = x
            .parse()
            .map_err(|_| FaceError::DetectorFailure(format!("bad x coordinate: {x:?}")))?;
        let y: f32 = y
            .parse()
            .map_err(|_| FaceError::DetectorFailure(format!("bad y coordinate: {y:?}")))?;
        points.push([x, y]);
    }

    if points.is_empty() {
        return Ok(None);
    }

    Ok(Some(Landmarks::new(points)))
}
