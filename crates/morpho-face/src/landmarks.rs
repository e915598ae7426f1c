use crate::error::FaceError;

/// An ordered set of facial landmark coordinates.
///
/// Index `i` in one set corresponds semantically to index `i` in any other
/// set it is compared or interpolated against, so every cross-set operation
/// first verifies equal lengths. An empty set signals "no face found".
#[derive(Clone, Debug, PartialEq)]
pub struct Landmarks(Vec<[f32; 2]>);

impl Landmarks {
    /// Create a landmark set from raw points.
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self(points)
    }

    /// The number of points in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The points as a slice.
    pub fn as_slice(&self) -> &[[f32; 2]] {
        &self.0
    }

    /// Integer bounding rectangle of the set as (x, y, w, h).
    pub fn bounding_rect(&self) -> (i64, i64, i64, i64) {
        if self.0.is_empty() {
            return (0, 0, 0, 0);
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for p in &self.0 {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }

        let x = min_x.floor() as i64;
        let y = min_y.floor() as i64;
        let w = max_x.floor() as i64 - x + 1;
        let h = max_y.floor() as i64 - y + 1;
        (x, y, w, h)
    }

    /// Return a copy of the set with synthetic boundary points appended.
    ///
    /// The boundary points anchor the triangulation near the top of the
    /// face bounding rectangle so the mesh covers the forehead region the
    /// detectors leave open. The same derivation must be applied to every
    /// set participating in one warp.
    pub fn with_boundary_points(&self, config: &BoundaryConfig) -> Self {
        let mut points = self.0.clone();
        points.extend_from_slice(&boundary_points(self, config));
        Self(points)
    }

    /// Scale every point and then translate it.
    pub(crate) fn remap(&self, scale: f32, offset: [f32; 2]) -> Self {
        Self(
            self.0
                .iter()
                .map(|p| [p[0] * scale + offset[0], p[1] * scale + offset[1]])
                .collect(),
        )
    }
}

/// Inset parameters for the synthetic boundary points.
///
/// The defaults match the historical derivation; detector-specific insets
/// can be supplied without changing them.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryConfig {
    /// Horizontal inset as a fraction of the bounding rect width.
    pub inset_w: f32,
    /// Vertical inset as a fraction of the bounding rect height.
    pub inset_h: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            inset_w: 0.1,
            inset_h: 0.1,
        }
    }
}

/// Produce the two additional boundary points at the top corners of the
/// landmark bounding rectangle, inset by the configured fractions.
pub fn boundary_points(landmarks: &Landmarks, config: &BoundaryConfig) -> [[f32; 2]; 2] {
    let (x, y, w, h) = landmarks.bounding_rect();
    let spacer_w = (w as f32 * config.inset_w).floor();
    let spacer_h = (h as f32 * config.inset_h).floor();

    [
        [x as f32 + spacer_w, y as f32 + spacer_h],
        [(x + w) as f32 - spacer_w, y as f32 + spacer_h],
    ]
}

/// Elementwise mean of several equal-length landmark sets, rounded to
/// whole pixel coordinates.
///
/// # Errors
///
/// Fails on an empty input and on sets of differing lengths.
pub fn average_points(point_sets: &[Landmarks]) -> Result<Landmarks, FaceError> {
    let first = point_sets.first().ok_or(FaceError::EmptyLandmarks)?;
    let expected = first.len();
    if expected == 0 {
        return Err(FaceError::EmptyLandmarks);
    }

    for set in point_sets {
        if set.len() != expected {
            return Err(FaceError::PointCountMismatch {
                expected,
                got: set.len(),
            });
        }
    }

    let n = point_sets.len() as f32;
    let mut mean = vec![[0.0f32; 2]; expected];
    for set in point_sets {
        for (m, p) in mean.iter_mut().zip(set.as_slice()) {
            m[0] += p[0];
            m[1] += p[1];
        }
    }
    for m in &mut mean {
        m[0] = (m[0] / n).round();
        m[1] = (m[1] / n).round();
    }

    Ok(Landmarks::new(mean))
}

/// Weighted average of two landmark sets.
///
/// `percent` weighs the start set. The ends are exact: a percent at or
/// below 0 returns the end set unchanged and a percent at or above 1
/// returns the start set unchanged, so a frame schedule never drifts at
/// its endpoints.
pub fn weighted_average_points(
    start: &Landmarks,
    end: &Landmarks,
    percent: f32,
) -> Result<Landmarks, FaceError> {
    if start.len() != end.len() {
        return Err(FaceError::PointCountMismatch {
            expected: start.len(),
            got: end.len(),
        });
    }

    if percent <= 0.0 {
        return Ok(end.clone());
    }
    if percent >= 1.0 {
        return Ok(start.clone());
    }

    let points = start
        .as_slice()
        .iter()
        .zip(end.as_slice())
        .map(|(a, b)| {
            [
                a[0] * percent + b[0] * (1.0 - percent),
                a[1] * percent + b[1] * (1.0 - percent),
            ]
        })
        .collect();

    Ok(Landmarks::new(points))
}
