//! Triangle mesh generation over 2d point sets.
//!
//! A destination landmark set is triangulated once and the resulting
//! topology is shared by every per-triangle affine computation. The
//! triangulation is Delaunay (Bowyer-Watson insertion) over the point
//! indices, so a triangle is always a triplet of indices into the
//! originating point slice.

mod affine;
mod delaunay;

pub use affine::{triangle_affines, transform_point, TriangleAffine};
pub use delaunay::delaunay;

/// Errors produced by mesh construction.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The point set is too small to triangulate.
    #[error("At least 3 points are required for triangulation, got {0}")]
    NotEnoughPoints(usize),

    /// Two corresponding point sets differ in length.
    #[error("Point sets must have the same length, got {0} and {1}")]
    PointCountMismatch(usize, usize),
}

/// Axis-aligned bounding box of a point set as (min_x, min_y, max_x, max_y).
pub fn bounding_box(points: &[[f32; 2]]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for p in points {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }

    (min_x, min_y, max_x, max_y)
}
