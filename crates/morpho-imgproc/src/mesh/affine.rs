use super::MeshError;

/// A 2x3 row-major affine transform mapping destination coordinates to
/// source coordinates: `(u, v) = (m0*x + m1*y + m2, m3*x + m4*y + m5)`.
pub type TriangleAffine = [f32; 6];

/// Determinant threshold below which a triangle is treated as degenerate.
const DET_EPS: f64 = 1e-8;

/// Applies an affine transformation to a point.
pub fn transform_point(x: f32, y: f32, m: &TriangleAffine) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Compute the destination-to-source affine transform of every triangle.
///
/// For a triangle with destination vertices `D` and source vertices `S`
/// (stacked homogeneous), the transform is `S * D^-1`. A triangle whose
/// destination vertices are collinear has a singular `D` and yields `None`
/// instead of a transform; callers skip such triangles.
///
/// # Arguments
///
/// * `triangles` - Index triplets from the destination triangulation.
/// * `src_points` - Source landmark positions.
/// * `dst_points` - Destination landmark positions, same length as `src_points`.
///
/// # Returns
///
/// One optional transform per input triangle.
pub fn triangle_affines(
    triangles: &[[usize; 3]],
    src_points: &[[f32; 2]],
    dst_points: &[[f32; 2]],
) -> Result<Vec<Option<TriangleAffine>>, MeshError> {
    if src_points.len() != dst_points.len() {
        return Err(MeshError::PointCountMismatch(
            src_points.len(),
            dst_points.len(),
        ));
    }

    let affines = triangles
        .iter()
        .map(|t| solve_affine(t, src_points, dst_points))
        .collect();

    Ok(affines)
}

fn solve_affine(
    tri: &[usize; 3],
    src_points: &[[f32; 2]],
    dst_points: &[[f32; 2]],
) -> Option<TriangleAffine> {
    let [i, j, k] = *tri;

    // destination matrix D = [[x0 x1 x2], [y0 y1 y2], [1 1 1]]
    let (a, b, c) = (
        f64::from(dst_points[i][0]),
        f64::from(dst_points[j][0]),
        f64::from(dst_points[k][0]),
    );
    let (d, e, f) = (
        f64::from(dst_points[i][1]),
        f64::from(dst_points[j][1]),
        f64::from(dst_points[k][1]),
    );

    let det = a * (e - f) - b * (d - f) + c * (d - e);
    if det.abs() < DET_EPS {
        return None;
    }

    // rows of D^-1, adjugate over determinant
    let inv = [
        [(e - f) / det, (c - b) / det, (b * f - c * e) / det],
        [(f - d) / det, (a - c) / det, (c * d - a * f) / det],
        [(d - e) / det, (b - a) / det, (a * e - b * d) / det],
    ];

    let sx = [
        f64::from(src_points[i][0]),
        f64::from(src_points[j][0]),
        f64::from(src_points[k][0]),
    ];
    let sy = [
        f64::from(src_points[i][1]),
        f64::from(src_points[j][1]),
        f64::from(src_points[k][1]),
    ];

    let mut m = [0.0f32; 6];
    for col in 0..3 {
        m[col] = (sx[0] * inv[0][col] + sx[1] * inv[1][col] + sx[2] * inv[2][col]) as f32;
        m[col + 3] = (sy[0] * inv[0][col] + sy[1] * inv[1][col] + sy[2] * inv[2][col]) as f32;
    }

    Some(m)
}
