use super::MeshError;

/// A triangle during incremental construction, with a cached circumcircle.
#[derive(Clone, Copy, Debug)]
struct Triangle {
    v: [usize; 3],
    // circumcenter and squared radius
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Triangle {
    fn new(v: [usize; 3], points: &[[f64; 2]]) -> Self {
        let [a, b, c] = v;
        let (ax, ay) = (points[a][0], points[a][1]);
        let (bx, by) = (points[b][0], points[b][1]);
        let (cx, cy) = (points[c][0], points[c][1]);

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        if d.abs() < f64::EPSILON {
            // collinear vertices: an unbounded circumcircle swallows every
            // candidate point, so the triangle is replaced on first insertion
            return Self {
                v,
                cx: 0.0,
                cy: 0.0,
                r2: f64::MAX,
            };
        }

        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;

        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        let r2 = (ax - ux) * (ax - ux) + (ay - uy) * (ay - uy);

        Self {
            v,
            cx: ux,
            cy: uy,
            r2,
        }
    }

    fn circumcircle_contains(&self, p: [f64; 2]) -> bool {
        if self.r2 == f64::MAX {
            return true;
        }
        let dx = p[0] - self.cx;
        let dy = p[1] - self.cy;
        dx * dx + dy * dy <= self.r2
    }
}

/// Compute a Delaunay triangulation of a 2d point set.
///
/// Points are inserted in their given order (Bowyer-Watson), which makes
/// the triangulation deterministic for a fixed input. Degenerate inputs
/// (collinear or duplicated points) do not fail; they yield fewer or
/// zero-area triangles, which downstream affine solves reject per triangle.
///
/// # Arguments
///
/// * `points` - The point set to triangulate, at least 3 points.
///
/// # Returns
///
/// Index triplets into `points`, one per triangle.
pub fn delaunay(points: &[[f32; 2]]) -> Result<Vec<[usize; 3]>, MeshError> {
    if points.len() < 3 {
        return Err(MeshError::NotEnoughPoints(points.len()));
    }

    let mut pts: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [f64::from(p[0]), f64::from(p[1])])
        .collect();

    // super-triangle generously containing every input point
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for p in &pts {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }
    let dmax = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let super_base = pts.len();
    pts.push([mid_x - 20.0 * dmax, mid_y - dmax]);
    pts.push([mid_x, mid_y + 20.0 * dmax]);
    pts.push([mid_x + 20.0 * dmax, mid_y - dmax]);

    let mut triangles = vec![Triangle::new(
        [super_base, super_base + 1, super_base + 2],
        &pts,
    )];

    for i in 0..super_base {
        let p = pts[i];

        // triangles invalidated by the new point
        let mut bad = Vec::new();
        for (t_idx, tri) in triangles.iter().enumerate() {
            if tri.circumcircle_contains(p) {
                bad.push(t_idx);
            }
        }

        // boundary of the cavity: edges belonging to exactly one bad triangle
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &t_idx in &bad {
            let [a, b, c] = triangles[t_idx].v;
            for edge in [(a, b), (b, c), (c, a)] {
                let shared = bad.iter().any(|&o_idx| {
                    if o_idx == t_idx {
                        return false;
                    }
                    let ov = triangles[o_idx].v;
                    ov.contains(&edge.0) && ov.contains(&edge.1)
                });
                if !shared {
                    boundary.push(edge);
                }
            }
        }

        for &t_idx in bad.iter().rev() {
            triangles.swap_remove(t_idx);
        }

        for (a, b) in boundary {
            triangles.push(Triangle::new([a, b, i], &pts));
        }
    }

    // drop triangles that still touch the super-triangle
    let result = triangles
        .iter()
        .filter(|t| t.v.iter().all(|&v| v < super_base))
        .map(|t| t.v)
        .collect();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points() {
        assert_eq!(
            delaunay(&[[0.0, 0.0], [1.0, 0.0]]),
            Err(MeshError::NotEnoughPoints(2))
        );
    }

    #[test]
    fn single_triangle() -> Result<(), MeshError> {
        let tris = delaunay(&[[0.0, 0.0], [10.0, 0.0], [5.0, 8.0]])?;
        assert_eq!(tris.len(), 1);
        let mut v = tris[0].to_vec();
        v.sort_unstable();
        assert_eq!(v, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn square_splits_into_two_triangles() -> Result<(), MeshError> {
        let tris = delaunay(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]])?;
        assert_eq!(tris.len(), 2);
        Ok(())
    }

    #[test]
    fn triangle_count_matches_euler_bound() -> Result<(), MeshError> {
        // 8 hull points and one interior point: 2n - h - 2 = 8 triangles
        let points = [
            [0.0, 0.0],
            [10.0, -0.5],
            [20.0, 0.0],
            [20.5, 10.0],
            [20.0, 20.0],
            [10.0, 20.5],
            [0.0, 20.0],
            [-0.5, 10.0],
            [10.0, 10.0],
        ];
        let tris = delaunay(&points)?;
        assert_eq!(tris.len(), 8);

        // the triangles tile the hull without overlap
        let area: f64 = tris
            .iter()
            .map(|&[a, b, c]| {
                let (ax, ay) = (f64::from(points[a][0]), f64::from(points[a][1]));
                let (bx, by) = (f64::from(points[b][0]), f64::from(points[b][1]));
                let (cx, cy) = (f64::from(points[c][0]), f64::from(points[c][1]));
                ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() / 2.0
            })
            .sum();
        assert!((area - 420.0).abs() < 1e-6, "tiled area {area}");
        Ok(())
    }

    #[test]
    fn collinear_points_yield_no_triangles() -> Result<(), MeshError> {
        let tris = delaunay(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]])?;
        assert!(tris.is_empty());
        Ok(())
    }

    #[test]
    fn all_points_referenced_by_convex_input() -> Result<(), MeshError> {
        let points = [
            [0.0, 0.0],
            [100.0, 0.0],
            [100.0, 100.0],
            [0.0, 100.0],
            [50.0, 50.0],
        ];
        let tris = delaunay(&points)?;
        let mut seen = vec![false; points.len()];
        for t in &tris {
            for &v in t {
                seen[v] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        Ok(())
    }
}
