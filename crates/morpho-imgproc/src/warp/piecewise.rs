use rayon::prelude::*;

use morpho_image::Image;

use super::WarpError;
use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::mesh::{bounding_box, delaunay, transform_point, triangle_affines};

/// Warp a source image into a destination landmark geometry.
///
/// The destination point set is triangulated (topology is derived from the
/// destination geometry only) and every pixel inside the destination
/// region of interest is resampled from the source image through the
/// affine transform of its containing triangle. Pixels outside the mesh,
/// and pixels of triangles with collinear destination vertices, are left
/// untouched.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, written in place inside the mesh region.
/// * `src_points` - Landmark positions in the source image.
/// * `dst_points` - Corresponding landmark positions in the destination, same length.
/// * `interpolation` - The interpolation mode for source sampling.
pub fn warp_piecewise_affine(
    src: &Image<f32, 3>,
    dst: &mut Image<f32, 3>,
    src_points: &[[f32; 2]],
    dst_points: &[[f32; 2]],
    interpolation: InterpolationMode,
) -> Result<(), WarpError> {
    let triangles = delaunay(dst_points)?;
    let affines = triangle_affines(&triangles, src_points, dst_points)?;

    let degenerate = affines.iter().filter(|a| a.is_none()).count();
    if degenerate > 0 {
        log::warn!(
            "skipping {degenerate} degenerate triangle(s) of {}",
            triangles.len()
        );
    }

    let roi = match RegionOfInterest::from_points(dst_points, dst.cols(), dst.rows()) {
        Some(roi) => roi,
        None => return Ok(()),
    };

    let raster = triangle_index_raster(&roi, &triangles, dst_points);

    let cols = dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(3 * cols)
        .enumerate()
        .filter(|(y, _)| roi.contains_row(*y))
        .for_each(|(y, dst_row)| {
            let raster_row = &raster[(y - roi.y0) * roi.width()..][..roi.width()];
            for (i, &tri_idx) in raster_row.iter().enumerate() {
                if tri_idx < 0 {
                    continue;
                }
                let Some(m) = &affines[tri_idx as usize] else {
                    continue;
                };

                let x = roi.x0 + i;
                let (u, v) = transform_point(x as f32, y as f32, m);
                let pixel = &mut dst_row[3 * x..3 * x + 3];
                for (k, value) in pixel.iter_mut().enumerate() {
                    *value = interpolate_pixel(src, u, v, k, interpolation);
                }
            }
        });

    Ok(())
}

/// The destination rows/columns spanned by the landmark bounding box,
/// clamped to the canvas.
struct RegionOfInterest {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl RegionOfInterest {
    fn from_points(points: &[[f32; 2]], cols: usize, rows: usize) -> Option<Self> {
        if points.is_empty() || cols == 0 || rows == 0 {
            return None;
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(points);
        let x0 = (min_x.floor().max(0.0) as usize).min(cols - 1);
        let y0 = (min_y.floor().max(0.0) as usize).min(rows - 1);
        let x1 = (max_x.ceil().max(0.0) as usize).min(cols - 1);
        let y1 = (max_y.ceil().max(0.0) as usize).min(rows - 1);

        if x1 < x0 || y1 < y0 {
            return None;
        }

        Some(Self { x0, y0, x1, y1 })
    }

    fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }

    fn contains_row(&self, y: usize) -> bool {
        y >= self.y0 && y <= self.y1
    }
}

/// Rasterize triangle membership over the region of interest.
///
/// Every cell holds the index of the triangle containing that pixel, or -1.
/// Pixels on shared edges keep the first triangle that claims them, which
/// makes the assignment deterministic for a fixed triangle order.
fn triangle_index_raster(
    roi: &RegionOfInterest,
    triangles: &[[usize; 3]],
    points: &[[f32; 2]],
) -> Vec<i32> {
    let mut raster = vec![-1i32; roi.width() * roi.height()];

    for (tri_idx, tri) in triangles.iter().enumerate() {
        let a = points[tri[0]];
        let b = points[tri[1]];
        let c = points[tri[2]];

        let (min_x, min_y, max_x, max_y) = bounding_box(&[a, b, c]);
        let x_start = (min_x.floor().max(roi.x0 as f32) as usize).min(roi.x1);
        let x_end = (max_x.ceil().max(0.0) as usize).min(roi.x1);
        let y_start = (min_y.floor().max(roi.y0 as f32) as usize).min(roi.y1);
        let y_end = (max_y.ceil().max(0.0) as usize).min(roi.y1);

        for y in y_start..=y_end {
            let row = &mut raster[(y - roi.y0) * roi.width()..][..roi.width()];
            for x in x_start..=x_end {
                let cell = &mut row[x - roi.x0];
                if *cell >= 0 {
                    continue;
                }
                if point_in_triangle([x as f32, y as f32], a, b, c) {
                    *cell = tri_idx as i32;
                }
            }
        }
    }

    raster
}

fn edge_sign(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (p[0] - b[0]) * (a[1] - b[1]) - (a[0] - b[0]) * (p[1] - b[1])
}

fn point_in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    let d1 = edge_sign(p, a, b);
    let d2 = edge_sign(p, b, c);
    let d3 = edge_sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
