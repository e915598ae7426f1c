use morpho_image::Image;

/// Compute the convex hull of a point set.
///
/// Uses the monotone chain construction. The hull has a consistent winding
/// and does not repeat its first point. Collinear points interior to a hull
/// edge are dropped.
pub fn convex_hull(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: [f32; 2], a: [f32; 2], b: [f32; 2]| {
        (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
    };

    let mut hull: Vec<[f32; 2]> = Vec::with_capacity(sorted.len() + 1);

    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    hull.pop();
    hull
}

/// Fill a convex polygon into a single channel image inplace.
///
/// Pixels whose center lies inside (or on the boundary of) the polygon are
/// set to `value`. Rows and spans falling outside the image are clipped.
pub fn fill_convex_polygon(img: &mut Image<u8, 1>, polygon: &[[f32; 2]], value: u8) {
    if polygon.len() < 3 {
        return;
    }

    let (cols, rows) = (img.cols(), img.rows());

    let min_y = polygon.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
    let max_y = polygon.iter().map(|p| p[1]).fold(f32::MIN, f32::max);

    let y_start = min_y.ceil().max(0.0) as usize;
    let y_end = (max_y.floor().max(0.0) as usize).min(rows.saturating_sub(1));

    let data = img.as_slice_mut();

    for y in y_start..=y_end {
        let fy = y as f32;

        // a convex polygon crosses a scanline in at most one span
        let mut span_min = f32::MAX;
        let mut span_max = f32::MIN;

        for i in 0..polygon.len() {
            let p = polygon[i];
            let q = polygon[(i + 1) % polygon.len()];

            let (y0, y1) = (p[1].min(q[1]), p[1].max(q[1]));
            if fy < y0 || fy > y1 {
                continue;
            }

            if (q[1] - p[1]).abs() < f32::EPSILON {
                span_min = span_min.min(p[0].min(q[0]));
                span_max = span_max.max(p[0].max(q[0]));
            } else {
                let x = p[0] + (fy - p[1]) * (q[0] - p[0]) / (q[1] - p[1]);
                span_min = span_min.min(x);
                span_max = span_max.max(x);
            }
        }

        if span_min > span_max {
            continue;
        }

        let x_start = span_min.ceil().max(0.0) as usize;
        let x_end = (span_max.floor().max(0.0) as usize).min(cols.saturating_sub(1));
        if x_start > x_end {
            continue;
        }

        for cell in &mut data[y * cols + x_start..=y * cols + x_end] {
            *cell = value;
        }
    }
}
