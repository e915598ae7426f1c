//! 1d kernel generators for the separable filters.

/// Create a normalized box blur kernel of the given size.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    let size = kernel_size.max(1);
    vec![1.0 / size as f32; size]
}

/// Create a normalized gaussian kernel of the given size and sigma.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let size = kernel_size.max(1);
    let half = (size / 2) as f32;
    let sigma = sigma.max(f32::EPSILON);

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-0.5 * (x / sigma).powi(2)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }

    kernel
}
