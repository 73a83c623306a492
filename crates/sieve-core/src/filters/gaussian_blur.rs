use ndarray::Array2;
use rayon::prelude::*;

use crate::color::to_level;
use crate::consts::{MAX_LEVEL, PARALLEL_PIXEL_THRESHOLD};

/// Blur an 8-bit plane with a `size`x`size` Gaussian kernel using separable
/// 1D convolution. Borders mirror around the edge pixel without repeating it
/// (`dcb|abcd|cba`); the output is rounded back to 8-bit levels.
///
/// Sigma is derived from the kernel size as `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_blur(data: &Array2<u8>, size: usize) -> Array2<u8> {
    if data.is_empty() {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(size, gaussian_sigma_for_size(size));
    let normalized = data.mapv(|v| v as f32 / MAX_LEVEL);
    let row_pass = convolve_rows(&normalized, &kernel);
    convolve_cols(&row_pass, &kernel).mapv(to_level)
}

/// Sigma used for a kernel of the given extent.
pub fn gaussian_sigma_for_size(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn make_gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let radius = size / 2;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (_, w) = data.dim();
    let radius = kernel.len() / 2;
    convolve_with(data, |row, col| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let src_col = reflect_101(col as isize + ki as isize - radius as isize, w);
            sum += data[[row, src_col]] * kv;
        }
        sum
    })
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, _) = data.dim();
    let radius = kernel.len() / 2;
    convolve_with(data, |row, col| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let src_row = reflect_101(row as isize + ki as isize - radius as isize, h);
            sum += data[[src_row, col]] * kv;
        }
        sum
    })
}

/// Map an out-of-range index back into `0..len` by mirroring around the
/// first and last element, e.g. `-1 -> 1` and `len -> len - 2`.
fn reflect_101(mut idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    // Kernels wider than the plane can bounce more than once.
    while idx < 0 || idx > last {
        idx = if idx < 0 { -idx } else { 2 * last - idx };
    }
    idx as usize
}

fn convolve_with<F>(data: &Array2<f32>, sample: F) -> Array2<f32>
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    let (h, w) = data.dim();

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| sample(row, col)).collect())
            .collect();

        let mut result = Array2::<f32>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| sample(row, col))
    }
}
