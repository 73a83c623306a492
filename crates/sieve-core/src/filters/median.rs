use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Median filter over a `size`x`size` window on an 8-bit plane.
///
/// `size` must be odd and at most [`MAX_KERNEL_SIZE`](crate::consts::MAX_KERNEL_SIZE).
/// Borders replicate the edge pixel.
/// Uses `select_nth_unstable` for O(n) median without full sort.
pub fn median_filter(data: &Array2<u8>, size: usize) -> Array2<u8> {
    if data.is_empty() {
        return data.clone();
    }
    let (h, w) = data.dim();
    let radius = (size / 2) as isize;
    let window_len = size * size;

    let median_at = |window: &mut Vec<u8>, row: usize, col: usize| -> u8 {
        window.clear();
        for dy in -radius..=radius {
            let r = (row as isize + dy).clamp(0, h as isize - 1) as usize;
            for dx in -radius..=radius {
                let c = (col as isize + dx).clamp(0, w as isize - 1) as usize;
                window.push(data[[r, c]]);
            }
        }
        let mid = window.len() / 2;
        *window.select_nth_unstable(mid).1
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        // Row-parallel: each row allocates its own window buffer
        let rows: Vec<Vec<u8>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut window = Vec::with_capacity(window_len);
                (0..w).map(|col| median_at(&mut window, row, col)).collect()
            })
            .collect();

        let mut result = Array2::<u8>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        let mut result = Array2::<u8>::zeros((h, w));
        let mut window = Vec::with_capacity(window_len);
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = median_at(&mut window, row, col);
            }
        }
        result
    }
}
