use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, MAX_LEVEL, PARALLEL_PIXEL_THRESHOLD};
use crate::frame::Frame;

/// Convert a frame to 8-bit luminance levels (ITU-R BT.601 weights).
///
/// One-channel frames are quantized directly; three-channel frames are
/// weighted as (R, G, B).
pub fn luminance(frame: &Frame) -> Array2<u8> {
    let (h, w, c) = frame.data.dim();
    let data = &frame.data;

    let pixel = |row: usize, col: usize| -> u8 {
        let y = if c >= 3 {
            LUMINANCE_R * data[[row, col, 0]]
                + LUMINANCE_G * data[[row, col, 1]]
                + LUMINANCE_B * data[[row, col, 2]]
        } else {
            data[[row, col, 0]]
        };
        to_level(y)
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<u8>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| pixel(row, col)).collect())
            .collect();

        let mut result = Array2::<u8>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| pixel(row, col))
    }
}

/// Quantize a normalized intensity to the nearest 8-bit level.
pub fn to_level(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * MAX_LEVEL).round() as u8
}
