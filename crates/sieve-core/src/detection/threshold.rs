use ndarray::{Array2, Zip};

use crate::consts::NOISE_MASK_VALUE;

/// Per-pixel absolute difference between two planes of equal shape.
pub fn abs_diff(a: &Array2<u8>, b: &Array2<u8>) -> Array2<u8> {
    Zip::from(a).and(b).map_collect(|&x, &y| x.abs_diff(y))
}

/// Binarize: cells strictly above `threshold` become 255, the rest 0.
pub fn binarize(diff: &Array2<u8>, threshold: u8) -> Array2<u8> {
    diff.mapv(|d| if d > threshold { NOISE_MASK_VALUE } else { 0 })
}

/// Percentage of mask cells flagged as noise, in [0, 100].
pub fn noise_percentage(mask: &Array2<u8>) -> f64 {
    let total = mask.len();
    if total == 0 {
        return 0.0;
    }
    let noisy = mask.iter().filter(|&&v| v == NOISE_MASK_VALUE).count();
    noisy as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn binarize_is_strict() {
        let diff = array![[4u8, 5, 6], [0, 255, 5]];
        let mask = binarize(&diff, 5);
        assert_eq!(mask, array![[0u8, 0, 255], [0, 255, 0]]);
    }

    #[test]
    fn percentage_counts_flagged_cells() {
        let mask = array![[255u8, 0], [0, 0]];
        assert!((noise_percentage(&mask) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn abs_diff_is_symmetric() {
        let a = array![[10u8, 200]];
        let b = array![[30u8, 100]];
        assert_eq!(abs_diff(&a, &b), array![[20u8, 100]]);
        assert_eq!(abs_diff(&b, &a), abs_diff(&a, &b));
    }
}
