use ndarray::Array2;

use crate::error::{Result, SieveError};
use crate::filters::{gaussian_blur, median_filter};
use crate::frame::{Frame, NoiseMask};

use super::config::{DetectionParams, SmoothingMethod};
use super::threshold::{abs_diff, binarize, noise_percentage};

/// Noise mask and aggregate level for a single frame.
#[derive(Clone, Debug)]
pub struct FrameDetection {
    pub mask: NoiseMask,
    /// Percentage of pixels flagged as noise, in [0, 100].
    pub noise_level: f64,
}

/// Detect noise in a frame by comparing its luminance against a smoothed
/// reference of itself.
pub fn detect_noise(frame: &Frame, params: &DetectionParams) -> Result<FrameDetection> {
    if frame.area() == 0 {
        return Err(SieveError::InvalidInput(format!(
            "frame has zero area ({}x{})",
            frame.width(),
            frame.height()
        )));
    }
    detect_noise_luma(&frame.luma(), params)
}

/// Same as [`detect_noise`] for an already-converted 8-bit luminance plane.
pub fn detect_noise_luma(luma: &Array2<u8>, params: &DetectionParams) -> Result<FrameDetection> {
    params.validate()?;
    if luma.is_empty() {
        return Err(SieveError::InvalidInput("luminance plane is empty".into()));
    }

    let reference = smooth(luma, params.method, params.size);
    let mask = binarize(&abs_diff(luma, &reference), params.threshold);
    let noise_level = noise_percentage(&mask);

    Ok(FrameDetection {
        mask: NoiseMask::new(mask),
        noise_level,
    })
}

/// Apply the selected smoothing filter. `size` is expected to be validated.
pub fn smooth(luma: &Array2<u8>, method: SmoothingMethod, size: usize) -> Array2<u8> {
    match method {
        SmoothingMethod::Median => median_filter(luma, size),
        SmoothingMethod::Gaussian => gaussian_blur(luma, size),
    }
}
