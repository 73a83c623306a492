use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_KERNEL_SIZE, DEFAULT_PIXEL_THRESHOLD, MAX_KERNEL_SIZE};
use crate::error::{Result, SieveError};

/// Smoothing filter used to build the reference image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingMethod {
    /// Median filter: targets impulsive (salt-and-pepper) noise.
    Median,
    /// Gaussian blur: targets diffuse noise.
    #[default]
    Gaussian,
}

impl fmt::Display for SmoothingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median => write!(f, "median"),
            Self::Gaussian => write!(f, "gaussian"),
        }
    }
}

impl FromStr for SmoothingMethod {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "gaussian" => Ok(Self::Gaussian),
            other => Err(SieveError::InvalidParameter(format!(
                "unknown smoothing method '{other}' (expected 'median' or 'gaussian')"
            ))),
        }
    }
}

/// Per-frame noise detection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Smoothing filter.
    #[serde(default)]
    pub method: SmoothingMethod,
    /// A pixel is noise when |luma - reference| is strictly greater than this.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Smoothing kernel extent in pixels; must be odd and positive.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_threshold() -> u8 {
    DEFAULT_PIXEL_THRESHOLD
}
fn default_size() -> usize {
    DEFAULT_KERNEL_SIZE
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            method: SmoothingMethod::default(),
            threshold: DEFAULT_PIXEL_THRESHOLD,
            size: DEFAULT_KERNEL_SIZE,
        }
    }
}

impl DetectionParams {
    pub fn new(method: SmoothingMethod, threshold: u8, size: usize) -> Self {
        Self {
            method,
            threshold,
            size,
        }
    }

    /// Reject kernel sizes the filters cannot center (zero and even values)
    /// and sizes above [`MAX_KERNEL_SIZE`].
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SieveError::InvalidParameter(
                "kernel size must be positive".into(),
            ));
        }
        if self.size % 2 == 0 {
            return Err(SieveError::InvalidParameter(format!(
                "kernel size must be odd, got {}",
                self.size
            )));
        }
        if self.size > MAX_KERNEL_SIZE {
            return Err(SieveError::InvalidParameter(format!(
                "kernel size must be at most {MAX_KERNEL_SIZE}, got {}",
                self.size
            )));
        }
        Ok(())
    }
}
