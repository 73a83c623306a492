use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_NOISE_LEVEL_CUTOFF;
use crate::detection::DetectionParams;
use crate::error::{Result, SieveError};

/// What to do when a frame fails to decode partway through a video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadErrorPolicy {
    /// Treat the failed read as the end of the video and keep what was read.
    #[default]
    EndOfStream,
    /// Fail the whole classification with the decode error.
    Abort,
}

impl fmt::Display for ReadErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => write!(f, "End of stream"),
            Self::Abort => write!(f, "Abort"),
        }
    }
}

/// Configuration for a classification run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Per-frame (pixel-level) detection parameters.
    #[serde(default)]
    pub detection: DetectionParams,
    /// Frame-level cutoff: a frame whose noise percentage is strictly greater
    /// than this value is noisy.
    #[serde(default = "default_noise_level_cutoff")]
    pub noise_level_cutoff: f64,
    #[serde(default)]
    pub read_errors: ReadErrorPolicy,
}

fn default_noise_level_cutoff() -> f64 {
    DEFAULT_NOISE_LEVEL_CUTOFF
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            detection: DetectionParams::default(),
            noise_level_cutoff: DEFAULT_NOISE_LEVEL_CUTOFF,
            read_errors: ReadErrorPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;
        if !self.noise_level_cutoff.is_finite() {
            return Err(SieveError::InvalidParameter(format!(
                "noise level cutoff must be finite, got {}",
                self.noise_level_cutoff
            )));
        }
        Ok(())
    }
}
