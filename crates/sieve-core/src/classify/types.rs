use std::fmt;

use serde::{Deserialize, Serialize};

use crate::frame::{FrameResult, VideoInfo};

/// Which side of the frame-level cutoff a frame fell on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Clean,
    Noisy,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Noisy => write!(f, "noisy"),
        }
    }
}

/// Outcome of one classification run.
///
/// Both buckets are ordered by `frame_index` ascending.
#[derive(Clone, Debug)]
pub struct ClassificationResult {
    pub clean_frames: Vec<FrameResult>,
    pub noisy_frames: Vec<FrameResult>,
    pub video_info: VideoInfo,
    /// Mean noise level over every frame read; 0.0 for an empty video.
    pub mean_noise_level: f64,
}

impl ClassificationResult {
    pub fn bucket(&self, bucket: Bucket) -> &[FrameResult] {
        match bucket {
            Bucket::Clean => &self.clean_frames,
            Bucket::Noisy => &self.noisy_frames,
        }
    }

    /// Number of frames read from the source.
    pub fn total_frames(&self) -> usize {
        self.clean_frames.len() + self.noisy_frames.len()
    }

    /// All frames of both buckets merged by `frame_index`, tagged with their bucket.
    pub fn frames_in_order(&self) -> Vec<(Bucket, &FrameResult)> {
        let mut merged = Vec::with_capacity(self.total_frames());
        let mut clean = self.clean_frames.iter().peekable();
        let mut noisy = self.noisy_frames.iter().peekable();

        loop {
            let take_clean = match (clean.peek(), noisy.peek()) {
                (Some(c), Some(n)) => c.frame_index < n.frame_index,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_clean {
                clean.next().map(|f| (Bucket::Clean, f))
            } else {
                noisy.next().map(|f| (Bucket::Noisy, f))
            };
            merged.extend(next);
        }

        merged
    }

    /// Pixel-free digest of the run.
    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            video_info: self.video_info.clone(),
            frames_read: self.total_frames(),
            clean_count: self.clean_frames.len(),
            noisy_count: self.noisy_frames.len(),
            mean_noise_level: self.mean_noise_level,
            frames: self
                .frames_in_order()
                .into_iter()
                .map(|(bucket, f)| FrameSummary {
                    frame_index: f.frame_index,
                    noise_level: f.noise_level,
                    timestamp: f.timestamp,
                    bucket,
                })
                .collect(),
        }
    }
}

/// Serializable digest of a [`ClassificationResult`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub video_info: VideoInfo,
    pub frames_read: usize,
    pub clean_count: usize,
    pub noisy_count: usize,
    pub mean_noise_level: f64,
    pub frames: Vec<FrameSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameSummary {
    pub frame_index: usize,
    pub noise_level: f64,
    pub timestamp: f64,
    pub bucket: Bucket,
}

/// Progress reporting for a classification run.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// Reading is about to start. `total_frames` is the count the source
    /// reports, which may be inaccurate.
    fn begin(&self, _total_frames: usize) {}

    /// `frames_done` frames have been read and classified.
    fn advance(&self, _frames_done: usize) {}

    /// The run is finished.
    fn finish(&self) {}
}

/// No-op progress reporter.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
