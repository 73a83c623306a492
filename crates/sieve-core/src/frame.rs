use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::luminance;
use crate::consts::{MAX_LEVEL, NOISE_MASK_VALUE};

/// A single decoded video frame.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width, channels).
    /// One channel for mono sources, three (R, G, B) for color.
    pub data: Array3<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array3<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
        }
    }

    /// Wrap a single grayscale plane as a one-channel frame.
    pub fn from_gray(data: Array2<f32>, bit_depth: u8) -> Self {
        Self::new(data.insert_axis(Axis(2)), bit_depth)
    }

    /// Build a one-channel frame from 8-bit levels.
    pub fn from_gray8(levels: &Array2<u8>) -> Self {
        Self::from_gray(levels.mapv(|v| v as f32 / MAX_LEVEL), 8)
    }

    /// Build a three-channel frame from 8-bit (R, G, B) levels.
    pub fn from_rgb8(levels: &Array3<u8>) -> Self {
        Self::new(levels.mapv(|v| v as f32 / MAX_LEVEL), 8)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_color(&self) -> bool {
        self.channels() >= 3
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Grayscale derivative as 8-bit luminance levels.
    pub fn luma(&self) -> Array2<u8> {
        luminance(self)
    }
}

/// Binary per-pixel noise flags. Cells hold 255 (noise) or 0.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseMask {
    pub data: Array2<u8>,
}

impl NoiseMask {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_noise(&self, row: usize, col: usize) -> bool {
        self.data[[row, col]] == NOISE_MASK_VALUE
    }

    pub fn noise_pixel_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == NOISE_MASK_VALUE).count()
    }
}

/// Detection outcome for one frame of a classified video.
#[derive(Clone, Debug)]
pub struct FrameResult {
    pub frame_index: usize,
    pub frame: Frame,
    pub noise_mask: NoiseMask,
    /// Percentage of noise pixels, in [0, 100].
    pub noise_level: f64,
    /// Seconds from the start of the video; 0.0 when the frame rate is unknown.
    pub timestamp: f64,
}

/// Stream properties reported by a video source when it is opened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Frames per second; 0.0 when the source does not report timing.
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
}

impl VideoInfo {
    /// Presentation time of a frame, or 0.0 if fps is not positive.
    pub fn timestamp_of(&self, frame_index: usize) -> f64 {
        if self.fps > 0.0 {
            frame_index as f64 / self.fps
        } else {
            0.0
        }
    }
}

/// Color/Bayer mode of the source data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about a SER source file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub video: VideoInfo,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}
