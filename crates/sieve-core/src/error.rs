use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open video source {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to decode frame {index}: {reason}")]
    Decode { index: usize, reason: String },

    #[error("Failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, SieveError>;
