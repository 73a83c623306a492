pub mod config;
pub mod noise;
pub mod threshold;

pub use config::{DetectionParams, SmoothingMethod};
pub use noise::{detect_noise, detect_noise_luma, smooth, FrameDetection};
