use std::path::Path;

use tracing::{debug, info, warn};

use crate::consts::LOG_EVERY_N_FRAMES;
use crate::detection::detect_noise;
use crate::error::Result;
use crate::frame::FrameResult;
use crate::io::{open_source, VideoSource};

use super::config::{ClassifierConfig, ReadErrorPolicy};
use super::types::{ClassificationResult, NoOpReporter, ProgressReporter};

/// Classify every frame of `source` as clean or noisy.
pub fn classify(
    source: &mut dyn VideoSource,
    config: &ClassifierConfig,
) -> Result<ClassificationResult> {
    classify_reported(source, config, &NoOpReporter)
}

/// Open the video at `path` and classify it. `.ser` files are read directly;
/// any other extension is decoded with ffmpeg. The file is closed before
/// this returns, on success and on every error path.
pub fn classify_path(path: &Path, config: &ClassifierConfig) -> Result<ClassificationResult> {
    classify_path_reported(path, config, &NoOpReporter)
}

/// [`classify_path`] with progress reporting.
pub fn classify_path_reported(
    path: &Path,
    config: &ClassifierConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ClassificationResult> {
    config.validate()?;
    let mut source = open_source(path)?;
    classify_reported(source.as_mut(), config, reporter)
}

/// [`classify`] with progress reporting.
///
/// Frames are read in source order; each is assigned the next frame index,
/// run through the detector and appended to the clean or noisy bucket.
pub fn classify_reported(
    source: &mut dyn VideoSource,
    config: &ClassifierConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ClassificationResult> {
    config.validate()?;

    let video_info = source.info();
    info!(
        fps = video_info.fps,
        width = video_info.width,
        height = video_info.height,
        frames = video_info.total_frames,
        method = %config.detection.method,
        threshold = config.detection.threshold,
        size = config.detection.size,
        cutoff = config.noise_level_cutoff,
        "Classifying video"
    );
    reporter.begin(video_info.total_frames);

    let mut clean_frames = Vec::new();
    let mut noisy_frames = Vec::new();
    let mut level_sum = 0.0f64;
    let mut frame_index = 0usize;

    while let Some(read) = source.next_frame() {
        let frame = match read {
            Ok(frame) => frame,
            Err(e) => match config.read_errors {
                ReadErrorPolicy::EndOfStream => {
                    warn!(frame_index, error = %e, "Frame read failed; treating as end of stream");
                    break;
                }
                ReadErrorPolicy::Abort => return Err(e),
            },
        };

        let detection = detect_noise(&frame, &config.detection)?;
        let noise_level = detection.noise_level;
        level_sum += noise_level;

        if frame_index % LOG_EVERY_N_FRAMES == 0 {
            debug!(frame_index, noise_level = %format!("{noise_level:.2}%"), "Frame analyzed");
        }

        let result = FrameResult {
            frame_index,
            frame,
            noise_mask: detection.mask,
            noise_level,
            timestamp: video_info.timestamp_of(frame_index),
        };

        if noise_level > config.noise_level_cutoff {
            noisy_frames.push(result);
        } else {
            clean_frames.push(result);
        }

        frame_index += 1;
        reporter.advance(frame_index);
    }
    reporter.finish();

    let mean_noise_level = if frame_index == 0 {
        warn!("Video contained no readable frames");
        0.0
    } else {
        level_sum / frame_index as f64
    };

    info!(
        clean = clean_frames.len(),
        noisy = noisy_frames.len(),
        mean_noise_level = %format!("{mean_noise_level:.2}%"),
        "Classification complete"
    );

    Ok(ClassificationResult {
        clean_frames,
        noisy_frames,
        video_info,
        mean_noise_level,
    })
}
