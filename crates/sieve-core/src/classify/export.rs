use std::path::Path;

use tracing::{info, warn};

use crate::consts::{FALLBACK_EXPORT_FPS, SER_TICKS_PER_SECOND};
use crate::error::{Result, SieveError};
use crate::frame::FrameResult;
use crate::io::ffmpeg_writer::FfmpegWriter;
use crate::io::ser::SerHeader;
use crate::io::ser_writer::SerWriter;
use crate::io::Container;

use super::types::{Bucket, ClassificationResult};

/// Write one bucket of a classification as an 8-bit SER video.
///
/// Dimensions come from the bucket's lowest-index frame and frames are written
/// in ascending `frame_index` order. When the source frame rate is known, a
/// timestamp trailer preserving each frame's original presentation time is
/// appended. Returns the number of frames written.
pub fn write_bucket_ser(
    result: &ClassificationResult,
    bucket: Bucket,
    path: &Path,
) -> Result<usize> {
    let frames = sorted_bucket(result, bucket)?;
    let first = frames[0];
    let header = SerHeader::for_frames(&first.frame, frames.len());
    let mut writer = SerWriter::create(path, &header)?;

    for f in &frames {
        writer.write_frame(&f.frame)?;
    }

    if result.video_info.fps > 0.0 {
        let timestamps: Vec<u64> = frames
            .iter()
            .map(|f| (f.timestamp * SER_TICKS_PER_SECOND).round() as u64)
            .collect();
        writer.write_timestamps(&timestamps)?;
    }

    let written = writer.frames_written() as usize;
    writer.finalize()?;
    info!(
        bucket = %bucket,
        frames = written,
        path = %path.display(),
        "Bucket exported"
    );
    Ok(written)
}

/// Write one bucket as a playable video through ffmpeg, in ascending
/// `frame_index` order at the source frame rate. The container follows the
/// extension of `path` (typically `.mp4`). Sources without a frame rate are
/// written at [`FALLBACK_EXPORT_FPS`]. Returns the number of frames written.
pub fn write_bucket_video(
    result: &ClassificationResult,
    bucket: Bucket,
    path: &Path,
) -> Result<usize> {
    let frames = sorted_bucket(result, bucket)?;
    let first = &frames[0].frame;

    let fps = if result.video_info.fps > 0.0 {
        result.video_info.fps
    } else {
        warn!(fps = FALLBACK_EXPORT_FPS, "Source frame rate unknown; using fallback");
        FALLBACK_EXPORT_FPS
    };

    let mut writer = FfmpegWriter::create(path, first.width(), first.height(), fps)?;
    for f in &frames {
        writer.write_frame(&f.frame)?;
    }
    let written = writer.frames_written();
    writer.finalize()?;
    info!(
        bucket = %bucket,
        frames = written,
        fps,
        path = %path.display(),
        "Bucket exported"
    );
    Ok(written)
}

/// Write one bucket in the format named by the extension of `path`: SER for
/// `.ser`, an ffmpeg-encoded video otherwise.
pub fn write_bucket(result: &ClassificationResult, bucket: Bucket, path: &Path) -> Result<usize> {
    match Container::from_path(path) {
        Container::Ser => write_bucket_ser(result, bucket, path),
        Container::Ffmpeg => write_bucket_video(result, bucket, path),
    }
}

fn sorted_bucket(result: &ClassificationResult, bucket: Bucket) -> Result<Vec<&FrameResult>> {
    let mut frames: Vec<&FrameResult> = result.bucket(bucket).iter().collect();
    if frames.is_empty() {
        return Err(SieveError::EmptySequence);
    }
    frames.sort_by_key(|f| f.frame_index);
    Ok(frames)
}
