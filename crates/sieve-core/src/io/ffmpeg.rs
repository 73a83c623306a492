use std::path::{Path, PathBuf};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use ffmpeg_sidecar::iter::FfmpegIterator;
use ffprobe::{ffprobe, FfProbe};
use ndarray::Array3;
use tracing::{debug, warn};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SieveError};
use crate::frame::{Frame, VideoInfo};

use super::source::VideoSource;

/// Read stream properties of the first video stream with ffprobe.
pub fn probe_video_info(path: &Path) -> Result<VideoInfo> {
    let metadata = ffprobe(path).map_err(|e| SieveError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: format!("ffprobe failed: {e}"),
    })?;
    video_info_from_probe(&metadata).map_err(|reason| SieveError::SourceUnavailable {
        path: path.to_path_buf(),
        reason,
    })
}

/// Extract [`VideoInfo`] from ffprobe output.
///
/// fps prefers the average frame rate and falls back to the container's base
/// rate. The frame count comes from `nb_frames` when the container records it,
/// otherwise it is estimated from the duration.
fn video_info_from_probe(metadata: &FfProbe) -> std::result::Result<VideoInfo, String> {
    let stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| "no video stream".to_string())?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as u32, h as u32),
        (w, h) => return Err(format!("invalid video dimensions {w:?}x{h:?}")),
    };

    let fps = parse_frame_rate(&stream.avg_frame_rate)
        .filter(|&r| r > 0.0)
        .or_else(|| parse_frame_rate(&stream.r_frame_rate))
        .filter(|&r| r > 0.0)
        .unwrap_or(0.0);

    let duration = stream
        .duration
        .as_deref()
        .or(metadata.format.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    let total_frames = match stream.nb_frames.as_deref().and_then(|n| n.parse::<usize>().ok()) {
        Some(n) => n,
        None => match duration {
            Some(secs) if secs > 0.0 && fps > 0.0 => (secs * fps).round() as usize,
            _ => 0,
        },
    };

    Ok(VideoInfo {
        fps,
        width,
        height,
        total_frames,
    })
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => rate.trim().parse().ok(),
    }
}

/// Sequential [`VideoSource`] over any container ffmpeg can decode
/// (mp4, avi, mov, mkv, ...).
///
/// Frames are decoded by an ffmpeg child process to packed 8-bit RGB on its
/// stdout. The process is killed if the source is dropped before the end of
/// the stream.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: FfmpegChild,
    events: FfmpegIterator,
    next: usize,
    last_error: Option<String>,
    finished: bool,
}

impl FfmpegSource {
    /// Probe `path` and start decoding its first video stream.
    ///
    /// A missing file, an unreadable container or a missing ffmpeg/ffprobe
    /// binary are all reported as [`SieveError::SourceUnavailable`].
    pub fn open(path: &Path) -> Result<Self> {
        let info = probe_video_info(path)?;
        let unavailable = |reason: String| SieveError::SourceUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.input(&*path.to_string_lossy());
        cmd.args(["-map", "0:v:0", "-an", "-sn"]);
        cmd.rawvideo();
        debug!(command = ?cmd, "Starting ffmpeg decoder");

        let mut child = cmd
            .spawn()
            .map_err(|e| unavailable(format!("cannot start ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| unavailable(format!("cannot read ffmpeg output: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            info,
            child,
            events,
            next: 0,
            last_error: None,
            finished: false,
        })
    }

    fn decode(&self, frame: OutputVideoFrame, index: usize) -> Result<Frame> {
        let shape = (
            frame.height as usize,
            frame.width as usize,
            COLOR_CHANNEL_COUNT,
        );
        let levels = Array3::from_shape_vec(shape, frame.data).map_err(|e| SieveError::Decode {
            index,
            reason: format!("{} ({}): {e}", self.path.display(), frame.pix_fmt),
        })?;
        Ok(Frame::from_rgb8(&levels))
    }

    /// Reap the child once its output is exhausted. A non-zero exit is a
    /// decode failure at the frame that could not be produced.
    fn finish(&mut self) -> Option<Result<Frame>> {
        self.finished = true;
        let index = self.next;
        match self.child.wait() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(Err(SieveError::Decode {
                index,
                reason: self
                    .last_error
                    .take()
                    .unwrap_or_else(|| format!("ffmpeg exited with {status}")),
            })),
            Err(e) => Some(Err(SieveError::Decode {
                index,
                reason: e.to_string(),
            })),
        }
    }
}

impl VideoSource for FfmpegSource {
    fn info(&self) -> VideoInfo {
        self.info.clone()
    }

    fn next_frame(&mut self) -> Option<Result<Frame>> {
        if self.finished {
            return None;
        }
        while let Some(event) = self.events.next() {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    let index = self.next;
                    self.next += 1;
                    return Some(self.decode(frame, index));
                }
                FfmpegEvent::Error(message)
                | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                    warn!(frame_index = self.next, %message, "ffmpeg reported an error");
                    self.last_error = Some(message);
                }
                _ => {}
            }
        }
        self.finish()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffprobe::{Format, Stream};

    fn probe_with(stream: Stream, format: Format) -> FfProbe {
        FfProbe {
            streams: vec![stream],
            format,
        }
    }

    fn video_stream(width: i64, height: i64, rate: &str) -> Stream {
        let mut stream = Stream::default();
        stream.codec_type = Some("video".to_string());
        stream.width = Some(width);
        stream.height = Some(height);
        stream.avg_frame_rate = rate.to_string();
        stream.r_frame_rate = rate.to_string();
        stream
    }

    #[test]
    fn frame_rate_parsing() {
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("n/a"), None);
    }

    #[test]
    fn info_uses_frame_count_when_present() {
        let mut stream = video_stream(640, 480, "24/1");
        stream.nb_frames = Some("120".to_string());
        let info = video_info_from_probe(&probe_with(stream, Format::default())).unwrap();
        assert_eq!(
            info,
            VideoInfo {
                fps: 24.0,
                width: 640,
                height: 480,
                total_frames: 120,
            }
        );
    }

    #[test]
    fn info_estimates_frame_count_from_duration() {
        let stream = video_stream(320, 240, "30/1");
        let mut format = Format::default();
        format.duration = Some("2.5".to_string());
        let info = video_info_from_probe(&probe_with(stream, format)).unwrap();
        assert_eq!(info.total_frames, 75);
    }

    #[test]
    fn info_falls_back_to_base_rate() {
        let mut stream = video_stream(16, 16, "0/0");
        stream.r_frame_rate = "50/1".to_string();
        let info = video_info_from_probe(&probe_with(stream, Format::default())).unwrap();
        assert_eq!(info.fps, 50.0);
        assert_eq!(info.total_frames, 0);
    }

    #[test]
    fn info_requires_video_stream() {
        let mut audio = Stream::default();
        audio.codec_type = Some("audio".to_string());
        assert!(video_info_from_probe(&probe_with(audio, Format::default())).is_err());

        let zero = video_stream(0, 480, "25/1");
        assert!(video_info_from_probe(&probe_with(zero, Format::default())).is_err());
    }
}
