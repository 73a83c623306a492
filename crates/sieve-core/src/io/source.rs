use std::path::Path;

use crate::error::{Result, SieveError};
use crate::frame::{Frame, VideoInfo};

use super::ffmpeg::FfmpegSource;
use super::ser::SerSource;

/// Frame-sequential access to a decoded video.
///
/// Container and codec handling live behind this trait; callers only see
/// fixed-size frames in presentation order plus the stream properties.
pub trait VideoSource {
    /// Stream properties as reported when the source was opened.
    fn info(&self) -> VideoInfo;

    /// Decode the next frame. `None` marks the end of the stream.
    fn next_frame(&mut self) -> Option<Result<Frame>>;
}

/// Container family of a video file, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// SER capture, read directly.
    Ser,
    /// Anything else (mp4, avi, mov, mkv, ...), decoded and encoded by ffmpeg.
    Ffmpeg,
}

impl Container {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ser") => Container::Ser,
            _ => Container::Ffmpeg,
        }
    }
}

/// Open `path` with the source matching its extension.
pub fn open_source(path: &Path) -> Result<Box<dyn VideoSource>> {
    Ok(match Container::from_path(path) {
        Container::Ser => Box::new(SerSource::open(path)?),
        Container::Ffmpeg => Box::new(FfmpegSource::open(path)?),
    })
}

/// In-memory video, used for synthetic input and tests.
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
    info: VideoInfo,
    position: usize,
    fail_at: Option<usize>,
}

impl MemorySource {
    pub fn new(frames: Vec<Frame>, fps: f64) -> Self {
        let (width, height) = frames
            .first()
            .map(|f| (f.width() as u32, f.height() as u32))
            .unwrap_or((0, 0));
        let info = VideoInfo {
            fps,
            width,
            height,
            total_frames: frames.len(),
        };
        Self {
            frames: frames.into_iter(),
            info,
            position: 0,
            fail_at: None,
        }
    }

    /// Make the read of frame `index` fail with a decode error.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl VideoSource for MemorySource {
    fn info(&self) -> VideoInfo {
        self.info.clone()
    }

    fn next_frame(&mut self) -> Option<Result<Frame>> {
        let index = self.position;
        let frame = self.frames.next()?;
        self.position += 1;
        if self.fail_at == Some(index) {
            return Some(Err(SieveError::Decode {
                index,
                reason: "simulated read failure".into(),
            }));
        }
        Some(Ok(frame))
    }
}
