use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ChildStdin;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use tracing::debug;

use crate::color::to_level;
use crate::error::{Result, SieveError};
use crate::frame::Frame;

/// Encodes frames into a playable video (MPEG-4 Part 2 in the container the
/// output extension names) through an ffmpeg child process fed packed RGB on
/// stdin.
///
/// Odd dimensions are padded by one black row/column, as the yuv420p output
/// format needs even ones.
pub struct FfmpegWriter {
    path: PathBuf,
    child: FfmpegChild,
    stdin: Option<ChildStdin>,
    width: usize,
    height: usize,
    frames_written: usize,
}

impl FfmpegWriter {
    pub fn create(path: &Path, width: usize, height: usize, fps: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SieveError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        if !(fps.is_finite() && fps > 0.0) {
            return Err(SieveError::InvalidParameter(format!(
                "export frame rate must be positive, got {fps}"
            )));
        }

        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.args(["-loglevel", "error", "-nostats"]);
        cmd.args(["-f", "rawvideo", "-pix_fmt", "rgb24"]);
        let size = format!("{width}x{height}");
        let rate = format!("{fps}");
        cmd.args(["-s", size.as_str(), "-r", rate.as_str()]);
        cmd.input("-");
        cmd.args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"]);
        cmd.args(["-c:v", "mpeg4", "-q:v", "2", "-pix_fmt", "yuv420p"]);
        cmd.arg("-y");
        cmd.output(&*path.to_string_lossy());
        debug!(command = ?cmd, "Starting ffmpeg encoder");

        let mut child = cmd.spawn().map_err(|e| SieveError::Encode {
            path: path.to_path_buf(),
            reason: format!("cannot start ffmpeg: {e}"),
        })?;
        let stdin = child.take_stdin();
        if stdin.is_none() {
            let _ = child.kill();
            return Err(SieveError::Encode {
                path: path.to_path_buf(),
                reason: "ffmpeg stdin unavailable".into(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            child,
            stdin,
            width,
            height,
            frames_written: 0,
        })
    }

    /// Quantize a mono or RGB frame to 8-bit RGB and send it to the encoder.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(SieveError::InvalidInput(format!(
                "frame {}x{} does not match video stream {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        let rgb = rgb24_bytes(frame);
        let stdin = self.stdin.as_mut().ok_or_else(|| SieveError::Encode {
            path: self.path.clone(),
            reason: "encoder already finished".into(),
        })?;
        stdin.write_all(&rgb).map_err(|e| SieveError::Encode {
            path: self.path.clone(),
            reason: format!("frame {}: {e}", self.frames_written),
        })?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Close the encoder input and wait for ffmpeg to finish the file.
    pub fn finalize(mut self) -> Result<()> {
        drop(self.stdin.take());

        let mut errors = Vec::new();
        if let Ok(events) = self.child.iter() {
            for event in events {
                match event {
                    FfmpegEvent::Error(message) | FfmpegEvent::Log(_, message) => {
                        errors.push(message)
                    }
                    _ => {}
                }
            }
        }

        let status = self.child.wait()?;
        if !status.success() {
            let reason = if errors.is_empty() {
                format!("ffmpeg exited with {status}")
            } else {
                errors.join("; ")
            };
            return Err(SieveError::Encode {
                path: self.path.clone(),
                reason,
            });
        }
        Ok(())
    }
}

impl Drop for FfmpegWriter {
    fn drop(&mut self) {
        // Abandoned before finalize: stop the encoder instead of leaving it blocked on stdin.
        if self.stdin.is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Packed 8-bit RGB bytes for a frame; mono frames are replicated to all
/// three channels.
fn rgb24_bytes(frame: &Frame) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frame.area() * 3);
    for row in 0..frame.height() {
        for col in 0..frame.width() {
            for c in 0..3 {
                let channel = if frame.is_color() { c } else { 0 };
                bytes.push(to_level(frame.data[[row, col, channel]]));
            }
        }
    }
    bytes
}
