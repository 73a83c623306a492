use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;
use tracing::warn;

use crate::consts::SER_TICKS_PER_SECOND;
use crate::error::{Result, SieveError};
use crate::frame::{ColorMode, Frame, SourceInfo, VideoInfo};

use super::source::VideoSource;

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER color ids with interleaved three-plane pixels.
pub const SER_COLOR_RGB: i32 = 100;
pub const SER_COLOR_BGR: i32 = 101;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            SER_COLOR_RGB | SER_COLOR_BGR => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.bytes_per_pixel_plane()
            * self.planes_per_pixel()
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            0 => ColorMode::Mono,
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            SER_COLOR_RGB => ColorMode::RGB,
            SER_COLOR_BGR => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    ///
    /// A file whose frame data is shorter than the header announces is
    /// accepted; reading a missing frame fails with [`SieveError::InvalidSer`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(SieveError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(SieveError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let expected_data_size =
            SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            warn!(
                expected = expected_data_size,
                actual = mmap.len(),
                "SER file is truncated"
            );
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(SieveError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        if end > self.mmap.len() {
            return Err(SieveError::InvalidSer(format!(
                "frame {} is truncated ({} of {} bytes present)",
                index,
                self.mmap.len().saturating_sub(offset),
                self.header.frame_byte_size()
            )));
        }
        Ok(&self.mmap[offset..end])
    }

    /// Read a single frame, converting to f32 in [0.0, 1.0].
    ///
    /// RGB and BGR sources yield three channels in (R, G, B) order; mono and
    /// Bayer sources yield the raw single plane.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let planes = self.header.planes_per_pixel();
        let order: &[usize] = match self.header.color_id {
            SER_COLOR_BGR => &[2, 1, 0],
            _ if planes == 3 => &[0, 1, 2],
            _ => &[0],
        };
        let data = decode_interleaved(raw, &self.header, order);
        Ok(Frame::new(
            data,
            self.header.bytes_per_pixel_plane() as u8 * 8,
        ))
    }

    /// Read per-frame timestamp (100 ns ticks) from the optional trailer.
    pub fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset =
            SER_HEADER_SIZE + self.header.frame_byte_size() * self.header.frame_count as usize;
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Frame rate derived from the timestamp trailer; 0.0 when unavailable.
    pub fn fps(&self) -> f64 {
        let n = self.frame_count();
        if n < 2 {
            return 0.0;
        }
        match (self.read_timestamp(0), self.read_timestamp(n - 1)) {
            (Some(first), Some(last)) if last > first => {
                (n - 1) as f64 * SER_TICKS_PER_SECOND / (last - first) as f64
            }
            _ => 0.0,
        }
    }

    pub fn video_info(&self) -> VideoInfo {
        VideoInfo {
            fps: self.fps(),
            width: self.header.width,
            height: self.header.height,
            total_frames: self.frame_count(),
        }
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            video: self.video_info(),
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            observer: non_empty(&self.header.observer),
            telescope: non_empty(&self.header.telescope),
            instrument: non_empty(&self.header.instrument),
        }
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

/// Sequential [`VideoSource`] over a SER file.
pub struct SerSource {
    reader: SerReader,
    next: usize,
}

impl SerSource {
    /// Open a SER file for sequential reading.
    ///
    /// Any failure to open or parse the file is reported as
    /// [`SieveError::SourceUnavailable`].
    pub fn open(path: &Path) -> Result<Self> {
        let reader = SerReader::open(path).map_err(|e| SieveError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { reader, next: 0 })
    }
}

impl VideoSource for SerSource {
    fn info(&self) -> VideoInfo {
        self.reader.video_info()
    }

    fn next_frame(&mut self) -> Option<Result<Frame>> {
        let index = self.next;
        if index >= self.reader.frame_count() {
            return None;
        }
        self.next += 1;
        Some(
            self.reader
                .read_frame(index)
                .map_err(|e| SieveError::Decode {
                    index,
                    reason: e.to_string(),
                }),
        )
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = read_unsigned(&mut cursor, "width")?;
    let height = read_unsigned(&mut cursor, "height")?;
    let pixel_depth = read_unsigned(&mut cursor, "pixel depth")?;
    let frame_count = read_unsigned(&mut cursor, "frame count")?;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(SieveError::InvalidDimensions { width, height });
    }

    let frame_fits = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(6))
        .and_then(|bytes| bytes.checked_mul(frame_count as usize))
        .is_some();
    if !frame_fits {
        return Err(SieveError::InvalidSer("Frame data size overflows".into()));
    }

    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(SieveError::InvalidSer(format!(
            "Unsupported pixel depth: {pixel_depth}"
        )));
    }

    // 0 is little-endian in practice (FireCapture, Siril), despite the field name.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

/// Header counts are stored as signed 32-bit integers; negatives are corrupt.
fn read_unsigned(cursor: &mut std::io::Cursor<&[u8]>, field: &str) -> Result<u32> {
    let value = cursor.read_i32::<LittleEndian>()?;
    u32::try_from(value)
        .map_err(|_| SieveError::InvalidSer(format!("Negative {field} in header: {value}")))
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Decode interleaved samples into a (height, width, channels) array.
/// `order[c]` is the source plane that lands in output channel `c`.
fn decode_interleaved(raw: &[u8], header: &SerHeader, order: &[usize]) -> Array3<f32> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bytes_per_sample = header.bytes_per_pixel_plane();
    let planes = header.planes_per_pixel();
    let max_val = ((1u32 << header.pixel_depth) - 1) as f32;
    let little_endian = header.little_endian;

    Array3::from_shape_fn((h, w, order.len()), |(row, col, channel)| {
        let pixel_offset = (row * w + col) * planes * bytes_per_sample;
        let idx = pixel_offset + order[channel] * bytes_per_sample;
        let val = if bytes_per_sample == 1 {
            raw[idx] as f32
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if little_endian {
                u16::from_le_bytes(pair) as f32
            } else {
                u16::from_be_bytes(pair) as f32
            }
        };
        (val / max_val).min(1.0)
    })
}
