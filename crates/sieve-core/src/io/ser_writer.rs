use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::color::to_level;
use crate::error::{Result, SieveError};
use crate::io::ser::{SerHeader, SER_COLOR_RGB, SER_HEADER_SIZE, SER_MAGIC};
use crate::frame::Frame;

impl SerHeader {
    /// Header for an 8-bit file of `frame_count` frames shaped like `frame`:
    /// RGB when the frame has three channels, mono otherwise.
    pub fn for_frames(frame: &Frame, frame_count: usize) -> Self {
        Self {
            color_id: if frame.is_color() { SER_COLOR_RGB } else { 0 },
            little_endian: true,
            width: frame.width() as u32,
            height: frame.height() as u32,
            pixel_depth: 8,
            frame_count: frame_count as u32,
            observer: String::new(),
            instrument: String::new(),
            telescope: String::new(),
            date_time: 0,
            date_time_utc: 0,
        }
    }
}

/// Writes a valid SER file at the raw byte level.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frames_written: u32,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Write a single raw frame (bytes must match the header's frame_byte_size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.header.frame_byte_size() {
            return Err(SieveError::InvalidInput(format!(
                "frame has {} bytes, header expects {}",
                data.len(),
                self.header.frame_byte_size()
            )));
        }
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Quantize a frame to 8-bit samples and write it.
    ///
    /// The frame must match the header's dimensions and plane count.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let planes = self.header.planes_per_pixel();
        if frame.width() as u32 != self.header.width
            || frame.height() as u32 != self.header.height
            || frame.channels() != planes
        {
            return Err(SieveError::InvalidInput(format!(
                "frame {}x{}x{} does not match SER stream {}x{}x{}",
                frame.width(),
                frame.height(),
                frame.channels(),
                self.header.width,
                self.header.height,
                planes
            )));
        }
        let bytes: Vec<u8> = frame.data.iter().map(|&v| to_level(v)).collect();
        self.write_raw_frame(&bytes)
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Write the optional timestamp trailer (one u64 per frame, little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    w.write_all(SER_MAGIC)?;
    // LuID
    w.write_all(&0i32.to_le_bytes())?;
    w.write_all(&header.color_id.to_le_bytes())?;
    // 0 = little-endian, matching the reader
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    w.write_all(&(header.width as i32).to_le_bytes())?;
    w.write_all(&(header.height as i32).to_le_bytes())?;
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    write_fixed_string(w, &header.observer, 40)?;
    write_fixed_string(w, &header.instrument, 40)?;
    write_fixed_string(w, &header.telescope, 40)?;
    w.write_all(&header.date_time.to_le_bytes())?;
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}
