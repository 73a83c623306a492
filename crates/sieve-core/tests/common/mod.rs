#![allow(dead_code)]

use ndarray::{Array2, Array3};

use sieve_core::frame::Frame;
use sieve_core::io::ser::SER_HEADER_SIZE;

/// Flat one-channel frame at the given 8-bit level.
pub fn flat_frame(h: usize, w: usize, level: u8) -> Frame {
    Frame::from_gray8(&Array2::from_elem((h, w), level))
}

/// Flat RGB frame.
pub fn flat_rgb_frame(h: usize, w: usize, rgb: [u8; 3]) -> Frame {
    Frame::from_rgb8(&Array3::from_shape_fn((h, w, 3), |(_, _, c)| rgb[c]))
}

/// Black frame with a single white pixel at (row, col).
pub fn spike_frame(h: usize, w: usize, row: usize, col: usize) -> Frame {
    let mut levels = Array2::<u8>::zeros((h, w));
    levels[[row, col]] = 255;
    Frame::from_gray8(&levels)
}

/// Black frame with salt noise on every other row: half the pixels are white.
pub fn salted_frame(h: usize, w: usize) -> Frame {
    Frame::from_gray8(&Array2::from_shape_fn((h, w), |(row, _)| {
        if row % 2 == 0 { 255 } else { 0 }
    }))
}

/// Deterministic textured frame (xorshift pattern) for sweep tests.
pub fn textured_frame(h: usize, w: usize, seed: u32) -> Frame {
    let mut state = seed.max(1);
    Frame::from_gray8(&Array2::from_shape_fn((h, w), |_| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % 256) as u8
    }))
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..4].copy_from_slice(b"Test");
    buf.extend_from_slice(&observer);
    // Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC (8 bytes each)
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header_full(width, height, 8, frames.len(), 0);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Append a timestamp trailer (100 ns ticks) to a SER buffer.
pub fn append_timestamps(buf: &mut Vec<u8>, ticks: &[u64]) {
    for t in ticks {
        buf.extend_from_slice(&t.to_le_bytes());
    }
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
