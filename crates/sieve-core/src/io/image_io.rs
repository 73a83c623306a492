use std::path::Path;

use image::{GrayImage, ImageFormat};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SieveError};
use crate::frame::{Frame, NoiseMask};

/// Save a noise mask as an 8-bit grayscale PNG (noise = white).
pub fn save_mask_png(mask: &NoiseMask, path: &Path) -> Result<()> {
    let img = to_gray_image(mask.data.iter().copied(), mask.width(), mask.height())?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load an image file (PNG, TIFF, ...) as a three-channel frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let rgb = img.to_rgb16();
    let (w, h) = rgb.dimensions();
    let (w, h) = (w as usize, h as usize);

    let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, channel)| {
        rgb.get_pixel(col as u32, row as u32).0[channel] as f32 / 65535.0
    });

    Ok(Frame::new(data, 16))
}

fn to_gray_image(pixels: impl Iterator<Item = u8>, width: usize, height: usize) -> Result<GrayImage> {
    GrayImage::from_raw(width as u32, height as u32, pixels.collect()).ok_or(
        SieveError::InvalidDimensions {
            width: width as u32,
            height: height as u32,
        },
    )
}
