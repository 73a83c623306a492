use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sieve_core::detection::{detect_noise, DetectionParams};
use sieve_core::io::image_io::{load_frame, save_mask_png};

use super::MethodArg;

#[derive(Args)]
pub struct DetectArgs {
    /// Input image file (PNG, TIFF, ...)
    pub file: PathBuf,

    /// Smoothing filter used as the reference
    #[arg(long, value_enum, default_value = "gaussian")]
    pub method: MethodArg,

    /// Pixel difference (0-255) above which a pixel counts as noise
    #[arg(long, default_value = "5")]
    pub threshold: u8,

    /// Smoothing kernel size (odd)
    #[arg(long, default_value = "5")]
    pub size: usize,

    /// Write the noise mask as PNG
    #[arg(long)]
    pub mask: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let frame = load_frame(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    println!("Loaded {}x{} image", frame.width(), frame.height());

    let params = DetectionParams::new(args.method.into(), args.threshold, args.size);
    let detection = detect_noise(&frame, &params)?;

    println!(
        "Noise level: {:.2}% ({} of {} pixels, {} size {}, threshold {})",
        detection.noise_level,
        detection.mask.noise_pixel_count(),
        frame.area(),
        params.method,
        params.size,
        params.threshold
    );

    if let Some(ref path) = args.mask {
        save_mask_png(&detection.mask, path)
            .with_context(|| format!("Failed to write mask to {}", path.display()))?;
        println!("Saved mask to {}", path.display());
    }

    Ok(())
}
