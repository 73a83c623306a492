use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sieve_core::classify::export::write_bucket;
use sieve_core::classify::{
    classify_path_reported, Bucket, ClassifierConfig, ProgressReporter, ReadErrorPolicy,
};
use sieve_core::io::image_io::save_mask_png;

use super::MethodArg;
use crate::summary::print_classification_summary;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Input video: SER, or any container ffmpeg decodes (mp4, avi, mov, mkv)
    pub file: PathBuf,

    /// TOML config file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Smoothing filter used as the reference
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Pixel difference (0-255) above which a pixel counts as noise
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Smoothing kernel size (odd)
    #[arg(long)]
    pub size: Option<usize>,

    /// Frame noise percentage above which a frame is noisy
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Fail on a frame that cannot be decoded instead of stopping there
    #[arg(long)]
    pub abort_on_decode_error: bool,

    /// Write clean frames to this file (.ser, or a video such as .mp4)
    #[arg(long)]
    pub export_clean: Option<PathBuf>,

    /// Write noisy frames to this file (.ser, or a video such as .mp4)
    #[arg(long)]
    pub export_noisy: Option<PathBuf>,

    /// Write the noise mask of every noisy frame as PNG into this directory
    #[arg(long)]
    pub masks_dir: Option<PathBuf>,

    /// Print the per-frame summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin(&self, total_frames: usize) {
        self.bar.set_length(total_frames as u64);
    }

    fn advance(&self, frames_done: usize) {
        self.bar.set_position(frames_done as u64);
    }

    fn finish(&self) {
        self.bar.finish_with_message("Classified");
    }
}

fn load_config(args: &ClassifyArgs) -> Result<ClassifierConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ClassifierConfig::default(),
    };

    if let Some(method) = args.method {
        config.detection.method = method.into();
    }
    if let Some(threshold) = args.threshold {
        config.detection.threshold = threshold;
    }
    if let Some(size) = args.size {
        config.detection.size = size;
    }
    if let Some(cutoff) = args.cutoff {
        config.noise_level_cutoff = cutoff;
    }
    if args.abort_on_decode_error {
        config.read_errors = ReadErrorPolicy::Abort;
    }
    Ok(config)
}

pub fn run(args: &ClassifyArgs) -> Result<()> {
    let config = load_config(args)?;

    let bar = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    bar.set_message("Analyzing frames");
    let reporter = BarReporter { bar };

    let result = classify_path_reported(&args.file, &config, &reporter)
        .with_context(|| format!("Failed to classify {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary())?);
    } else {
        print_classification_summary(&args.file, &config, &result);
    }

    for (bucket, target) in [
        (Bucket::Clean, &args.export_clean),
        (Bucket::Noisy, &args.export_noisy),
    ] {
        let Some(path) = target else { continue };
        if result.bucket(bucket).is_empty() {
            tracing::warn!(%bucket, "No frames to export");
            continue;
        }
        let written = write_bucket(&result, bucket, path)
            .with_context(|| format!("Failed to export {} frames to {}", bucket, path.display()))?;
        if !args.json {
            println!("Saved {} {} frames to {}", written, bucket, path.display());
        }
    }

    if let Some(ref dir) = args.masks_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for f in &result.noisy_frames {
            let path = dir.join(format!("mask_{:05}.png", f.frame_index));
            save_mask_png(&f.noise_mask, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        if !args.json {
            println!(
                "Saved {} noise masks to {}",
                result.noisy_frames.len(),
                dir.display()
            );
        }
    }

    Ok(())
}
