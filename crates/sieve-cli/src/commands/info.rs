use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sieve_core::frame::VideoInfo;
use sieve_core::io::ffmpeg::probe_video_info;
use sieve_core::io::ser::SerReader;
use sieve_core::io::Container;

#[derive(Args)]
pub struct InfoArgs {
    /// Input video: SER, or any container ffmpeg decodes
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    match Container::from_path(&args.file) {
        Container::Ser => ser_info(args),
        Container::Ffmpeg => {
            let video = probe_video_info(&args.file)
                .with_context(|| format!("Failed to probe {}", args.file.display()))?;
            println!("File:        {}", args.file.display());
            print_video(&video);
            Ok(())
        }
    }
}

fn print_video(video: &VideoInfo) {
    println!("Frames:      {}", video.total_frames);
    println!("Dimensions:  {}x{}", video.width, video.height);
    if video.fps > 0.0 {
        println!("Frame rate:  {:.3} fps", video.fps);
    } else {
        println!("Frame rate:  unknown");
    }
}

fn ser_info(args: &InfoArgs) -> Result<()> {
    let reader = SerReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let info = reader.source_info(&args.file);

    println!("File:        {}", info.filename.display());
    print_video(&info.video);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref tel) = info.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    let frame_bytes = reader.header.frame_byte_size();
    let total_mb = (frame_bytes * info.video.total_frames) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
