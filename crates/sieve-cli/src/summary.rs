use std::path::Path;

use console::Style;
use sieve_core::classify::{Bucket, ClassificationResult, ClassifierConfig};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    clean: Style,
    noisy: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            clean: Style::new().green(),
            noisy: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_classification_summary(
    input: &Path,
    config: &ClassifierConfig,
    result: &ClassificationResult,
) {
    let s = Styles::new();
    let info = &result.video_info;

    println!();
    println!("  {}", s.title.apply_to("Noise Classification"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Video"),
        s.value.apply_to(format!(
            "{}x{}, {} frames, {}",
            info.width,
            info.height,
            info.total_frames,
            if info.fps > 0.0 {
                format!("{:.2} fps", info.fps)
            } else {
                "unknown fps".to_string()
            }
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Detection"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(config.detection.method)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Kernel"),
        s.value.apply_to(config.detection.size)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(config.detection.threshold)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Cutoff"),
        s.value.apply_to(format!("{}%", config.noise_level_cutoff))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("On error"),
        s.value.apply_to(config.read_errors)
    );
    println!();

    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Read"),
        s.value.apply_to(result.total_frames())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Clean"),
        s.clean.apply_to(result.clean_frames.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Noisy"),
        s.noisy.apply_to(result.noisy_frames.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Mean noise"),
        s.value.apply_to(format!("{:.2}%", result.mean_noise_level))
    );
    println!();

    if result.noisy_frames.is_empty() {
        return;
    }

    println!("  {}", s.header.apply_to("Noisy frames"));
    println!("    {:>8}  {:>10}  {:>8}", "Frame #", "Time (s)", "Noise");
    println!("    {}", "-".repeat(30));
    for f in result.bucket(Bucket::Noisy) {
        println!(
            "    {:>8}  {:>10.3}  {:>8}",
            f.frame_index,
            f.timestamp,
            s.noisy.apply_to(format!("{:.2}%", f.noise_level))
        );
    }
    println!();
}
