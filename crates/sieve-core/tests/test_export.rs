mod common;

use approx::assert_relative_eq;

use sieve_core::classify::export::write_bucket_ser;
use sieve_core::classify::{classify, Bucket, ClassifierConfig};
use sieve_core::detection::{DetectionParams, SmoothingMethod};
use sieve_core::error::SieveError;
use sieve_core::io::image_io::save_mask_png;
use sieve_core::io::ser::SerReader;
use sieve_core::io::MemorySource;

use common::{flat_frame, flat_rgb_frame, salted_frame};

fn median_config() -> ClassifierConfig {
    ClassifierConfig {
        detection: DetectionParams::new(SmoothingMethod::Median, 5, 3),
        ..ClassifierConfig::default()
    }
}

#[test]
fn test_export_noisy_bucket_in_frame_order() {
    let frames = (0..6)
        .map(|i| if i == 1 || i == 4 { salted_frame(8, 6) } else { flat_frame(8, 6, i as u8 * 10) })
        .collect();
    let result = classify(&mut MemorySource::new(frames, 25.0), &median_config()).unwrap();
    assert_eq!(result.noisy_frames.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noisy.ser");
    let written = write_bucket_ser(&result, Bucket::Noisy, &path).unwrap();
    assert_eq!(written, 2);

    let reader = SerReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 2);
    assert_eq!(reader.header.width, 6);
    assert_eq!(reader.header.height, 8);
    assert_eq!(reader.read_timestamp(0), Some(400_000));
    assert_eq!(reader.read_timestamp(1), Some(1_600_000));

    let first = reader.read_frame(0).unwrap();
    assert_eq!(first.luma(), result.noisy_frames[0].frame.luma());
}

#[test]
fn test_export_clean_bucket_round_trips_levels() {
    let frames = (0..4).map(|i| flat_frame(4, 4, 60 * i as u8)).collect();
    let result = classify(&mut MemorySource::new(frames, 0.0), &median_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.ser");
    write_bucket_ser(&result, Bucket::Clean, &path).unwrap();

    let reader = SerReader::open(&path).unwrap();
    let levels: Vec<u8> = reader.frames().map(|f| f.unwrap().luma()[[0, 0]]).collect();
    assert_eq!(levels, vec![0, 60, 120, 180]);
    // No trailer when the frame rate is unknown
    assert_eq!(reader.read_timestamp(0), None);
}

#[test]
fn test_export_color_frames() {
    let frames = vec![flat_rgb_frame(3, 5, [10, 120, 250]); 3];
    let result = classify(&mut MemorySource::new(frames, 30.0), &median_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean_rgb.ser");
    write_bucket_ser(&result, Bucket::Clean, &path).unwrap();

    let reader = SerReader::open(&path).unwrap();
    assert_eq!(reader.header.planes_per_pixel(), 3);
    assert_relative_eq!(reader.fps(), 30.0, epsilon = 1e-3);
    let frame = reader.read_frame(2).unwrap();
    assert!((frame.data[[1, 4, 2]] * 255.0 - 250.0).abs() < 1e-3);
}

#[test]
fn test_export_empty_bucket_fails() {
    let frames = vec![flat_frame(4, 4, 0)];
    let result = classify(&mut MemorySource::new(frames, 30.0), &median_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = write_bucket_ser(&result, Bucket::Noisy, &dir.path().join("none.ser")).unwrap_err();
    assert!(matches!(err, SieveError::EmptySequence));
}

#[test]
fn test_mask_png_written_with_frame_dimensions() {
    let frames = vec![salted_frame(8, 10)];
    let result = classify(&mut MemorySource::new(frames, 30.0), &median_config()).unwrap();
    let mask = &result.noisy_frames[0].noise_mask;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.png");
    save_mask_png(mask, &path).unwrap();

    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (10, 8));
    assert_eq!(img.get_pixel(0, 2).0[0], 255);
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
}
