mod common;

use std::path::Path;

use approx::assert_relative_eq;

use sieve_core::error::SieveError;
use sieve_core::frame::ColorMode;
use sieve_core::io::ser::SerReader;
use sieve_core::io::{SerSource, VideoSource};

use common::{append_timestamps, build_ser_header_full, build_ser_with_frames, write_test_ser};

#[test]
fn test_parse_8bit_mono() {
    let frame_data: Vec<u8> = (0u8..12).collect();
    let tmp = write_test_ser(&build_ser_with_frames(4, 3, &[frame_data]));

    let reader = SerReader::open(tmp.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.color_mode(), ColorMode::Mono);
    assert_eq!(reader.header.observer, "Test");

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 3);
    assert_eq!(frame.channels(), 1);
    assert!((frame.data[[0, 1, 0]] - 1.0 / 255.0).abs() < 1e-6);
    assert_eq!(frame.luma()[[2, 3]], 11);
}

#[test]
fn test_parse_16bit_mono() {
    let values: [u16; 4] = [0, 1000, 32767, 65535];
    let mut data = build_ser_header_full(2, 2, 16, 1, 0);
    for v in &values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    let tmp = write_test_ser(&data);

    let reader = SerReader::open(tmp.path()).unwrap();
    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.original_bit_depth, 16);
    assert!((frame.data[[0, 1, 0]] - 1000.0 / 65535.0).abs() < 1e-6);
    assert!((frame.data[[1, 1, 0]] - 1.0).abs() < 1e-6);
}

#[test]
fn test_rgb_and_bgr_channel_order() {
    // One pixel, stored as (10, 20, 30)
    for (color_id, expected) in [(100, [10u8, 20, 30]), (101, [30u8, 20, 10])] {
        let mut data = build_ser_header_full(1, 1, 8, 1, color_id);
        data.extend_from_slice(&[10, 20, 30]);
        let tmp = write_test_ser(&data);

        let frame = SerReader::open(tmp.path()).unwrap().read_frame(0).unwrap();
        assert_eq!(frame.channels(), 3);
        for (c, &level) in expected.iter().enumerate() {
            assert!((frame.data[[0, 0, c]] * 255.0 - level as f32).abs() < 1e-3);
        }
    }
}

#[test]
fn test_fps_from_timestamp_trailer() {
    let frames = vec![vec![0u8; 4]; 5];
    let mut data = build_ser_with_frames(2, 2, &frames);
    // 20 ms apart -> 50 fps
    append_timestamps(&mut data, &[0, 200_000, 400_000, 600_000, 800_000]);
    let tmp = write_test_ser(&data);

    let reader = SerReader::open(tmp.path()).unwrap();
    assert_eq!(reader.read_timestamp(1), Some(200_000));
    assert_relative_eq!(reader.fps(), 50.0, epsilon = 1e-9);
}

#[test]
fn test_fps_zero_without_trailer() {
    let tmp = write_test_ser(&build_ser_with_frames(2, 2, &[vec![0u8; 4], vec![0u8; 4]]));
    let reader = SerReader::open(tmp.path()).unwrap();
    assert_eq!(reader.fps(), 0.0);
    assert_eq!(reader.video_info().fps, 0.0);
}

#[test]
fn test_source_reads_in_order_then_ends() {
    let frames: Vec<Vec<u8>> = (0u8..3).map(|i| vec![i * 50; 4]).collect();
    let tmp = write_test_ser(&build_ser_with_frames(2, 2, &frames));

    let mut source = SerSource::open(tmp.path()).unwrap();
    assert_eq!(source.info().total_frames, 3);
    for i in 0u8..3 {
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.luma()[[0, 0]], i * 50);
    }
    assert!(source.next_frame().is_none());
}

#[test]
fn test_truncated_frame_is_decode_error() {
    let mut data = build_ser_with_frames(2, 2, &[vec![1u8; 4], vec![2u8; 4]]);
    data.pop();
    let tmp = write_test_ser(&data);

    let mut source = SerSource::open(tmp.path()).unwrap();
    assert!(source.next_frame().unwrap().is_ok());
    let err = source.next_frame().unwrap().unwrap_err();
    assert!(matches!(err, SieveError::Decode { index: 1, .. }), "got {err:?}");
}

#[test]
fn test_bad_magic_rejected() {
    let mut data = build_ser_with_frames(2, 2, &[vec![0u8; 4]]);
    data[0] = b'X';
    let tmp = write_test_ser(&data);
    assert!(matches!(
        SerReader::open(tmp.path()),
        Err(SieveError::InvalidSer(_))
    ));
}

#[test]
fn test_zero_dimensions_rejected() {
    let tmp = write_test_ser(&build_ser_header_full(0, 4, 8, 0, 0));
    assert!(matches!(
        SerReader::open(tmp.path()),
        Err(SieveError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_negative_header_counts_rejected() {
    // width @26, height @30, frame_count @38
    for offset in [26usize, 30, 38] {
        let mut data = build_ser_header_full(2, 2, 8, 1, 0);
        data[offset..offset + 4].copy_from_slice(&(-1i32).to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        let tmp = write_test_ser(&data);
        assert!(
            matches!(SerReader::open(tmp.path()), Err(SieveError::InvalidSer(_))),
            "negative field at byte {offset} accepted"
        );
    }
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let err = SerSource::open(Path::new("/no/such/file.ser")).err().unwrap();
    assert!(matches!(err, SieveError::SourceUnavailable { .. }));
}
