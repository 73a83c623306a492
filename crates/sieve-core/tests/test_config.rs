use sieve_core::classify::{ClassifierConfig, ReadErrorPolicy};
use sieve_core::detection::{DetectionParams, SmoothingMethod};

#[test]
fn test_default_config_values() {
    let config = ClassifierConfig::default();
    assert_eq!(config.detection.method, SmoothingMethod::Gaussian);
    assert_eq!(config.detection.threshold, 5);
    assert_eq!(config.detection.size, 5);
    assert_eq!(config.noise_level_cutoff, 1.5);
    assert_eq!(config.read_errors, ReadErrorPolicy::EndOfStream);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_round_trip() {
    let config = ClassifierConfig {
        detection: DetectionParams::new(SmoothingMethod::Median, 40, 7),
        noise_level_cutoff: 3.25,
        read_errors: ReadErrorPolicy::Abort,
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: ClassifierConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let parsed: ClassifierConfig = toml::from_str(
        r#"
        [detection]
        method = "median"
        "#,
    )
    .unwrap();
    assert_eq!(parsed.detection.method, SmoothingMethod::Median);
    assert_eq!(parsed.detection.threshold, 5);
    assert_eq!(parsed.detection.size, 5);
    assert_eq!(parsed.noise_level_cutoff, 1.5);
}

#[test]
fn test_empty_toml_is_default() {
    let parsed: ClassifierConfig = toml::from_str("").unwrap();
    assert_eq!(parsed, ClassifierConfig::default());
}

#[test]
fn test_out_of_range_threshold_rejected_by_parser() {
    let parsed: Result<ClassifierConfig, _> = toml::from_str(
        r#"
        [detection]
        threshold = 300
        "#,
    );
    assert!(parsed.is_err());
}

#[test]
fn test_non_finite_cutoff_rejected() {
    let config = ClassifierConfig {
        noise_level_cutoff: f64::NAN,
        ..ClassifierConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_read_error_policy_display() {
    assert_eq!(format!("{}", ReadErrorPolicy::EndOfStream), "End of stream");
    assert_eq!(format!("{}", ReadErrorPolicy::Abort), "Abort");
}
