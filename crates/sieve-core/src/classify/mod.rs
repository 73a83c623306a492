pub mod classifier;
pub mod config;
pub mod export;
pub mod types;

pub use classifier::{classify, classify_path, classify_path_reported, classify_reported};
pub use config::{ClassifierConfig, ReadErrorPolicy};
pub use types::{Bucket, ClassificationResult, ClassificationSummary, FrameSummary, ProgressReporter};
