pub mod ffmpeg;
pub mod ffmpeg_writer;
pub mod image_io;
pub mod ser;
pub mod ser_writer;
pub mod source;

pub use ffmpeg::FfmpegSource;
pub use ser::{SerReader, SerSource};
pub use source::{open_source, Container, MemorySource, VideoSource};
