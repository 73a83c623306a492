/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Mask value written for a noise pixel.
pub const NOISE_MASK_VALUE: u8 = 255;

/// Largest 8-bit intensity level.
pub const MAX_LEVEL: f32 = 255.0;

/// Default pixel-level binarization cutoff (8-bit difference).
pub const DEFAULT_PIXEL_THRESHOLD: u8 = 5;

/// Default smoothing kernel extent in pixels.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// Largest accepted smoothing kernel extent in pixels. A median window holds
/// `size * size` samples per pixel.
pub const MAX_KERNEL_SIZE: usize = 255;

/// Default frame-level cutoff: frames whose noise percentage exceeds this
/// value are classified as noisy.
pub const DEFAULT_NOISE_LEVEL_CUTOFF: f64 = 1.5;

/// Emit a debug log line every N frames during classification.
pub const LOG_EVERY_N_FRAMES: usize = 10;

/// SER timestamps count 100 ns ticks.
pub const SER_TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Frame rate used when exporting a bucket whose source reported none.
pub const FALLBACK_EXPORT_FPS: f64 = 25.0;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;
