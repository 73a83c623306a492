pub mod gaussian_blur;
pub mod median;

pub use gaussian_blur::{gaussian_blur, gaussian_sigma_for_size};
pub use median::median_filter;
