pub mod classify;
pub mod config;
pub mod detect;
pub mod info;

use clap::ValueEnum;
use sieve_core::detection::SmoothingMethod;

#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Median,
    Gaussian,
}

impl From<MethodArg> for SmoothingMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Median => SmoothingMethod::Median,
            MethodArg::Gaussian => SmoothingMethod::Gaussian,
        }
    }
}
