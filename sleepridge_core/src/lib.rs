#![forbid(unsafe_code)]

//! Core library for sleepridge: sleep-timing ridge plots from activity logs.
//!
//! This crate provides:
//! - Domain types (sleep intervals, day indices, grid samples)
//! - Activity log loading
//! - Point-in-time sleep status
//! - The daily grid sampler
//! - Density estimation and ridge plot rendering
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod loader;
pub mod status;
pub mod sampler;
pub mod kde;
pub mod palette;
pub mod ridge;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use loader::{load_sleep_intervals, read_sleep_intervals};
pub use status::{check_status, SleepStatus};
pub use sampler::{build_dataset, SamplerParams};
pub use ridge::{render_ridge_plot, RenderOptions};
