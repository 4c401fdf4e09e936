//! Cadence application wiring
//!
//! Configuration loading and construction of the playback stack from it.

pub mod config;
pub mod error;
pub mod setup;

pub use config::AppConfig;
pub use error::{AppError, Result};
