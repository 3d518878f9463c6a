//! Application configuration module
//!
//! Handles configuration sources and application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, DatabaseSettings, LogFormat, LogSettings, ServerSettings};
