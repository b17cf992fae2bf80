//! Configuration layer for a Telegram chat exporter: the annotated
//! config.ini template, the schema behind it, and the filter, media and
//! filename rules the settings drive.

pub mod config;
pub mod filename;
pub mod filter;
pub mod media;

pub use config::{Config, ConfigError};
