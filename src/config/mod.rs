//! Configuration loading for the reader.
//!
//! Settings are read from `conf/config.toml` if present. Missing entries take
//! their defaults and an unreadable or invalid file falls back to the full
//! default set so a book can always be opened.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel};
