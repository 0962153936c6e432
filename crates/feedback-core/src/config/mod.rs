//! Configuration for the feedback buffer.
//! TOML-based, resolution order: env > file > defaults.

pub mod buffer_config;
pub mod defaults;

pub use buffer_config::BufferConfig;
