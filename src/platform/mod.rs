// LogTally - platform/mod.rs
//
// Platform layer: config directory resolution, config.toml, file streams.

pub mod config;
pub mod fs;
