// LogTally - lib.rs
//
// Library entry point, exposing the whole pipeline for integration testing
// and programmatic use. The binary in `main.rs` is a thin CLI over it.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
