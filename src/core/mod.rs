// LogTally - core/mod.rs
//
// Core business logic layer: parsing, windowing, filtering, reporting.
// Must NOT depend on: app or platform.

pub mod discovery;
pub mod events;
pub mod filter;
pub mod model;
pub mod parser;
pub mod report;
pub mod window;
