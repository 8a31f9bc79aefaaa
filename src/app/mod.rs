// LogTally - app/mod.rs
//
// Application layer: drives the core pipeline over real files.
// Depends on core, platform and util.

pub mod events;
pub mod scan;
