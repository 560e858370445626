//! Error handling for the disk cache
//!
//! Only whole-cache operations (clearing, manual sweeps, configuration
//! loading) surface errors. Per-entry reads and writes degrade to misses
//! and log instead.

mod constructors;
mod display;
mod recovery;
mod types;

pub use types::*;
