//! Shared utilities for the diskcache workspace
//!
//! Directory discovery, atomic file writes, the background runtime used
//! for deferred work, the process-wide preferences store and tracing setup.

pub mod async_runtime;
pub mod atomic_file;
pub mod prefs;
pub mod tracing;
pub mod xdg;

pub use async_runtime::*;
pub use atomic_file::*;
pub use prefs::*;
pub use xdg::*;
