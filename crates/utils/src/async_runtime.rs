//! Background execution context for deferred work
//!
//! Work that must not compete with the caller (cache sweeps, for one) is
//! spawned onto the ambient tokio runtime when there is one, and otherwise
//! onto a small process-wide runtime that is built on first use and lives
//! for the rest of the process.

use once_cell::sync::OnceCell;
use std::io;
use tokio::runtime::{Builder, Handle, Runtime};

static BACKGROUND_RUNTIME: OnceCell<Runtime> = OnceCell::new();

const BACKGROUND_WORKERS: usize = 2;

/// Check if we're already in an async context
#[must_use]
pub fn is_in_async_context() -> bool {
    Handle::try_current().is_ok()
}

/// Handle to the runtime deferred work should be spawned on
pub fn background_handle() -> io::Result<Handle> {
    if let Ok(handle) = Handle::try_current() {
        return Ok(handle);
    }

    let runtime = BACKGROUND_RUNTIME.get_or_try_init(|| {
        Builder::new_multi_thread()
            .worker_threads(BACKGROUND_WORKERS)
            .thread_name("diskcache-background")
            .enable_all()
            .build()
    })?;
    Ok(runtime.handle().clone())
}
