//! # Process-wide dispatcher.
//!
//! For callers that want a single shared instance instead of passing a
//! [`Dispatcher`] around.
//!
//! ## Rules
//! - Initialization happens at most once per installed instance, under a mutex.
//! - [`get`] lazily builds a default dispatcher if none was installed.
//! - [`install`] only succeeds while nothing is installed.
//! - [`reset`] tears the instance down (test isolation); clones handed out
//!   earlier keep working on the old instance.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::dispatch::{Config, Dispatcher};

static GLOBAL: Mutex<Option<Dispatcher>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Dispatcher>> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the process-wide dispatcher, building a default one on first use.
pub fn get() -> Dispatcher {
    slot()
        .get_or_insert_with(|| {
            tracing::debug!("global dispatcher initialized with defaults");
            Dispatcher::builder(Config::default()).build()
        })
        .clone()
}

/// Installs `dispatcher` as the process-wide instance.
///
/// # Errors
/// Gives `dispatcher` back if an instance is already installed.
pub fn install(dispatcher: Dispatcher) -> Result<(), Dispatcher> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(dispatcher);
    }
    *slot = Some(dispatcher);
    tracing::debug!("global dispatcher installed");
    Ok(())
}

/// True if an instance is installed.
pub fn is_initialized() -> bool {
    slot().is_some()
}

/// Removes the process-wide instance, returning it.
pub fn reset() -> Option<Dispatcher> {
    let old = slot().take();
    if old.is_some() {
        tracing::debug!("global dispatcher reset");
    }
    old
}
