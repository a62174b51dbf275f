//! Blockdraw Sync - Restore/Save Controller
//!
//! This crate keeps one embedded drawing in sync with its host block:
//! - Controller: the `Uninitialized -> Restoring -> Ready` lifecycle, the
//!   one-shot initial-scene channel, and the autosave entry point
//! - Debounce: the owned, cancellable delayed-save slot (2000 ms window)
//! - Error: sync error type combining scene and host failures
//!
//! Persistence is last-write-wins: only the most recent snapshot inside a
//! debounce window is saved, failed saves are dropped without retry, and
//! racing saves resolve to whichever attribute write lands last.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod debounce;
pub mod error;

// Re-export main types
pub use controller::{
    load_prior_scene, save_snapshot, InitialScene, SyncController, SyncState, SAVE_DEBOUNCE,
};
pub use debounce::Debouncer;
pub use error::{Result, SyncError};
