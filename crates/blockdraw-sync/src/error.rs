//! Error types for blockdraw-sync

use thiserror::Error;

/// Sync error: anything that can go wrong while persisting or restoring
#[derive(Debug, Error)]
pub enum SyncError {
    /// The document could not be serialized or parsed
    #[error("scene error: {0}")]
    Scene(#[from] blockdraw_scene::SceneError),

    /// A host call failed
    #[error("host error: {0}")]
    Host(#[from] blockdraw_host::HostError),
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
