//! Error types for blockdraw-scene

use thiserror::Error;

/// Scene parsing/serialization error
///
/// Any of these variants means stored content existed but was not a usable
/// scene, which callers report distinctly from "no prior save".
#[derive(Debug, Error)]
pub enum SceneError {
    /// Content is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but the `type` tag is not a drawing scene
    #[error("not a drawing scene (type tag: {0:?})")]
    NotAScene(String),

    /// Scene file version newer than this library understands
    #[error("unsupported scene version: {0}")]
    UnsupportedVersion(u64),
}

/// Result type alias for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
