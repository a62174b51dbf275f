//! Blockdraw Scene - Drawing Document Model
//!
//! This crate provides the serializable drawing document for Blockdraw:
//! - Document: elements, app state, and embedded binary files
//! - Format: the `.excalidraw` JSON wire format (serialize/parse/normalize)
//! - Error: distinct errors for the ways stored content can be corrupt
//!
//! The document is engine-agnostic: fields this crate does not inspect are
//! preserved verbatim, so a document owned by any compatible drawing engine
//! round-trips losslessly through persistence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod format;

// Re-export main types
pub use document::{
    AppState, BinaryFileData, Element, SceneDocument, ARROW_TYPE_ROUND, DEFAULT_BACKGROUND,
    DEFAULT_STROKE_WIDTH, FILE_EXTENSION, FONT_FAMILY_NUNITO, MIME_TYPE, ROUGHNESS_ARCHITECT,
};
pub use error::{Result, SceneError};
pub use format::{parse_document, serialize_document, SCENE_SOURCE, SCENE_TYPE, SCENE_VERSION};
