//! The `.excalidraw` wire format
//!
//! A serialized drawing is a single JSON object:
//!
//! ```json
//! { "type": "excalidraw", "version": 2, "source": "...",
//!   "elements": [...], "appState": {...}, "files": {...} }
//! ```
//!
//! Serialization drops soft-deleted elements and prunes embedded files no
//! live element references. Parsing normalizes missing app-state fields to
//! the fresh-canvas defaults, so `parse(serialize(d))` returns `d` modulo
//! that normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::document::{AppState, BinaryFileData, Element, SceneDocument};
use crate::error::{Result, SceneError};

/// Value of the `type` tag identifying a drawing scene
pub const SCENE_TYPE: &str = "excalidraw";

/// Highest scene file version this crate understands
pub const SCENE_VERSION: u64 = 2;

/// `source` tag written into serialized scenes
pub const SCENE_SOURCE: &str = "blockdraw";

/// On-disk representation of a drawing document
#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    #[serde(rename = "type")]
    kind: String,
    version: u64,
    #[serde(default)]
    source: String,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(rename = "appState", default)]
    app_state: AppState,
    #[serde(default)]
    files: BTreeMap<String, BinaryFileData>,
}

/// Serialize a document to its JSON wire form
///
/// Soft-deleted elements are dropped and unreferenced embedded files pruned.
pub fn serialize_document(doc: &SceneDocument) -> Result<String> {
    let elements: Vec<Element> = doc.live_elements().cloned().collect();
    let referenced: BTreeSet<&str> = elements.iter().filter_map(|e| e.file_id.as_deref()).collect();
    let files: BTreeMap<String, BinaryFileData> = doc
        .files
        .iter()
        .filter(|(id, _)| referenced.contains(id.as_str()))
        .map(|(id, file)| (id.clone(), file.clone()))
        .collect();

    let file = SceneFile {
        kind: SCENE_TYPE.to_string(),
        version: SCENE_VERSION,
        source: SCENE_SOURCE.to_string(),
        elements,
        app_state: doc.app_state.clone(),
        files,
    };

    Ok(serde_json::to_string(&file)?)
}

/// Parse a serialized drawing document
///
/// Rejects non-JSON content, JSON without the scene `type` tag, and versions
/// newer than [`SCENE_VERSION`], each with a distinct error. Missing
/// app-state fields are normalized to the fresh-canvas defaults.
pub fn parse_document(content: &str) -> Result<SceneDocument> {
    let value: Value = serde_json::from_str(content)?;

    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    if kind != SCENE_TYPE {
        return Err(SceneError::NotAScene(kind.to_string()));
    }

    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(SCENE_VERSION);
    if version > SCENE_VERSION {
        return Err(SceneError::UnsupportedVersion(version));
    }

    let file: SceneFile = serde_json::from_value(value)?;
    Ok(SceneDocument {
        elements: file.elements,
        app_state: file.app_state,
        files: file.files,
    })
}
