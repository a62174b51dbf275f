//! Drawing Document Types
//!
//! This module defines the in-memory drawing document: a list of drawing
//! elements, an application-state record (view settings, current style
//! defaults), and a map of embedded binary files keyed by file id.
//!
//! Element and app-state records deliberately type only the fields this
//! crate inspects; everything else the drawing engine emits is retained
//! verbatim through `#[serde(flatten)]` so documents round-trip losslessly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// File extension of a serialized drawing document
pub const FILE_EXTENSION: &str = "excalidraw";

/// MIME type of a serialized drawing document
pub const MIME_TYPE: &str = "application/vnd.excalidraw+json";

/// Background color of a fresh document
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Default font family for a fresh document (Nunito)
pub const FONT_FAMILY_NUNITO: u64 = 6;

/// Default roughness for a fresh document (architect)
pub const ROUGHNESS_ARCHITECT: u64 = 0;

/// Default stroke width for a fresh document
pub const DEFAULT_STROKE_WIDTH: u64 = 1;

/// Default arrow type for a fresh document
pub const ARROW_TYPE_ROUND: &str = "round";

/// A single drawing element
///
/// Only identity, deletion state, links, and file references are typed;
/// geometry and styling pass through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique element id
    pub id: String,

    /// Element kind (rectangle, arrow, image, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Soft-deletion flag; deleted elements are dropped on serialize
    #[serde(rename = "isDeleted", default)]
    pub is_deleted: bool,

    /// Optional hyperlink attached to the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Embedded file reference (image elements)
    #[serde(rename = "fileId", default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    /// Remaining engine-owned fields, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Element {
    /// Create a new element of the given kind
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            is_deleted: false,
            link: None,
            file_id: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach a hyperlink
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Reference an embedded file
    #[must_use]
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// Mark the element as deleted
    #[must_use]
    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }
}

/// Application state persisted alongside the elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Canvas background color
    #[serde(rename = "viewBackgroundColor", default = "default_background")]
    pub view_background_color: String,

    /// Style default: font family
    #[serde(rename = "currentItemFontFamily", default = "default_font_family")]
    pub current_item_font_family: u64,

    /// Style default: roughness
    #[serde(rename = "currentItemRoughness", default = "default_roughness")]
    pub current_item_roughness: u64,

    /// Style default: stroke width
    #[serde(rename = "currentItemStrokeWidth", default = "default_stroke_width")]
    pub current_item_stroke_width: u64,

    /// Style default: arrow type
    #[serde(rename = "currentItemArrowType", default = "default_arrow_type")]
    pub current_item_arrow_type: String,

    /// Remaining engine-owned fields, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_font_family() -> u64 {
    FONT_FAMILY_NUNITO
}

fn default_roughness() -> u64 {
    ROUGHNESS_ARCHITECT
}

fn default_stroke_width() -> u64 {
    DEFAULT_STROKE_WIDTH
}

fn default_arrow_type() -> String {
    ARROW_TYPE_ROUND.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view_background_color: default_background(),
            current_item_font_family: default_font_family(),
            current_item_roughness: default_roughness(),
            current_item_stroke_width: default_stroke_width(),
            current_item_arrow_type: default_arrow_type(),
            extra: BTreeMap::new(),
        }
    }
}

/// An embedded binary file (image data) keyed by file id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryFileData {
    /// File id, matching `Element::file_id` references
    pub id: String,

    /// MIME type of the embedded data
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Data URL carrying the binary content
    #[serde(rename = "dataURL")]
    pub data_url: String,

    /// Creation timestamp (epoch milliseconds)
    #[serde(default)]
    pub created: i64,
}

/// A complete drawing document: elements + app state + embedded files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDocument {
    /// Ordered drawing elements
    pub elements: Vec<Element>,

    /// View settings and current style defaults
    pub app_state: AppState,

    /// Embedded binary files by file id
    pub files: BTreeMap<String, BinaryFileData>,
}

impl SceneDocument {
    /// Create an empty document with fresh-canvas defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element to the document
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Embed a binary file
    pub fn add_file(&mut self, file: BinaryFileData) {
        self.files.insert(file.id.clone(), file);
    }

    /// True when the document has no live elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_elements().next().is_none()
    }

    /// Elements that have not been soft-deleted
    pub fn live_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_deleted)
    }

    /// File ids still referenced by live elements
    #[must_use]
    pub fn referenced_file_ids(&self) -> Vec<&str> {
        self.live_elements()
            .filter_map(|e| e.file_id.as_deref())
            .collect()
    }
}
