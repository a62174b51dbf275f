//! Block reference resolution
//!
//! A drawing is embedded at one location in a host document, identified by
//! an opaque block id. The embedding context carries the id either in the
//! frame's query string (`?id=...`) or as a `data-node-id` attribute on an
//! ancestor of the embedding frame. The context is passed in explicitly by
//! whoever constructs the shell; this crate never inspects a live DOM.

use std::collections::HashMap;
use std::fmt;

use blockdraw_scene::FILE_EXTENSION;

/// Query parameter carrying the block id
pub const QUERY_PARAM: &str = "id";

/// Ancestor attribute carrying the block id
pub const ANCESTOR_ATTR: &str = "data-node-id";

/// Opaque identifier of the host document location embedding the drawing
///
/// Immutable for the lifetime of an embedding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockRef(String);

impl BlockRef {
    /// Wrap a raw block id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw block id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic filename for this block's saved drawing
    #[must_use]
    pub fn asset_filename(&self) -> String {
        format!("{}.{}", self.0, FILE_EXTENSION)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Embedding context from which a block reference is resolved
///
/// Holds the frame's query string, any ancestor attributes the embedder
/// chose to expose, and the embedding page's origin (used to classify links
/// as internal).
#[derive(Debug, Clone, Default)]
pub struct EmbedContext {
    query: Option<String>,
    ancestor_attrs: HashMap<String, String>,
    origin: Option<String>,
}

impl EmbedContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame's query string (with or without the leading `?`)
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Expose an ancestor DOM attribute
    #[must_use]
    pub fn with_ancestor_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.ancestor_attrs.insert(name.into(), value.into());
        self
    }

    /// Set the embedding page's origin
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// The embedding page's origin, if known
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Resolve the block reference
    ///
    /// Checks the query parameter first, then the ancestor attribute.
    /// Returns `None` when neither source yields a non-empty value.
    #[must_use]
    pub fn resolve_block_ref(&self) -> Option<BlockRef> {
        self.from_query().or_else(|| self.from_ancestor())
    }

    fn from_query(&self) -> Option<BlockRef> {
        let query = self.query.as_deref()?.trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, value)| key == QUERY_PARAM && !value.is_empty())
            .map(|(_, value)| BlockRef::new(value.into_owned()))
    }

    fn from_ancestor(&self) -> Option<BlockRef> {
        self.ancestor_attrs
            .get(ANCESTOR_ATTR)
            .filter(|v| !v.is_empty())
            .map(BlockRef::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_query() {
        let ctx = EmbedContext::new().with_query("?id=20240101-abcdef&theme=light");
        assert_eq!(
            ctx.resolve_block_ref(),
            Some(BlockRef::new("20240101-abcdef"))
        );
    }

    #[test]
    fn test_query_takes_precedence_over_ancestor() {
        let ctx = EmbedContext::new()
            .with_query("id=from-query")
            .with_ancestor_attr(ANCESTOR_ATTR, "from-dom");
        assert_eq!(ctx.resolve_block_ref(), Some(BlockRef::new("from-query")));
    }

    #[test]
    fn test_falls_back_to_ancestor_attr() {
        let ctx = EmbedContext::new()
            .with_query("theme=dark")
            .with_ancestor_attr(ANCESTOR_ATTR, "from-dom");
        assert_eq!(ctx.resolve_block_ref(), Some(BlockRef::new("from-dom")));
    }

    #[test]
    fn test_empty_values_do_not_resolve() {
        let ctx = EmbedContext::new()
            .with_query("id=")
            .with_ancestor_attr(ANCESTOR_ATTR, "");
        assert_eq!(ctx.resolve_block_ref(), None);
        assert_eq!(EmbedContext::new().resolve_block_ref(), None);
    }

    #[test]
    fn test_asset_filename() {
        let block = BlockRef::new("20240101-abcdef");
        assert_eq!(block.asset_filename(), "20240101-abcdef.excalidraw");
    }

    #[test]
    fn test_query_decodes_percent_encoding() {
        let ctx = EmbedContext::new().with_query("id=a%2Db");
        assert_eq!(ctx.resolve_block_ref(), Some(BlockRef::new("a-b")));
    }
}
