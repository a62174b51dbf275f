//! Blockdraw Host - SiYuan Host Binding
//!
//! This crate binds Blockdraw to a SiYuan-compatible note-taking host:
//! - Embed: block reference resolution from the embedding context
//! - Binding: the `HostBinding` trait the sync layer programs against
//! - Client: `SiyuanClient`, the reqwest implementation of the binding
//! - Config: host URL, API token, timeouts
//! - Error: host error taxonomy (network, status, API envelope, upload)
//!
//! Persistence model: the serialized drawing is uploaded as an asset file
//! named after the block reference, and the stored path is written into the
//! block's attributes under `data-assets` (plus a backward-compatible
//! fallback key).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod binding;
pub mod client;
pub mod config;
pub mod embed;
pub mod error;

// Re-export main types
pub use binding::{AssetPayload, HostBinding};
pub use client::SiyuanClient;
pub use config::HostConfig;
pub use embed::{BlockRef, EmbedContext, ANCESTOR_ATTR, QUERY_PARAM};
pub use error::{HostError, Result};
