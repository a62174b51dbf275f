//! Host binding contract
//!
//! The sync layer talks to the host exclusively through [`HostBinding`],
//! keeping the wire client swappable in tests.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::embed::BlockRef;
use crate::error::Result;

/// Content handed to an asset upload
#[derive(Debug, Clone)]
pub enum AssetPayload {
    /// UTF-8 text uploaded as-is
    Text(String),
    /// Base64-encoded bytes, decoded before upload
    Base64(String),
}

impl AssetPayload {
    /// Raw bytes to put on the wire
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Base64(encoded) => Ok(BASE64.decode(encoded.as_bytes())?),
        }
    }
}

/// The four host persistence calls plus the authorization probe
#[async_trait]
pub trait HostBinding: Send + Sync {
    /// Read the saved asset path from the block's attributes, if any
    async fn fetch_asset_path(&self, block: &BlockRef) -> Result<Option<String>>;

    /// Write the asset path into the block's attributes
    async fn write_asset_path(&self, block: &BlockRef, asset_path: &str) -> Result<()>;

    /// Fetch raw file content at a host-relative path
    async fn read_file(&self, path: &str) -> Result<String>;

    /// Upload an asset; returns the host-assigned stored path
    async fn upload_asset(&self, filename: &str, payload: AssetPayload) -> Result<String>;

    /// Probe whether the host requires authorization
    async fn is_auth_required(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_payload_bytes() {
        let bytes = AssetPayload::Text("{\"a\":1}".to_string())
            .into_bytes()
            .unwrap();
        assert_eq!(bytes, b"{\"a\":1}");
    }

    #[test]
    fn test_base64_payload_decodes() {
        let bytes = AssetPayload::Base64("aGVsbG8=".to_string())
            .into_bytes()
            .unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_base64_payload_rejects_garbage() {
        assert!(AssetPayload::Base64("!!not base64!!".to_string())
            .into_bytes()
            .is_err());
    }
}
