//! SiYuan kernel HTTP client
//!
//! Implements [`HostBinding`] against the SiYuan REST API. Every JSON
//! endpoint answers with a `{code, msg, data}` envelope; a non-zero `code`
//! is surfaced as [`HostError::Api`]. File reads return the raw body.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::binding::{AssetPayload, HostBinding};
use crate::config::HostConfig;
use crate::embed::BlockRef;
use crate::error::{HostError, Result};
use blockdraw_scene::MIME_TYPE;

/// Attribute-read endpoint
const ATTRS_GET: &str = "/api/attr/getBlockAttrs";
/// Attribute-write endpoint
const ATTRS_SET: &str = "/api/attr/setBlockAttrs";
/// File-read endpoint
const FILE_GET: &str = "/api/file/getFile";
/// Asset-upload endpoint
const ASSET_UPLOAD: &str = "/api/asset/upload";

/// Primary attribute key holding the saved asset path
const ATTR_PRIMARY: &str = "data-assets";
/// Fallback key written/read for backward-compatible readers
const ATTR_FALLBACK: &str = "custom-data-assets";

/// Upload directory inside the host's data tree
const ASSETS_DIR: &str = "/assets/";

/// SiYuan API response envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// HTTP client for a SiYuan-compatible host
pub struct SiyuanClient {
    config: HostConfig,
    client: reqwest::Client,
}

impl SiyuanClient {
    /// Create a new client for the given host
    #[must_use]
    pub fn new(config: HostConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables (see [`HostConfig::from_env`])
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(HostConfig::from_env())
    }

    /// The configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(self.config.endpoint(path));
        if let Some(token) = &self.config.token {
            builder = builder.header("Authorization", format!("Token {token}"));
        }
        builder
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<reqwest::Response> {
        Ok(self.request(path).json(&body).send().await?)
    }

    /// Unwrap the `{code, msg, data}` envelope of a JSON endpoint
    async fn unwrap_envelope(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        let envelope: Envelope = serde_json::from_slice(&response.bytes().await?)?;
        if envelope.code != 0 {
            return Err(HostError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        Ok(envelope.data)
    }
}

/// Extract the asset path attribute, preferring the primary key
///
/// A key holding an empty string or a non-string value counts as unset, so
/// the fallback key is still consulted.
fn asset_attr(data: &Value) -> Option<String> {
    [ATTR_PRIMARY, ATTR_FALLBACK]
        .iter()
        .filter_map(|key| data.get(key).and_then(Value::as_str))
        .find(|path| !path.is_empty())
        .map(str::to_string)
}

/// Extract the stored path for `filename` from an upload response
fn stored_path(data: &Value, filename: &str) -> Option<String> {
    data.get("succMap")
        .and_then(|map| map.get(filename))
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl HostBinding for SiyuanClient {
    async fn fetch_asset_path(&self, block: &BlockRef) -> Result<Option<String>> {
        debug!(block = %block, "fetching block attributes");
        let response = self
            .post_json(ATTRS_GET, json!({ "id": block.as_str() }))
            .await?;
        let data = Self::unwrap_envelope(response).await?;
        Ok(asset_attr(&data))
    }

    async fn write_asset_path(&self, block: &BlockRef, asset_path: &str) -> Result<()> {
        debug!(block = %block, asset_path, "writing block attributes");
        let body = json!({
            "id": block.as_str(),
            "attrs": {
                ATTR_PRIMARY: asset_path,
                ATTR_FALLBACK: asset_path,
            },
        });
        let response = self.post_json(ATTRS_SET, body).await?;
        Self::unwrap_envelope(response).await?;
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        debug!(path, "reading host file");
        let response = self
            .post_json(FILE_GET, json!({ "path": format!("data/{path}") }))
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        let body = response.text().await?;

        // A missing file comes back as a 200 with the error envelope in
        // place of the file content.
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&body) {
            if envelope.code != 0 {
                return Err(HostError::Api {
                    code: envelope.code,
                    msg: envelope.msg,
                });
            }
        }
        Ok(body)
    }

    async fn upload_asset(&self, filename: &str, payload: AssetPayload) -> Result<String> {
        debug!(filename, "uploading asset");
        let bytes = payload.into_bytes()?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(MIME_TYPE)
            .map_err(|e| HostError::Decode(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("assetsDirPath", ASSETS_DIR)
            .part("file[]", part);

        let response = self.request(ASSET_UPLOAD).multipart(form).send().await?;
        let data = Self::unwrap_envelope(response).await?;
        stored_path(&data, filename).ok_or_else(|| HostError::UploadIncomplete {
            filename: filename.to_string(),
        })
    }

    async fn is_auth_required(&self) -> Result<bool> {
        let response = self.post_json(ATTRS_GET, json!({ "id": "" })).await?;
        Ok(response.status().as_u16() == 401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_attr_prefers_primary_key() {
        let data = json!({
            "data-assets": "assets/a.excalidraw",
            "custom-data-assets": "assets/old.excalidraw",
        });
        assert_eq!(asset_attr(&data).as_deref(), Some("assets/a.excalidraw"));
    }

    #[test]
    fn test_asset_attr_falls_back_to_custom_key() {
        let data = json!({ "custom-data-assets": "assets/old.excalidraw" });
        assert_eq!(asset_attr(&data).as_deref(), Some("assets/old.excalidraw"));
    }

    #[test]
    fn test_asset_attr_ignores_empty_values() {
        assert_eq!(asset_attr(&json!({ "data-assets": "" })), None);
        assert_eq!(asset_attr(&json!({ "updated": "20240101" })), None);
    }

    #[test]
    fn test_asset_attr_empty_primary_does_not_mask_fallback() {
        let data = json!({
            "data-assets": "",
            "custom-data-assets": "assets/old.excalidraw",
        });
        assert_eq!(asset_attr(&data).as_deref(), Some("assets/old.excalidraw"));

        let data = json!({
            "data-assets": null,
            "custom-data-assets": "assets/old.excalidraw",
        });
        assert_eq!(asset_attr(&data).as_deref(), Some("assets/old.excalidraw"));
    }

    #[test]
    fn test_stored_path_reads_succ_map() {
        let data = json!({
            "errFiles": [],
            "succMap": { "b.excalidraw": "assets/b-20240101.excalidraw" },
        });
        assert_eq!(
            stored_path(&data, "b.excalidraw").as_deref(),
            Some("assets/b-20240101.excalidraw")
        );
        assert_eq!(stored_path(&data, "missing.excalidraw"), None);
    }

    #[test]
    fn test_envelope_error_code() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"code":-1,"msg":"block not found","data":null}"#).unwrap();
        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.msg, "block not found");
    }

    #[test]
    fn test_client_construction() {
        let client = SiyuanClient::new(HostConfig::new("http://localhost:6806").with_token("t"));
        assert_eq!(client.config().token.as_deref(), Some("t"));
    }
}
