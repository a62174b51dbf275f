//! Error types for blockdraw-host

use thiserror::Error;

/// Host binding error
#[derive(Debug, Error)]
pub enum HostError {
    /// Transport-level failure (connection, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Host answered with a non-success HTTP status
    #[error("host returned status {0}")]
    Status(u16),

    /// Host answered 2xx but the API envelope carries an error code
    #[error("host api error {code}: {msg}")]
    Api {
        /// Envelope error code (non-zero)
        code: i64,
        /// Envelope error message
        msg: String,
    },

    /// Upload succeeded but the response omits a stored path for the file
    #[error("upload response missing stored path for {filename}")]
    UploadIncomplete {
        /// Filename that was uploaded
        filename: String,
    },

    /// Response body or payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// No block reference could be resolved from the embedding context
    #[error("no block reference available")]
    MissingBlockRef,
}

impl HostError {
    /// True when the failure signals that host authorization is enabled
    #[must_use]
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::Status(401))
    }
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for HostError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for host operations
pub type Result<T> = std::result::Result<T, HostError>;
