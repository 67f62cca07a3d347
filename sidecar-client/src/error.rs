//! Client error types

use std::fmt;

use thiserror::Error;

/// Which leg of a call produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The sidecar HTTP API
    Sidecar,
    /// A service called directly, bypassing the sidecar
    Direct,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Sidecar => f.write_str("Sidecar"),
            Origin::Direct => f.write_str("Direct service"),
        }
    }
}

/// Sidecar client error type
#[derive(Debug, Error)]
pub enum SidecarError {
    /// A response arrived with a non-2xx status
    #[error("{origin} request failed: {status} {body}")]
    Remote {
        origin: Origin,
        status: u16,
        body: String,
    },

    /// Invocation had no sidecar and no direct URL to fall back to
    #[error("No fallback URL configured for appId \"{app_id}\"")]
    Unavailable { app_id: String },

    /// Response body (or outgoing value) was not valid JSON
    #[error("Serialization error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No response was received
    ///
    /// Only surfaced on the direct invocation leg, or for writes when the
    /// client runs with [`WritePolicy::MustAcknowledge`](crate::WritePolicy).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Invalid configuration or request construction
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SidecarError {
    /// HTTP status carried by a [`SidecarError::Remote`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            SidecarError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the remote side answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for sidecar operations
pub type SidecarResult<T> = Result<T, SidecarError>;
