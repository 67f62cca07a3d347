//! HTTP plumbing shared by the remote adapters.
//!
//! Every request ends in one of three ways: a 2xx response (body or not),
//! a non-2xx response which becomes [`SidecarError::Remote`], or no response
//! at all. The last one is handed back as [`Attempt::Unreachable`] so each
//! adapter can apply its own local fallback.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use crate::config::WritePolicy;
use crate::error::{Origin, SidecarError, SidecarResult};

/// Per-call deadline for remote requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deadline {
    /// Use the client's configured timeout
    #[default]
    Default,
    /// Give up after this long
    After(Duration),
}

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Deadline::After(duration)
    }

    pub(crate) fn resolve(self, fallback: Duration) -> Duration {
        match self {
            Deadline::Default => fallback,
            Deadline::After(duration) => duration,
        }
    }
}

/// Outcome of a request that did not fail with an HTTP error status
#[derive(Debug)]
pub(crate) enum Attempt {
    /// 2xx; `None` for 204 or an empty body
    Delivered(Option<String>),
    /// No (complete) response was received
    Unreachable(reqwest::Error),
}

impl Attempt {
    /// Decode a delivered body as JSON
    pub(crate) fn decode(body: Option<String>) -> SidecarResult<Option<Value>> {
        match body {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

/// Thin wrapper over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    default_timeout: Duration,
}

impl Transport {
    pub(crate) fn new(default_timeout: Duration) -> SidecarResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SidecarError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            default_timeout,
        })
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send `request`, classifying the result
    pub(crate) async fn execute(
        &self,
        origin: Origin,
        request: RequestBuilder,
        deadline: Deadline,
    ) -> SidecarResult<Attempt> {
        let request = request.timeout(deadline.resolve(self.default_timeout));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return Err(SidecarError::Config(format!("Invalid request: {}", e)));
            }
            Err(e) => return Ok(Attempt::Unreachable(e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SidecarError::Remote {
                origin,
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Attempt::Delivered(None));
        }

        match response.text().await {
            Ok(text) if text.is_empty() => Ok(Attempt::Delivered(None)),
            Ok(text) => Ok(Attempt::Delivered(Some(text))),
            Err(e) => Ok(Attempt::Unreachable(e)),
        }
    }
}

/// Apply the write policy to the outcome of a state write or publish
pub(crate) fn settle_write(
    policy: WritePolicy,
    attempt: Attempt,
    operation: &str,
    resource: &str,
) -> SidecarResult<()> {
    match attempt {
        Attempt::Delivered(_) => Ok(()),
        Attempt::Unreachable(e) => match policy {
            WritePolicy::FireAndForget => {
                tracing::warn!(
                    operation,
                    resource,
                    error = %e,
                    "Sidecar unreachable, keeping local copy only"
                );
                Ok(())
            }
            WritePolicy::MustAcknowledge => Err(SidecarError::Network(e)),
        },
    }
}

/// JSON content type plus caller headers; caller headers win
pub(crate) fn json_headers(extra: &[(String, String)]) -> SidecarResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SidecarError::Config(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SidecarError::Config(format!("Invalid header value: {}", e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Parse a base URL, trimming any trailing slash
pub(crate) fn parse_base(base: &str) -> SidecarResult<Url> {
    Url::parse(base.trim_end_matches('/'))
        .map_err(|e| SidecarError::Config(format!("Invalid base URL {}: {}", base, e)))
}

/// `{base}/{segments...}`, each segment percent-encoded
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> SidecarResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SidecarError::Config(format!("URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
