//! Service invocation with direct-URL fallback.
//!
//! A call first goes through the sidecar's invoke API. When the sidecar
//! leg is disabled (in-memory mode) or produced no response at all, the
//! same request is sent straight to the target service. HTTP error
//! statuses are never retried on the other leg.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Method, Url};
use serde_json::Value;

use crate::config::normalize_app_id;
use crate::error::{Origin, SidecarError, SidecarResult};
use crate::transport::{Attempt, Deadline, Transport, json_headers};

/// Options for a single invocation
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Query pairs in order; `None` values are left out
    pub query: Vec<(String, Option<String>)>,
    /// Direct base URL; wins over any configured URL for the app
    pub fallback_url: Option<String>,
    pub deadline: Deadline,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
            fallback_url: None,
            deadline: Deadline::Default,
        }
    }
}

impl InvokeOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self::default().with_method(Method::POST).with_body(body)
    }

    pub fn put(body: Value) -> Self {
        Self::default().with_method(Method::PUT).with_body(body)
    }

    pub fn patch(body: Value) -> Self {
        Self::default().with_method(Method::PATCH).with_body(body)
    }

    pub fn delete() -> Self {
        Self::default().with_method(Method::DELETE)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.query.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    fn present_query(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }
}

/// Calls methods on other services by app id
#[derive(Debug, Clone)]
pub struct ServiceInvoker {
    transport: Transport,
    /// Sidecar base URL; `None` disables the sidecar leg
    sidecar: Option<Url>,
    /// Direct URLs keyed by normalized app id
    direct_urls: Arc<HashMap<String, String>>,
}

impl ServiceInvoker {
    pub(crate) fn new(
        transport: Transport,
        sidecar: Option<Url>,
        direct_urls: HashMap<String, String>,
    ) -> Self {
        Self {
            transport,
            sidecar,
            direct_urls: Arc::new(direct_urls),
        }
    }

    /// Whether calls try the sidecar first
    pub fn uses_sidecar(&self) -> bool {
        self.sidecar.is_some()
    }

    /// Invoke `method_path` on `app_id`
    ///
    /// Returns `None` for 204 or an empty body.
    pub async fn invoke(
        &self,
        app_id: &str,
        method_path: &str,
        options: &InvokeOptions,
    ) -> SidecarResult<Option<Value>> {
        let path = method_path.strip_prefix('/').unwrap_or(method_path);

        if let Some(base) = &self.sidecar {
            let url = with_query(
                &format!("{}/v1.0/invoke/{}/method/{}", base_str(base), app_id, path),
                options,
            )?;
            tracing::debug!(app_id, path, method = %options.method, "Invoke via sidecar");

            match self.send(Origin::Sidecar, url, options).await? {
                Attempt::Delivered(body) => return Attempt::decode(body),
                Attempt::Unreachable(e) => {
                    tracing::warn!(app_id, error = %e, "Sidecar unreachable, calling service directly");
                }
            }
        }

        let direct_base = self.resolve_direct(app_id, options)?;
        let url = with_query(
            &format!("{}/{}", direct_base.trim_end_matches('/'), path),
            options,
        )?;
        tracing::debug!(app_id, path, method = %options.method, "Invoke directly");

        match self.send(Origin::Direct, url, options).await? {
            Attempt::Delivered(body) => Attempt::decode(body),
            Attempt::Unreachable(e) => Err(SidecarError::Network(e)),
        }
    }

    /// `fallback_url` option first, then the configured URL for the app
    fn resolve_direct<'a>(
        &'a self,
        app_id: &str,
        options: &'a InvokeOptions,
    ) -> SidecarResult<&'a str> {
        options
            .fallback_url
            .as_deref()
            .or_else(|| {
                self.direct_urls
                    .get(&normalize_app_id(app_id))
                    .map(String::as_str)
            })
            .ok_or_else(|| SidecarError::Unavailable {
                app_id: app_id.to_string(),
            })
    }

    async fn send(
        &self,
        origin: Origin,
        url: Url,
        options: &InvokeOptions,
    ) -> SidecarResult<Attempt> {
        let mut request = self
            .transport
            .request(options.method.clone(), url)
            .headers(json_headers(&options.headers)?);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }
        self.transport
            .execute(origin, request, options.deadline)
            .await
    }
}

fn base_str(base: &Url) -> &str {
    base.as_str().trim_end_matches('/')
}

fn with_query(raw: &str, options: &InvokeOptions) -> SidecarResult<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| SidecarError::Config(format!("Invalid URL {}: {}", raw, e)))?;
    let mut pairs = options.present_query().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}
