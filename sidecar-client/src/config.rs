//! Client configuration

use std::collections::HashMap;
use std::time::Duration;

/// Prefix of environment variables naming a direct URL per app id
pub const DIRECT_URL_ENV_PREFIX: &str = "DIRECT_SERVICE_URL_";

/// Where state and events live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientMode {
    /// Talk to the sidecar over HTTP, mirroring everything locally
    #[default]
    Sidecar,
    /// Never contact the sidecar; the local mirror is the whole store
    InMemory,
}

/// What a write does when the sidecar cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Keep the mirror update and report success
    #[default]
    FireAndForget,
    /// Keep the mirror update but return the network error to the caller
    MustAcknowledge,
}

impl WritePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fire-and-forget" | "fire_and_forget" => Some(WritePolicy::FireAndForget),
            "must-acknowledge" | "must_acknowledge" => Some(WritePolicy::MustAcknowledge),
            _ => None,
        }
    }
}

/// Client configuration for reaching the sidecar
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DAPR_HTTP_HOST | http://127.0.0.1 | Sidecar host |
/// | DAPR_HTTP_PORT | 3500 | Sidecar HTTP port |
/// | USE_IN_MEMORY_DAPR | false | `true` selects [`ClientMode::InMemory`] |
/// | SIDECAR_WRITE_POLICY | fire-and-forget | See [`WritePolicy`] |
/// | SIDECAR_TIMEOUT_MS | 30000 | Default per-request deadline |
/// | DIRECT_SERVICE_URL_<APP_ID> | - | Direct URL used when invocation bypasses the sidecar |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Sidecar base URL (e.g., "http://127.0.0.1:3500")
    pub base_url: String,

    /// Remote or in-memory operation
    pub mode: ClientMode,

    /// Behaviour of writes when the sidecar is unreachable
    pub write_policy: WritePolicy,

    /// Request timeout used by [`Deadline::Default`](crate::Deadline)
    pub timeout: Duration,

    /// Direct service URLs keyed by normalized app id
    pub direct_urls: HashMap<String, String>,
}

impl ClientConfig {
    /// Create a configuration talking to the sidecar at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            mode: ClientMode::Sidecar,
            write_policy: WritePolicy::FireAndForget,
            timeout: Duration::from_secs(30),
            direct_urls: HashMap::new(),
        }
    }

    /// Configuration that never contacts the sidecar
    pub fn in_memory() -> Self {
        Self::default().with_mode(ClientMode::InMemory)
    }

    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();

        let host = vars
            .get("DAPR_HTTP_HOST")
            .cloned()
            .unwrap_or_else(|| "http://127.0.0.1".into());
        let port = vars
            .get("DAPR_HTTP_PORT")
            .cloned()
            .unwrap_or_else(|| "3500".into());

        let mut config = Self::new(format!("{}:{}", host.trim_end_matches('/'), port));

        if vars.get("USE_IN_MEMORY_DAPR").map(String::as_str) == Some("true") {
            config.mode = ClientMode::InMemory;
        }
        if let Some(policy) = vars
            .get("SIDECAR_WRITE_POLICY")
            .and_then(|v| WritePolicy::parse(v))
        {
            config.write_policy = policy;
        }
        if let Some(ms) = vars
            .get("SIDECAR_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }

        for (name, url) in &vars {
            if let Some(suffix) = name.strip_prefix(DIRECT_URL_ENV_PREFIX)
                && !suffix.is_empty()
                && !url.is_empty()
            {
                config.direct_urls.insert(suffix.to_string(), url.clone());
            }
        }

        config
    }

    /// Set the client mode
    pub fn with_mode(mut self, mode: ClientMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the write policy
    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Set the default request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a direct URL for an app id
    pub fn with_direct_url(mut self, app_id: &str, url: impl Into<String>) -> Self {
        self.direct_urls.insert(normalize_app_id(app_id), url.into());
        self
    }

    /// Configured direct URL for an app id, if any
    pub fn direct_url(&self, app_id: &str) -> Option<&str> {
        self.direct_urls
            .get(&normalize_app_id(app_id))
            .map(String::as_str)
    }

    /// Whether the sidecar is bypassed entirely
    pub fn is_in_memory(&self) -> bool {
        self.mode == ClientMode::InMemory
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:3500")
    }
}

/// `catalog-service` -> `CATALOG_SERVICE`
pub fn normalize_app_id(app_id: &str) -> String {
    app_id.replace('-', "_").to_uppercase()
}
