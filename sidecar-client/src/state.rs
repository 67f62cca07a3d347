//! Key-value state adapter.
//!
//! Two strategies behind [`StateStore`], picked once when the client is
//! built:
//!
//! - [`LocalOnlyStore`]: the mirror is the store.
//! - [`RemoteBackedStore`]: the sidecar is the store; the mirror remembers
//!   every value read or written and answers reads while the sidecar is
//!   unreachable.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use crate::config::WritePolicy;
use crate::error::{Origin, SidecarResult};
use crate::mirror::Mirror;
use crate::transport::{Attempt, Deadline, Transport, join_segments, settle_write};

/// Key-value access by `(store, key)`
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current value, `None` if absent
    async fn get(&self, store: &str, key: &str, deadline: Deadline)
    -> SidecarResult<Option<Value>>;

    /// Create or overwrite a value
    async fn save(
        &self,
        store: &str,
        key: &str,
        value: &Value,
        deadline: Deadline,
    ) -> SidecarResult<()>;

    /// Remove a value; absent keys are not an error
    async fn delete(&self, store: &str, key: &str, deadline: Deadline) -> SidecarResult<()>;
}

// ============================================================================
// LocalOnlyStore
// ============================================================================

/// State kept only in the mirror
#[derive(Debug, Clone)]
pub struct LocalOnlyStore {
    mirror: Arc<Mirror>,
}

impl LocalOnlyStore {
    pub fn new(mirror: Arc<Mirror>) -> Self {
        Self { mirror }
    }
}

#[async_trait]
impl StateStore for LocalOnlyStore {
    async fn get(
        &self,
        store: &str,
        key: &str,
        _deadline: Deadline,
    ) -> SidecarResult<Option<Value>> {
        Ok(self.mirror.recall(store, key))
    }

    async fn save(
        &self,
        store: &str,
        key: &str,
        value: &Value,
        _deadline: Deadline,
    ) -> SidecarResult<()> {
        self.mirror.remember(store, key, value.clone());
        Ok(())
    }

    async fn delete(&self, store: &str, key: &str, _deadline: Deadline) -> SidecarResult<()> {
        self.mirror.forget(store, key);
        Ok(())
    }
}

// ============================================================================
// RemoteBackedStore
// ============================================================================

#[derive(Serialize)]
struct StateItem<'a> {
    key: &'a str,
    value: &'a Value,
}

/// State held by the sidecar, mirrored locally
#[derive(Debug, Clone)]
pub struct RemoteBackedStore {
    transport: Transport,
    base: Url,
    mirror: Arc<Mirror>,
    policy: WritePolicy,
}

impl RemoteBackedStore {
    pub(crate) fn new(
        transport: Transport,
        base: Url,
        mirror: Arc<Mirror>,
        policy: WritePolicy,
    ) -> Self {
        Self {
            transport,
            base,
            mirror,
            policy,
        }
    }

    fn store_url(&self, store: &str) -> SidecarResult<Url> {
        join_segments(&self.base, &["v1.0", "state", store])
    }

    fn key_url(&self, store: &str, key: &str) -> SidecarResult<Url> {
        join_segments(&self.base, &["v1.0", "state", store, key])
    }
}

#[async_trait]
impl StateStore for RemoteBackedStore {
    async fn get(
        &self,
        store: &str,
        key: &str,
        deadline: Deadline,
    ) -> SidecarResult<Option<Value>> {
        let url = self.key_url(store, key)?;
        tracing::debug!(store, key, "GET state");

        let request = self.transport.request(Method::GET, url);
        match self
            .transport
            .execute(Origin::Sidecar, request, deadline)
            .await?
        {
            Attempt::Delivered(body) => {
                let value = Attempt::decode(body)?;
                if let Some(value) = &value {
                    self.mirror.remember(store, key, value.clone());
                }
                Ok(value)
            }
            Attempt::Unreachable(e) => {
                tracing::warn!(store, key, error = %e, "Sidecar unreachable, reading mirror");
                Ok(self.mirror.recall(store, key))
            }
        }
    }

    async fn save(
        &self,
        store: &str,
        key: &str,
        value: &Value,
        deadline: Deadline,
    ) -> SidecarResult<()> {
        self.mirror.remember(store, key, value.clone());

        let url = self.store_url(store)?;
        tracing::debug!(store, key, "POST state");

        let request = self
            .transport
            .request(Method::POST, url)
            .json(&[StateItem { key, value }]);
        let attempt = self
            .transport
            .execute(Origin::Sidecar, request, deadline)
            .await?;
        settle_write(self.policy, attempt, "save_state", store)
    }

    async fn delete(&self, store: &str, key: &str, deadline: Deadline) -> SidecarResult<()> {
        self.mirror.forget(store, key);

        let url = self.key_url(store, key)?;
        tracing::debug!(store, key, "DELETE state");

        let request = self.transport.request(Method::DELETE, url);
        let attempt = self
            .transport
            .execute(Origin::Sidecar, request, deadline)
            .await?;
        settle_write(self.policy, attempt, "delete_state", store)
    }
}
