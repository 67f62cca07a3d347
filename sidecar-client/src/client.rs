//! `SidecarClient` - one handle over state, pub/sub and invocation.
//!
//! The mode is fixed at construction: in-memory clients get the local-only
//! strategies and an invoker without a sidecar leg; sidecar clients get the
//! remote strategies. All adapters built by one client share its mirror.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, ClientMode};
use crate::error::SidecarResult;
use crate::invoke::{InvokeOptions, ServiceInvoker};
use crate::mirror::{Mirror, PublishedEvent};
use crate::pubsub::{EventPublisher, LocalOnlyPublisher, RemotePublisher};
use crate::state::{LocalOnlyStore, RemoteBackedStore, StateStore};
use crate::transport::{Deadline, Transport, parse_base};

/// Handle to the sidecar runtime (or its in-memory stand-in)
#[derive(Clone)]
pub struct SidecarClient {
    mode: ClientMode,
    mirror: Arc<Mirror>,
    state: Arc<dyn StateStore>,
    publisher: Arc<dyn EventPublisher>,
    invoker: ServiceInvoker,
}

impl std::fmt::Debug for SidecarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidecarClient")
            .field("mode", &self.mode)
            .field("mirror", &self.mirror)
            .field("invoker", &self.invoker)
            .finish()
    }
}

impl SidecarClient {
    /// Build a client with a fresh mirror
    pub fn new(config: &ClientConfig) -> SidecarResult<Self> {
        Self::with_mirror(config, Arc::new(Mirror::new()))
    }

    /// Build a client on top of an existing mirror
    pub fn with_mirror(config: &ClientConfig, mirror: Arc<Mirror>) -> SidecarResult<Self> {
        let transport = Transport::new(config.timeout)?;

        let (state, publisher, sidecar) = match config.mode {
            ClientMode::InMemory => {
                let state: Arc<dyn StateStore> = Arc::new(LocalOnlyStore::new(mirror.clone()));
                let publisher: Arc<dyn EventPublisher> =
                    Arc::new(LocalOnlyPublisher::new(mirror.clone()));
                (state, publisher, None)
            }
            ClientMode::Sidecar => {
                let base = parse_base(&config.base_url)?;
                let state: Arc<dyn StateStore> = Arc::new(RemoteBackedStore::new(
                    transport.clone(),
                    base.clone(),
                    mirror.clone(),
                    config.write_policy,
                ));
                let publisher: Arc<dyn EventPublisher> = Arc::new(RemotePublisher::new(
                    transport.clone(),
                    base.clone(),
                    mirror.clone(),
                    config.write_policy,
                ));
                (state, publisher, Some(base))
            }
        };

        let invoker = ServiceInvoker::new(transport, sidecar, config.direct_urls.clone());

        tracing::info!(
            mode = ?config.mode,
            base_url = %config.base_url,
            write_policy = ?config.write_policy,
            "Sidecar client ready"
        );

        Ok(Self {
            mode: config.mode,
            mirror,
            state,
            publisher,
            invoker,
        })
    }

    /// In-memory client with no direct URLs configured
    pub fn in_memory() -> SidecarResult<Self> {
        Self::new(&ClientConfig::in_memory())
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    pub fn is_in_memory(&self) -> bool {
        self.mode == ClientMode::InMemory
    }

    /// The mirror shared by this client's adapters
    pub fn mirror(&self) -> &Arc<Mirror> {
        &self.mirror
    }

    pub fn state(&self) -> &dyn StateStore {
        self.state.as_ref()
    }

    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    pub fn invoker(&self) -> &ServiceInvoker {
        &self.invoker
    }

    // ========== State ==========

    /// Read and decode a state value
    pub async fn get_state<T: DeserializeOwned>(
        &self,
        store: &str,
        key: &str,
        deadline: Deadline,
    ) -> SidecarResult<Option<T>> {
        match self.state.get(store, key, deadline).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Encode and save a state value
    pub async fn save_state<T: Serialize + ?Sized>(
        &self,
        store: &str,
        key: &str,
        value: &T,
        deadline: Deadline,
    ) -> SidecarResult<()> {
        let value = serde_json::to_value(value)?;
        self.state.save(store, key, &value, deadline).await
    }

    pub async fn delete_state(
        &self,
        store: &str,
        key: &str,
        deadline: Deadline,
    ) -> SidecarResult<()> {
        self.state.delete(store, key, deadline).await
    }

    // ========== Pub/Sub ==========

    /// Encode and publish an event
    pub async fn publish_event<T: Serialize + ?Sized>(
        &self,
        pubsub_name: &str,
        topic: &str,
        payload: &T,
        deadline: Deadline,
    ) -> SidecarResult<()> {
        let payload = serde_json::to_value(payload)?;
        self.publisher
            .publish(pubsub_name, topic, &payload, deadline)
            .await
    }

    /// Publish log for `pubsub_name`, oldest first
    pub fn published_events(&self, pubsub_name: &str) -> Vec<PublishedEvent> {
        self.publisher.events(pubsub_name)
    }

    // ========== Invocation ==========

    pub async fn invoke(
        &self,
        app_id: &str,
        method_path: &str,
        options: &InvokeOptions,
    ) -> SidecarResult<Option<Value>> {
        self.invoker.invoke(app_id, method_path, options).await
    }

    /// Invoke and decode the response; `None` for an empty response
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        app_id: &str,
        method_path: &str,
        options: &InvokeOptions,
    ) -> SidecarResult<Option<T>> {
        match self.invoker.invoke(app_id, method_path, options).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
