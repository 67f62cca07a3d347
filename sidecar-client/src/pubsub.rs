//! Event publishing.
//!
//! Every publish is appended to the mirror's event log first, whatever the
//! mode, so tests and diagnostics can inspect what was sent.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;

use crate::config::WritePolicy;
use crate::error::{Origin, SidecarResult};
use crate::mirror::{Mirror, PublishedEvent};
use crate::transport::{Deadline, Transport, join_segments, settle_write};

/// Publish/subscribe bus access
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` on `topic`
    async fn publish(
        &self,
        pubsub_name: &str,
        topic: &str,
        payload: &Value,
        deadline: Deadline,
    ) -> SidecarResult<()>;

    /// Everything published to `pubsub_name` by this process, oldest first
    fn events(&self, pubsub_name: &str) -> Vec<PublishedEvent>;
}

/// Publisher that only records to the local log
#[derive(Debug, Clone)]
pub struct LocalOnlyPublisher {
    mirror: Arc<Mirror>,
}

impl LocalOnlyPublisher {
    pub fn new(mirror: Arc<Mirror>) -> Self {
        Self { mirror }
    }
}

#[async_trait]
impl EventPublisher for LocalOnlyPublisher {
    async fn publish(
        &self,
        pubsub_name: &str,
        topic: &str,
        payload: &Value,
        _deadline: Deadline,
    ) -> SidecarResult<()> {
        self.mirror.record_event(pubsub_name, topic, payload.clone());
        Ok(())
    }

    fn events(&self, pubsub_name: &str) -> Vec<PublishedEvent> {
        self.mirror.events(pubsub_name)
    }
}

/// Publisher that records locally and posts to the sidecar
#[derive(Debug, Clone)]
pub struct RemotePublisher {
    transport: Transport,
    base: Url,
    mirror: Arc<Mirror>,
    policy: WritePolicy,
}

impl RemotePublisher {
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
}

#[async_trait]
impl EventPublisher for RemotePublisher {
    async fn publish(
        &self,
        pubsub_name: &str,
        topic: &str,
        payload: &Value,
        deadline: Deadline,
    ) -> SidecarResult<()> {
        self.mirror.record_event(pubsub_name, topic, payload.clone());

        let url = join_segments(&self.base, &["v1.0", "publish", pubsub_name, topic])?;
        tracing::debug!(pubsub_name, topic, "POST publish");

        let request = self.transport.request(Method::POST, url).json(payload);
        let attempt = self
            .transport
            .execute(Origin::Sidecar, request, deadline)
            .await?;
        settle_write(self.policy, attempt, "publish", topic)
    }

    fn events(&self, pubsub_name: &str) -> Vec<PublishedEvent> {
        self.mirror.events(pubsub_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn order_events_are_logged_in_publish_order() {
        let publisher = LocalOnlyPublisher::new(Arc::new(Mirror::new()));
        assert!(publisher.events("bookstore-pubsub").is_empty());

        publisher
            .publish(
                "bookstore-pubsub",
                "orders.created",
                &json!({"orderId": "1"}),
                Deadline::Default,
            )
            .await
            .unwrap();
        publisher
            .publish(
                "bookstore-pubsub",
                "orders.status-changed",
                &json!({"orderId": "1", "status": "processing"}),
                Deadline::Default,
            )
            .await
            .unwrap();

        let log = publisher.events("bookstore-pubsub");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].topic, "orders.created");
        assert_eq!(log[1].topic, "orders.status-changed");
        assert_eq!(log[1].payload["status"], "processing");
        assert!(log[0].created_at <= log[1].created_at);
    }

    #[tokio::test]
    async fn logged_payload_is_detached_from_caller() {
        let publisher = LocalOnlyPublisher::new(Arc::new(Mirror::new()));
        let mut payload = json!({"orderId": "7"});
        publisher
            .publish("bus", "t", &payload, Deadline::Default)
            .await
            .unwrap();
        payload["orderId"] = json!("changed");

        assert_eq!(publisher.events("bus")[0].payload, json!({"orderId": "7"}));
    }

    #[tokio::test]
    async fn reading_the_log_does_not_consume_it() {
        let publisher = LocalOnlyPublisher::new(Arc::new(Mirror::new()));
        for n in 0..5 {
            publisher
                .publish("bus", "tick", &json!({"n": n}), Deadline::Default)
                .await
                .unwrap();
        }

        assert_eq!(publisher.events("bus").len(), 5);
        let ns: Vec<_> = publisher
            .events("bus")
            .iter()
            .map(|e| e.payload["n"].as_i64().unwrap())
            .collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }
}
