//! In-memory mirror of sidecar state and published events.
//!
//! The mirror is the whole backing store in in-memory mode, and a
//! remember-last-seen cache in sidecar mode so reads can still be served
//! after the sidecar goes away. Every value going in or out is an owned
//! clone; callers never share a value with the mirror.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the publish log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedEvent {
    pub pubsub_name: String,
    pub topic: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// Owned store of last-known state values and the publish log
#[derive(Default)]
pub struct Mirror {
    /// store name -> key -> value
    state: RwLock<HashMap<String, HashMap<String, Value>>>,
    /// pubsub name -> events in publish order
    events: RwLock<HashMap<String, Vec<PublishedEvent>>>,
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stores = self.state.read().len();
        let event_logs = self.events.read().len();
        f.debug_struct("Mirror")
            .field("stores", &stores)
            .field("event_logs", &event_logs)
            .finish()
    }
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `value` as the latest state of `(store, key)`
    pub fn remember(&self, store: &str, key: &str, value: Value) {
        self.state
            .write()
            .entry(store.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Drop `(store, key)` from the mirror
    pub fn forget(&self, store: &str, key: &str) {
        if let Some(entries) = self.state.write().get_mut(store) {
            entries.remove(key);
        }
    }

    /// Last known value of `(store, key)`
    pub fn recall(&self, store: &str, key: &str) -> Option<Value> {
        self.state
            .read()
            .get(store)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    /// Keys currently held for a store, sorted
    pub fn keys(&self, store: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .state
            .read()
            .get(store)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Append an event to the log of `pubsub_name`
    pub fn record_event(&self, pubsub_name: &str, topic: &str, payload: Value) -> PublishedEvent {
        let event = PublishedEvent {
            pubsub_name: pubsub_name.to_string(),
            topic: topic.to_string(),
            payload,
            created_at: Utc::now(),
        };
        self.events
            .write()
            .entry(pubsub_name.to_string())
            .or_default()
            .push(event.clone());
        event
    }

    /// Events published to `pubsub_name`, oldest first
    pub fn events(&self, pubsub_name: &str) -> Vec<PublishedEvent> {
        self.events
            .read()
            .get(pubsub_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recall_returns_independent_copy() {
        let mirror = Mirror::new();
        mirror.remember("s", "k", json!({"n": 1}));

        let mut first = mirror.recall("s", "k").unwrap();
        first["n"] = json!(2);

        assert_eq!(mirror.recall("s", "k"), Some(json!({"n": 1})));
    }

    #[test]
    fn forget_only_touches_one_key() {
        let mirror = Mirror::new();
        mirror.remember("s", "a", json!(1));
        mirror.remember("s", "b", json!(2));
        mirror.forget("s", "a");
        mirror.forget("missing-store", "a");

        assert_eq!(mirror.recall("s", "a"), None);
        assert_eq!(mirror.keys("s"), vec!["b".to_string()]);
    }

    #[test]
    fn stores_are_isolated() {
        let mirror = Mirror::new();
        mirror.remember("one", "k", json!("x"));
        assert_eq!(mirror.recall("two", "k"), None);
    }

    #[test]
    fn event_log_keeps_publish_order_per_pubsub() {
        let mirror = Mirror::new();
        assert!(mirror.events("bus").is_empty());

        mirror.record_event("bus", "a", json!(1));
        mirror.record_event("other", "x", json!(0));
        mirror.record_event("bus", "b", json!(2));

        let topics: Vec<_> = mirror.events("bus").into_iter().map(|e| e.topic).collect();
        assert_eq!(topics, vec!["a", "b"]);
        assert_eq!(mirror.events("other").len(), 1);
    }
}
