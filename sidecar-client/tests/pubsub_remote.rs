// sidecar-client/tests/pubsub_remote.rs
// Publisher against a mock sidecar

mod common;

use serde_json::json;
use sidecar_client::{ClientConfig, Deadline, SidecarClient, SidecarError, WritePolicy};

use common::{closed_addr, spawn_sidecar};

#[tokio::test]
async fn publish_posts_raw_payload_and_logs_it() {
    let sidecar = spawn_sidecar().await;
    let client = SidecarClient::new(&ClientConfig::new(sidecar.base_url())).unwrap();

    client
        .publish_event(
            "bookstore-pubsub",
            "orders.created",
            &json!({"orderId": "1"}),
            Deadline::Default,
        )
        .await
        .unwrap();

    assert_eq!(
        sidecar.published(),
        vec![(
            "bookstore-pubsub".to_string(),
            "orders.created".to_string(),
            json!({"orderId": "1"})
        )]
    );
    let log = client.published_events("bookstore-pubsub");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].pubsub_name, "bookstore-pubsub");
    assert_eq!(log[0].payload, json!({"orderId": "1"}));
}

#[tokio::test]
async fn rejected_publish_raises_but_is_still_logged() {
    let sidecar = spawn_sidecar().await;
    let client = SidecarClient::new(&ClientConfig::new(sidecar.base_url())).unwrap();

    let err = client
        .publish_event("bookstore-pubsub", "forbidden", &json!({}), Deadline::Default)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(client.published_events("bookstore-pubsub").len(), 1);
    assert!(sidecar.published().is_empty());
}

#[tokio::test]
async fn unreachable_bus_is_swallowed_by_default() {
    let client =
        SidecarClient::new(&ClientConfig::new(format!("http://{}", closed_addr().await))).unwrap();

    for status in ["processing", "completed"] {
        client
            .publish_event(
                "bookstore-pubsub",
                "orders.status-changed",
                &json!({"orderId": "1", "status": status}),
                Deadline::Default,
            )
            .await
            .unwrap();
    }

    let statuses: Vec<_> = client
        .published_events("bookstore-pubsub")
        .into_iter()
        .map(|e| e.payload["status"].clone())
        .collect();
    assert_eq!(statuses, vec![json!("processing"), json!("completed")]);
}

#[tokio::test]
async fn unreachable_bus_raises_when_acknowledgement_required() {
    let config = ClientConfig::new(format!("http://{}", closed_addr().await))
        .with_write_policy(WritePolicy::MustAcknowledge);
    let client = SidecarClient::new(&config).unwrap();

    let err = client
        .publish_event("bookstore-pubsub", "orders.created", &json!({}), Deadline::Default)
        .await
        .unwrap_err();
    assert!(matches!(err, SidecarError::Network(_)));
    assert_eq!(client.published_events("bookstore-pubsub").len(), 1);
}
