//! End-to-end tests for the inbound frame router over the connection
//! registry, using raw channel endpoints in place of socket sessions.

use greenroom::websocket::{handle_frame, ConnectionId, ConnectionRegistry};
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver};

async fn connect(registry: &ConnectionRegistry) -> (ConnectionId, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = ConnectionId::new();
    registry.register(id, tx).await;
    (id, rx)
}

fn recv_json(rx: &mut UnboundedReceiver<String>) -> Value {
    let text = rx.try_recv().expect("expected an outbound frame");
    serde_json::from_str(&text).expect("outbound frames are JSON")
}

fn assert_silent(rx: &mut UnboundedReceiver<String>) {
    assert!(rx.try_recv().is_err(), "expected no outbound frame");
}

#[tokio::test]
async fn raw_text_echoes_to_sender_only() {
    let registry = ConnectionRegistry::new();
    let (id_a, mut rx_a) = connect(&registry).await;
    let (_id_b, mut rx_b) = connect(&registry).await;

    handle_frame(&registry, id_a, "hello").await;

    assert_eq!(recv_json(&mut rx_a), json!({"kind": "echo", "payload": "hello"}));
    assert_silent(&mut rx_a);
    assert_silent(&mut rx_b);
}

#[tokio::test]
async fn explicit_echo_kind_echoes_payload() {
    let registry = ConnectionRegistry::new();
    let (id, mut rx) = connect(&registry).await;

    handle_frame(&registry, id, r#"{"kind":"echo","payload":{"n":1}}"#).await;

    assert_eq!(recv_json(&mut rx), json!({"kind": "echo", "payload": {"n": 1}}));
}

#[tokio::test]
async fn unknown_kind_defaults_to_echo() {
    let registry = ConnectionRegistry::new();
    let (id, mut rx) = connect(&registry).await;

    handle_frame(&registry, id, r#"{"kind":"mystery","payload":"x"}"#).await;

    assert_eq!(recv_json(&mut rx), json!({"kind": "echo", "payload": "x"}));
}

#[tokio::test]
async fn missing_kind_and_payload_still_echo() {
    let registry = ConnectionRegistry::new();
    let (id, mut rx) = connect(&registry).await;

    handle_frame(&registry, id, "{}").await;

    assert_eq!(recv_json(&mut rx), json!({"kind": "echo", "payload": null}));
}

#[tokio::test]
async fn non_object_json_degrades_to_raw_echo() {
    let registry = ConnectionRegistry::new();
    let (id, mut rx) = connect(&registry).await;

    handle_frame(&registry, id, "42").await;

    assert_eq!(recv_json(&mut rx), json!({"kind": "echo", "payload": "42"}));
}

#[tokio::test]
async fn broadcast_frame_reaches_sender_and_peers() {
    let registry = ConnectionRegistry::new();
    let (id_a, mut rx_a) = connect(&registry).await;
    let (_id_b, mut rx_b) = connect(&registry).await;

    handle_frame(&registry, id_a, r#"{"kind":"broadcast","payload":"hi"}"#).await;

    let expected = json!({"kind": "broadcast", "payload": "hi"});
    assert_eq!(recv_json(&mut rx_a), expected);
    assert_eq!(recv_json(&mut rx_b), expected);
}

#[tokio::test]
async fn reserved_notification_kind_is_discarded() {
    let registry = ConnectionRegistry::new();
    let (id_a, mut rx_a) = connect(&registry).await;
    let (_id_b, mut rx_b) = connect(&registry).await;

    handle_frame(&registry, id_a, r#"{"kind":"notification","payload":"x"}"#).await;

    assert_silent(&mut rx_a);
    assert_silent(&mut rx_b);
    assert_eq!(registry.connection_count().await, 2);
}

#[tokio::test]
async fn broadcast_skips_and_evicts_a_dead_connection() {
    let registry = ConnectionRegistry::new();
    let (id_a, mut rx_a) = connect(&registry).await;
    let (_id_b, rx_b) = connect(&registry).await;
    let (_id_c, mut rx_c) = connect(&registry).await;

    drop(rx_b);

    handle_frame(&registry, id_a, r#"{"kind":"broadcast","payload":1}"#).await;

    let expected = json!({"kind": "broadcast", "payload": 1});
    assert_eq!(recv_json(&mut rx_a), expected);
    assert_eq!(recv_json(&mut rx_c), expected);
    assert_eq!(registry.connection_count().await, 2);
}

#[tokio::test]
async fn echo_to_a_dead_sender_evicts_it_without_error() {
    let registry = ConnectionRegistry::new();
    let (id, rx) = connect(&registry).await;
    drop(rx);

    // The router swallows the delivery failure; the connection is gone after.
    handle_frame(&registry, id, "hello").await;
    assert_eq!(registry.connection_count().await, 0);
}
