//! Dispatcher and store behavior: durable creation independent of liveness,
//! live push envelopes, ordering, read flags and pagination.

use std::sync::Arc;

use greenroom::models::notification::NotificationCategory;
use greenroom::pagination::PaginationMeta;
use greenroom::store::{MemoryNotificationStore, NotificationStore};
use greenroom::websocket::{ConnectionId, ConnectionRegistry};
use greenroom::Notifier;
use serde_json::Value;
use tokio::sync::mpsc;

fn notifier() -> (Notifier, Arc<MemoryNotificationStore>, ConnectionRegistry) {
    let store = Arc::new(MemoryNotificationStore::new());
    let registry = ConnectionRegistry::new();
    let notifier = Notifier::new(store.clone(), registry.clone());
    (notifier, store, registry)
}

#[tokio::test]
async fn notify_persists_even_with_no_live_connections() {
    let (notifier, store, registry) = notifier();
    assert_eq!(registry.connection_count().await, 0);

    let first = notifier
        .notify_user(7, NotificationCategory::TradeStatus, "first", None, None)
        .await
        .unwrap();
    let second = notifier
        .notify_user(
            7,
            NotificationCategory::ItemCheck,
            "second",
            Some(3),
            Some("{\"x\":1}".to_string()),
        )
        .await
        .unwrap();

    assert!(!first.is_read);
    assert_ne!(first.id, second.id);

    // Newest-first: the later notification leads the list.
    let (items, total) = store.list_for_user(7, None, 1, 20).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].id, second.id);
    assert_eq!(items[1].id, first.id);
}

#[tokio::test]
async fn notify_pushes_an_envelope_to_live_connections() {
    let (notifier, _store, registry) = notifier();

    let (tx, mut rx) = mpsc::unbounded_channel();
    registry.register(ConnectionId::new(), tx).await;

    let created = notifier
        .notify_user(7, NotificationCategory::PostComment, "new review", Some(11), None)
        .await
        .unwrap();

    let frame: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(frame["kind"], "notification");
    assert_eq!(frame["data"]["id"], created.id);
    assert_eq!(frame["data"]["recipient_id"], 7);
    assert_eq!(frame["data"]["category"], "POST_COMMENT");
    assert_eq!(frame["data"]["entity_id"], 11);
    assert_eq!(frame["data"]["is_read"], false);
}

#[tokio::test]
async fn push_failure_does_not_fail_the_write() {
    let (notifier, store, registry) = notifier();

    let (tx, rx) = mpsc::unbounded_channel();
    registry.register(ConnectionId::new(), tx).await;
    drop(rx);

    let created = notifier
        .notify_user(7, NotificationCategory::TradeStatus, "still stored", None, None)
        .await
        .unwrap();

    assert!(store.get(created.id).await.unwrap().is_some());
    // The dead connection was evicted as a side effect of the push.
    assert_eq!(registry.connection_count().await, 0);
}

#[tokio::test]
async fn notify_each_creates_one_row_per_recipient() {
    let (notifier, store, _registry) = notifier();

    notifier
        .notify_each(
            &[1, 2, 3],
            NotificationCategory::ItemCheck,
            "please check",
            Some(9),
            None,
        )
        .await;

    for recipient in [1, 2, 3] {
        let (items, total) = store.list_for_user(recipient, None, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].message, "please check");
        assert_eq!(items[0].recipient_id, recipient);
    }
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let (notifier, store, _registry) = notifier();
    let created = notifier
        .notify_user(5, NotificationCategory::TradeStatus, "read me", None, None)
        .await
        .unwrap();

    let once = store.mark_read(created.id).await.unwrap();
    assert!(once.is_read);
    let twice = store.mark_read(created.id).await.unwrap();
    assert!(twice.is_read);
}

#[tokio::test]
async fn read_filter_partitions_the_list() {
    let (notifier, store, _registry) = notifier();
    let a = notifier
        .notify_user(5, NotificationCategory::TradeStatus, "a", None, None)
        .await
        .unwrap();
    notifier
        .notify_user(5, NotificationCategory::TradeStatus, "b", None, None)
        .await
        .unwrap();

    store.mark_read(a.id).await.unwrap();

    let (read, read_total) = store.list_for_user(5, Some(true), 1, 10).await.unwrap();
    assert_eq!(read_total, 1);
    assert_eq!(read[0].id, a.id);

    let (unread, unread_total) = store.list_for_user(5, Some(false), 1, 10).await.unwrap();
    assert_eq!(unread_total, 1);
    assert_eq!(unread[0].message, "b");
}

#[tokio::test]
async fn pagination_over_25_notifications() {
    let (notifier, store, _registry) = notifier();
    for i in 0..25 {
        notifier
            .notify_user(
                9,
                NotificationCategory::PostComment,
                &format!("message {i}"),
                None,
                None,
            )
            .await
            .unwrap();
    }

    let (page_one, total) = store.list_for_user(9, None, 1, 10).await.unwrap();
    assert_eq!(total, 25);
    assert_eq!(page_one.len(), 10);

    let meta = PaginationMeta::new(1, 10, total);
    assert_eq!(meta.total_pages, 3);
    assert!(meta.has_next);
    assert!(!meta.has_prev);

    let (page_three, _) = store.list_for_user(9, None, 3, 10).await.unwrap();
    assert_eq!(page_three.len(), 5);

    let meta = PaginationMeta::new(3, 10, total);
    assert!(!meta.has_next);
    assert!(meta.has_prev);

    // Ids never repeat across pages.
    let (page_two, _) = store.list_for_user(9, None, 2, 10).await.unwrap();
    for n in &page_two {
        assert!(page_one.iter().all(|m| m.id != n.id));
        assert!(page_three.iter().all(|m| m.id != n.id));
    }
}
