use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

use super::ConnectionId;

/// A single-connection send failed. The caller treats this as a disconnect;
/// the registry has already evicted the entry by the time this is returned.
#[derive(Debug, Error)]
#[error("delivery to connection {connection_id} failed: connection closed")]
pub struct DeliveryError {
    pub connection_id: ConnectionId,
}

/// Process-wide tracker of live WebSocket connections.
///
/// Cheap to clone; all clones share the same underlying map. Mutation and
/// broadcast iteration are serialized through the `RwLock`. Channel sends are
/// non-blocking, so the lock is never held across socket I/O; the actual
/// write to the peer happens in each session's forwarding task.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<ConnectionId, UnboundedSender<String>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live connection. The caller must have completed the WebSocket
    /// handshake before registering.
    pub async fn register(&self, id: ConnectionId, sender: UnboundedSender<String>) {
        let mut guard = self.inner.write().await;
        guard.insert(id, sender);
        tracing::debug!("connection {id} registered, total: {}", guard.len());
    }

    /// Remove a connection if present. Idempotent; safe to call from every
    /// error path, including concurrently with an eviction.
    pub async fn unregister(&self, id: ConnectionId) {
        let mut guard = self.inner.write().await;
        if guard.remove(&id).is_some() {
            tracing::debug!("connection {id} unregistered, remaining: {}", guard.len());
        }
    }

    /// Deliver `text` to exactly one connection.
    ///
    /// An unknown id or a closed channel both mean the peer is gone: the
    /// entry is evicted and a `DeliveryError` returned.
    pub async fn send_to(&self, id: ConnectionId, text: String) -> Result<(), DeliveryError> {
        let sender = {
            let guard = self.inner.read().await;
            guard.get(&id).cloned()
        };

        match sender {
            Some(tx) if tx.send(text).is_ok() => Ok(()),
            _ => {
                self.unregister(id).await;
                Err(DeliveryError { connection_id: id })
            }
        }
    }

    /// Deliver `text` to every live connection.
    ///
    /// Per-connection failures are isolated: a dead peer never blocks
    /// delivery to the rest, and every failed entry is evicted in place.
    /// Best-effort by contract, no aggregate error.
    pub async fn broadcast(&self, text: String) {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|id, sender| {
            let delivered = sender.send(text.clone()).is_ok();
            if !delivered {
                tracing::debug!("connection {id} evicted during broadcast");
            }
            delivered
        });
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::debug!("broadcast evicted {evicted} dead connections, {} active", guard.len());
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn register_and_unregister() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();

        registry.register(id, tx).await;
        assert_eq!(registry.connection_count().await, 1);

        registry.unregister(id).await;
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_unregister_does_not_double_decrement() {
        let registry = ConnectionRegistry::new();
        let ids: Vec<ConnectionId> = (0..4).map(|_| ConnectionId::new()).collect();
        let mut receivers = Vec::new();

        for id in &ids {
            let (tx, rx) = mpsc::unbounded_channel();
            registry.register(*id, tx).await;
            receivers.push(rx);
        }
        assert_eq!(registry.connection_count().await, 4);

        // Two unregisters, one of them repeated from a second "error path".
        registry.unregister(ids[0]).await;
        registry.unregister(ids[1]).await;
        registry.unregister(ids[1]).await;

        assert_eq!(registry.connection_count().await, 2);
    }

    #[tokio::test]
    async fn concurrent_registers_land_exactly_once_each() {
        let registry = ConnectionRegistry::new();
        let mut handles = Vec::new();

        for _ in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                let id = ConnectionId::new();
                registry.register(id, tx).await;
                (id, rx)
            }));
        }

        let mut keep = Vec::new();
        for handle in handles {
            keep.push(handle.await.unwrap());
        }
        assert_eq!(registry.connection_count().await, 32);

        // Unregister half of them concurrently.
        futures::future::join_all(keep.iter().take(16).map(|(id, _rx)| {
            let registry = registry.clone();
            let id = *id;
            async move { registry.unregister(id).await }
        }))
        .await;
        assert_eq!(registry.connection_count().await, 16);
    }

    #[tokio::test]
    async fn send_to_unknown_connection_errors() {
        let registry = ConnectionRegistry::new();
        let err = registry
            .send_to(ConnectionId::new(), "hello".to_string())
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn send_to_dead_connection_evicts_it() {
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        registry.register(id, tx).await;
        drop(rx);

        let result = registry.send_to(id, "hello".to_string()).await;
        assert!(result.is_err());
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_isolates_a_broken_connection() {
        let registry = ConnectionRegistry::new();

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        let (id_a, id_b, id_c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        registry.register(id_a, tx_a).await;
        registry.register(id_b, tx_b).await;
        registry.register(id_c, tx_c).await;

        // B is broken: its receiving side is gone, so every send fails.
        drop(rx_b);

        registry.broadcast("one".to_string()).await;

        assert_eq!(rx_a.try_recv().unwrap(), "one");
        assert_eq!(rx_c.try_recv().unwrap(), "one");
        assert_eq!(registry.connection_count().await, 2);

        // A second broadcast reaches only the two survivors.
        registry.broadcast("two".to_string()).await;
        assert_eq!(rx_a.try_recv().unwrap(), "two");
        assert_eq!(rx_c.try_recv().unwrap(), "two");
        assert_eq!(registry.connection_count().await, 2);
    }
}
