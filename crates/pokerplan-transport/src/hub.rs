//! Delivery hub: per-connection addressing and room-topic broadcast.
//!
//! The hub routes already-encoded frames. Each connection registers an
//! unbounded outbound queue; a writer pump task drains that queue onto
//! the socket. Keeping every outbound frame on one queue per connection
//! preserves ordering between direct sends and broadcasts.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::ConnectionId;

/// Outbound queue for a single connection's encoded frames.
pub type OutboundSender = mpsc::UnboundedSender<Vec<u8>>;

/// Routes frames to individual connections and to room topics.
///
/// Cheap to clone. Delivery is best-effort: frames for a connection
/// whose receiver is gone are silently dropped — a reconnecting client
/// asks for fresh state instead of replaying missed frames.
#[derive(Clone, Default)]
pub struct Hub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    senders: HashMap<ConnectionId, OutboundSender>,
    topics: HashMap<String, HashSet<ConnectionId>>,
}

impl Hub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection's outbound queue.
    pub fn register(&self, id: ConnectionId, sender: OutboundSender) {
        let mut inner = self.lock();
        inner.senders.insert(id, sender);
    }

    /// Removes a connection and drops it from every topic.
    pub fn unregister(&self, id: ConnectionId) {
        let mut inner = self.lock();
        inner.senders.remove(&id);
        inner.topics.retain(|_, members| {
            members.remove(&id);
            !members.is_empty()
        });
    }

    /// Adds a connection to a topic's subscriber set.
    pub fn subscribe(&self, topic: &str, id: ConnectionId) {
        let mut inner = self.lock();
        inner.topics.entry(topic.to_owned()).or_default().insert(id);
    }

    /// Removes a connection from a topic's subscriber set.
    pub fn unsubscribe(&self, topic: &str, id: ConnectionId) {
        let mut inner = self.lock();
        if let Some(members) = inner.topics.get_mut(topic) {
            members.remove(&id);
            if members.is_empty() {
                inner.topics.remove(topic);
            }
        }
    }

    /// Drops a topic and all its subscriptions (the connections stay
    /// registered).
    pub fn drop_topic(&self, topic: &str) {
        let mut inner = self.lock();
        inner.topics.remove(topic);
    }

    /// Sends a frame to one connection. Returns `false` if the
    /// connection is unknown or its queue is closed.
    pub fn send_to(&self, id: ConnectionId, frame: &[u8]) -> bool {
        let inner = self.lock();
        match inner.senders.get(&id) {
            Some(sender) => sender.send(frame.to_vec()).is_ok(),
            None => false,
        }
    }

    /// Sends a frame to every subscriber of a topic. Returns the number
    /// of queues the frame was placed on.
    pub fn broadcast(&self, topic: &str, frame: &[u8]) -> usize {
        let inner = self.lock();
        let Some(members) = inner.topics.get(topic) else {
            return 0;
        };
        let mut delivered = 0;
        for id in members {
            if let Some(sender) = inner.senders.get(id) {
                if sender.send(frame.to_vec()).is_ok() {
                    delivered += 1;
                }
            }
        }
        delivered
    }

    /// Returns the subscribers of a topic.
    pub fn topic_members(&self, topic: &str) -> Vec<ConnectionId> {
        let inner = self.lock();
        inner
            .topics
            .get(topic)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        // The inner maps can't poison: no callback runs under the lock.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[test]
    fn test_send_to_registered_connection() {
        let hub = Hub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(conn(1), tx);

        assert!(hub.send_to(conn(1), b"hello"));
        assert_eq!(rx.try_recv().unwrap(), b"hello");
    }

    #[test]
    fn test_send_to_unknown_connection_returns_false() {
        let hub = Hub::new();
        assert!(!hub.send_to(conn(9), b"hello"));
    }

    #[test]
    fn test_broadcast_reaches_all_subscribers() {
        let hub = Hub::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        hub.register(conn(1), tx1);
        hub.register(conn(2), tx2);
        hub.subscribe("ABC123", conn(1));
        hub.subscribe("ABC123", conn(2));

        assert_eq!(hub.broadcast("ABC123", b"update"), 2);
        assert_eq!(rx1.try_recv().unwrap(), b"update");
        assert_eq!(rx2.try_recv().unwrap(), b"update");
    }

    #[test]
    fn test_broadcast_skips_unsubscribed_connections() {
        let hub = Hub::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        hub.register(conn(1), tx1);
        hub.register(conn(2), tx2);
        hub.subscribe("ABC123", conn(1));

        hub.broadcast("ABC123", b"update");
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_unknown_topic_delivers_nothing() {
        let hub = Hub::new();
        assert_eq!(hub.broadcast("NOPE42", b"x"), 0);
    }

    #[test]
    fn test_unregister_removes_topic_membership() {
        let hub = Hub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        hub.register(conn(1), tx);
        hub.subscribe("ABC123", conn(1));

        hub.unregister(conn(1));
        assert!(hub.topic_members("ABC123").is_empty());
        assert!(!hub.send_to(conn(1), b"x"));
    }

    #[test]
    fn test_dropped_receiver_is_tolerated() {
        let hub = Hub::new();
        let (tx, rx) = mpsc::unbounded_channel();
        hub.register(conn(1), tx);
        hub.subscribe("ABC123", conn(1));
        drop(rx);

        assert!(!hub.send_to(conn(1), b"x"));
        assert_eq!(hub.broadcast("ABC123", b"x"), 0);
    }

    #[test]
    fn test_drop_topic_keeps_connections_registered() {
        let hub = Hub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(conn(1), tx);
        hub.subscribe("ABC123", conn(1));

        hub.drop_topic("ABC123");
        assert!(hub.topic_members("ABC123").is_empty());
        assert!(hub.send_to(conn(1), b"still here"));
        assert_eq!(rx.try_recv().unwrap(), b"still here");
    }
}
