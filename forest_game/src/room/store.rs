//! Room storage trait and the in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{actor::RoomHandle, models::RoomCode};

/// Result of inserting a room handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// Another room already uses the code; nothing was replaced
    CodeTaken,
    /// The store already holds `limit` rooms
    Full,
}

/// Trait for room lookup by join code
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Find a room handle by code
    async fn get(&self, code: &RoomCode) -> Option<RoomHandle>;

    /// Insert a room handle unless its code is taken or the store holds
    /// `limit` rooms. The check and the insert are atomic.
    async fn insert(&self, handle: RoomHandle, limit: usize) -> Insertion;

    /// Remove a room, returning its handle if it was present
    async fn remove(&self, code: &RoomCode) -> Option<RoomHandle>;

    /// Whether a code is taken
    async fn contains(&self, code: &RoomCode) -> bool;

    /// Number of stored rooms
    async fn len(&self) -> usize;

    /// Snapshot of all stored handles
    async fn handles(&self) -> Vec<RoomHandle>;

    /// Drop handles whose actor has stopped, returning how many were removed
    async fn prune_closed(&self) -> usize;

    /// Whether the store is empty
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-local room store
#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    rooms: RwLock<HashMap<RoomCode, RoomHandle>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(code).cloned()
    }

    async fn insert(&self, handle: RoomHandle, limit: usize) -> Insertion {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(handle.code()) {
            return Insertion::CodeTaken;
        }
        if rooms.len() >= limit {
            return Insertion::Full;
        }
        rooms.insert(handle.code().clone(), handle);
        Insertion::Inserted
    }

    async fn remove(&self, code: &RoomCode) -> Option<RoomHandle> {
        let mut rooms = self.rooms.write().await;
        rooms.remove(code)
    }

    async fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.read().await.contains_key(code)
    }

    async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn handles(&self) -> Vec<RoomHandle> {
        self.rooms.read().await.values().cloned().collect()
    }

    async fn prune_closed(&self) -> usize {
        let mut rooms = self.rooms.write().await;
        let before = rooms.len();
        rooms.retain(|_, handle| !handle.is_closed());
        before - rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::messages::RoomMessage;
    use tokio::sync::mpsc;

    fn handle(code: &str) -> (RoomHandle, mpsc::Receiver<RoomMessage>) {
        let (tx, rx) = mpsc::channel(1);
        (RoomHandle::new(tx, RoomCode::parse(code), 0), rx)
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = InMemoryRoomStore::new();
        assert!(store.is_empty().await);

        let (room, _rx) = handle("AAA111");
        assert_eq!(store.insert(room, 10).await, Insertion::Inserted);
        assert!(store.contains(&RoomCode::parse("aaa111")).await);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&RoomCode::parse("AAA111")).await.is_some());

        assert!(store.remove(&RoomCode::parse("AAA111")).await.is_some());
        assert!(store.remove(&RoomCode::parse("AAA111")).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_never_replaces_or_overfills() {
        let store = InMemoryRoomStore::new();
        let (first, first_rx) = handle("AAA111");
        let (duplicate, _dup_rx) = handle("AAA111");
        let (other, _other_rx) = handle("BBB222");

        assert_eq!(store.insert(first, 1).await, Insertion::Inserted);
        assert_eq!(store.insert(duplicate, 5).await, Insertion::CodeTaken);
        assert_eq!(store.insert(other, 1).await, Insertion::Full);
        assert_eq!(store.len().await, 1);

        // The original handle is still the one stored
        let stored = store.get(&RoomCode::parse("AAA111")).await.unwrap();
        assert!(!stored.is_closed());
        drop(first_rx);
        assert!(stored.is_closed());
    }

    #[tokio::test]
    async fn test_prune_closed() {
        let store = InMemoryRoomStore::new();
        let (open, _open_rx) = handle("AAA111");
        let (stopped, stopped_rx) = handle("BBB222");
        store.insert(open, 10).await;
        store.insert(stopped, 10).await;
        drop(stopped_rx);

        assert_eq!(store.prune_closed().await, 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.handles().await.len(), 1);
        assert!(store.contains(&RoomCode::parse("AAA111")).await);
    }
}
