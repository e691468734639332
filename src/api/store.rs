//! Process-wide "latest known collection" per entity.
//!
//! The store is a `tokio::sync::watch` channel used without a runtime: the
//! sender keeps the current snapshot, and each subscriber is a receiver that
//! can be polled from the UI loop. Dropping a [`Subscription`] releases it.
//! Writers never coordinate, so the last completed write wins.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared snapshot of a collection.
pub type Snapshot<T> = Arc<Vec<T>>;

pub struct ResourceStore<T> {
    sender: watch::Sender<Snapshot<T>>,
}

impl<T> ResourceStore<T> {
    /// Creates a store holding an empty collection.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self { sender }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.sender.borrow().clone()
    }

    /// Publishes a new collection to every subscriber.
    pub fn replace(&self, items: Vec<T>) -> Snapshot<T> {
        let snapshot = Arc::new(items);
        self.sender.send_replace(snapshot.clone());
        snapshot
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle held by a view for as long as it wants updates.
pub struct Subscription<T> {
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T> Subscription<T> {
    /// Latest snapshot, whether or not it was already seen.
    pub fn latest(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Returns the new snapshot if the store changed since the last poll.
    /// Several replacements between two polls yield only the last one.
    pub fn poll(&mut self) -> Option<Snapshot<T>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }
}
