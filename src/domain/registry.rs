//! The set of currently active connections, with fan-out broadcast.
//!
//! [`ConnectionRegistry`] maps a [`ConnectionId`] to the enqueue half of
//! that connection's [`Mailbox`]. Broadcast snapshots the membership under
//! the read lock, then enqueues outside it, so concurrent register and
//! unregister calls can never crash an in-flight fan-out or skip a member
//! that was present when the broadcast began.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::connection_id::ConnectionId;
use super::mailbox::Mailbox;

/// Central store of all live connections eligible for broadcast.
///
/// Guarded by a synchronous [`RwLock`]: every critical section is a plain
/// map operation with no suspension point inside, which keeps
/// [`broadcast`](Self::broadcast) callable from the synchronous
/// [`ChangeListener`](super::ChangeListener) notification path.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Mailbox>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection's mailbox to the active set.
    pub fn register(&self, id: ConnectionId, mailbox: Mailbox) {
        self.write_guard().insert(id, mailbox);
    }

    /// Removes a connection from the active set.
    ///
    /// Idempotent: removing an already-absent connection is a no-op. Once
    /// this returns, no future broadcast will enqueue onto the connection's
    /// mailbox.
    pub fn unregister(&self, id: ConnectionId) {
        self.write_guard().remove(&id);
    }

    /// Enqueues `frame` onto every currently-registered connection's
    /// mailbox, including the connection that caused the triggering event.
    ///
    /// Returns the number of mailboxes the frame was enqueued onto.
    pub fn broadcast(&self, frame: &str) -> usize {
        let members: Vec<Mailbox> = {
            let guard = self
                .connections
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.values().cloned().collect()
        };
        members
            .iter()
            .filter(|mailbox| mailbox.enqueue(frame.to_string()))
            .count()
    }

    /// Returns the number of registered connections.
    pub fn len(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no connections are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ConnectionId, Mailbox>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still structurally sound.
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
