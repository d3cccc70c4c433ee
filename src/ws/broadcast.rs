//! Broadcast wiring between the world and the connection registry.
//!
//! [`BroadcastListener`] is the one [`ChangeListener`] registered in this
//! server. It turns "one client's local mutation" into "every client's
//! mutation": the originator receives an echo of its own update instead of
//! assuming its local state is already correct, because the server's world
//! is the single source of truth.

use std::sync::Arc;

use crate::domain::{Attributes, ChangeListener, ConnectionRegistry};

use super::messages::{EntityUpdate, WireMessage};

/// Re-encodes every world mutation as the canonical wire message and fans
/// it out to all registered connections, sender included.
#[derive(Debug)]
pub struct BroadcastListener {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastListener {
    /// Creates a listener that broadcasts through `registry`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

impl ChangeListener for BroadcastListener {
    fn notify(&self, entity: &str, data: &Attributes) {
        let message = WireMessage::Entity(EntityUpdate {
            entity: entity.to_string(),
            data: data.clone(),
        });
        let delivered = self.registry.broadcast(&message.encode());
        tracing::trace!(entity, delivered, "entity update fanned out");
    }
}
