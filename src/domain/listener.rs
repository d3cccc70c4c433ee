//! Change-notification capability for the [`super::World`].

use super::world::Attributes;

/// Callback invoked by the [`super::World`] after every entity mutation.
///
/// Listeners are registered once at startup and invoked synchronously, in
/// registration order, with the full post-mutation attribute map of the
/// affected entity — never a stale or queued snapshot. Implementations must
/// not block and must not call back into the world.
///
/// The one production implementation is
/// [`BroadcastListener`](crate::ws::BroadcastListener), which fans the
/// mutation out to every connected client.
pub trait ChangeListener: Send + Sync {
    /// Called with the entity key and its current attribute map, after the
    /// mutation has been applied.
    fn notify(&self, entity: &str, data: &Attributes);
}
