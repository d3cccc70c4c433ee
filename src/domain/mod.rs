//! Domain layer: the shared world, change notification, and connection
//! plumbing.
//!
//! This module contains the server-side core: the entity store with its
//! listener hook, the per-connection outbound mailbox, and the registry of
//! live connections that broadcast fans out over.

pub mod connection_id;
pub mod listener;
pub mod mailbox;
pub mod registry;
pub mod world;

pub use connection_id::ConnectionId;
pub use listener::ChangeListener;
pub use mailbox::{Mailbox, Outbox};
pub use registry::ConnectionRegistry;
pub use world::{Attributes, World};
