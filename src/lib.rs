//! # worldsync
//!
//! Real-time shared-world synchronization server over WebSocket.
//!
//! The server owns a small mutable world: a set of named entities, each a
//! bag of JSON key/value attributes. Clients push updates over a persistent
//! WebSocket; every accepted update is applied to the shared [`domain::World`]
//! and immediately re-broadcast to all connected clients — including the one
//! that sent it, which waits for its own echo rather than trusting local
//! state. A small REST surface exposes the same world for plain
//! request/response clients.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── World + ChangeListener (domain/)
//!     │
//!     ├── ConnectionRegistry (domain/)
//!     └── Mailbox per connection (domain/)
//! ```
//!
//! Data flow for one update: receive loop decodes the frame →
//! [`domain::World::set_entity`] → the registered [`ws::BroadcastListener`]
//! re-encodes the canonical message → [`domain::ConnectionRegistry::broadcast`]
//! enqueues it onto every connection's mailbox → each connection's send loop
//! drains its mailbox onto the wire.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ws;
