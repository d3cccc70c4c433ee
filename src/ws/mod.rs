//! WebSocket layer: connection handling, wire framing, broadcast wiring.
//!
//! The WebSocket endpoint at `/subscribe` carries the bidirectional
//! synchronization protocol: every frame a client sends mutates the shared
//! world, and every mutation is echoed back to all connected clients.

pub mod broadcast;
pub mod connection;
pub mod handler;
pub mod messages;

pub use broadcast::BroadcastListener;
