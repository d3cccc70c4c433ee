//! Per-connection lifecycle: receive loop, send loop, teardown.
//!
//! A connection moves through three states: CONNECTING (handshake in
//! progress, handled by axum), ACTIVE (mailbox created, connection
//! registered, both loops running), and CLOSED (terminal). Either loop can
//! trigger the transition to CLOSED; on entry the connection is
//! unregistered, the other loop is aborted — interrupting an in-flight
//! dequeue — and the mailbox is released. Failures never propagate past
//! this module: one connection's errors cannot abort another's loops or
//! leave the registry inconsistent.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};

use crate::app_state::AppState;
use crate::domain::{ConnectionId, Mailbox, Outbox};
use crate::error::ConnectionError;

use super::messages::WireMessage;

/// Runs one WebSocket connection to completion.
///
/// Registers a fresh mailbox, starts the receive and send loops as
/// independent tasks, and tears both down when either finishes.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let conn_id = ConnectionId::new();
    let (mailbox, outbox) = Mailbox::channel();
    state.registry.register(conn_id, mailbox);
    tracing::info!(%conn_id, connections = state.registry.len(), "ws client connected");

    let (ws_tx, ws_rx) = socket.split();
    let mut send_task = tokio::spawn(send_loop(ws_tx, outbox));
    let mut recv_task = tokio::spawn(receive_loop(ws_rx, state.clone(), conn_id));

    // Whichever loop exits first tears the other down. Aborting the send
    // task interrupts an in-flight dequeue so it cannot block forever on an
    // abandoned mailbox.
    let outcome = tokio::select! {
        res = &mut send_task => {
            recv_task.abort();
            res.unwrap_or(Ok(()))
        }
        res = &mut recv_task => {
            send_task.abort();
            res.unwrap_or(Ok(()))
        }
    };
    state.registry.unregister(conn_id);

    match outcome {
        Ok(()) => tracing::info!(%conn_id, "ws client disconnected"),
        Err(ConnectionError::Protocol(err)) => {
            tracing::warn!(%conn_id, %err, "closing connection after protocol error");
        }
        Err(ConnectionError::Transport(err)) => {
            tracing::debug!(%conn_id, %err, "closing connection after transport error");
        }
    }
}

/// Blocks waiting for inbound frames and applies them to the world.
///
/// An entity update goes through [`crate::domain::World::set_entity`]; the
/// registered listener performs the broadcast. A clear command bypasses
/// per-entity notification: the world is wiped and the clear frame is
/// broadcast wide from here.
async fn receive_loop(
    mut ws_rx: SplitStream<WebSocket>,
    state: AppState,
    conn_id: ConnectionId,
) -> Result<(), ConnectionError> {
    while let Some(frame) = ws_rx.next().await {
        let msg = frame.map_err(ConnectionError::Transport)?;
        match msg {
            Message::Text(text) => match WireMessage::decode(text.as_str())? {
                WireMessage::Clear => {
                    state.world.clear().await;
                    let delivered = state.registry.broadcast(&WireMessage::Clear.encode());
                    tracing::debug!(%conn_id, delivered, "world cleared");
                }
                WireMessage::Entity(update) => {
                    state.world.set_entity(&update.entity, update.data).await;
                }
            },
            Message::Close(_) => return Ok(()),
            // Binary and control frames are not part of the protocol.
            _ => {}
        }
    }
    Ok(())
}

/// Drains the connection's mailbox onto the wire, in FIFO order.
///
/// Ends when the mailbox is released (unregistered elsewhere) or a write
/// fails.
async fn send_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbox: Outbox,
) -> Result<(), ConnectionError> {
    while let Some(frame) = outbox.dequeue().await {
        ws_tx
            .send(Message::text(frame))
            .await
            .map_err(ConnectionError::Transport)?;
    }
    Ok(())
}
