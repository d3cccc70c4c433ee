//! Per-connection outbound message queue.
//!
//! Each WebSocket connection owns one mailbox: an unbounded FIFO of
//! pre-serialized outbound frames. Any connection's receive loop may enqueue
//! into any other connection's mailbox (that is how broadcast works), but
//! only the owning connection's send loop dequeues.

use tokio::sync::mpsc;

/// Enqueue half of a connection's outbound queue.
///
/// Backed by an unbounded `tokio::mpsc` channel: [`Mailbox::enqueue`] never
/// blocks and preserves FIFO order. Capacity is bounded only by available
/// memory — a known limitation: if a client stops draining its socket the
/// queue grows without limit, and no overflow policy is defined.
#[derive(Debug, Clone)]
pub struct Mailbox {
    tx: mpsc::UnboundedSender<String>,
}

/// Dequeue half of a connection's outbound queue, held by the send loop.
#[derive(Debug)]
pub struct Outbox {
    rx: mpsc::UnboundedReceiver<String>,
}

impl Mailbox {
    /// Creates a linked mailbox pair: the enqueue half for the registry and
    /// the dequeue half for the connection's send loop.
    #[must_use]
    pub fn channel() -> (Self, Outbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, Outbox { rx })
    }

    /// Appends a frame to the tail of the queue.
    ///
    /// Never blocks. Returns `false` if the owning connection has already
    /// shut down its receive half (the frame is dropped).
    pub fn enqueue(&self, frame: String) -> bool {
        self.tx.send(frame).is_ok()
    }
}

impl Outbox {
    /// Removes and returns the frame at the head of the queue, in FIFO
    /// order, suspending until one is available.
    ///
    /// Returns `None` once every [`Mailbox`] clone has been dropped (the
    /// connection was unregistered), which lets the send loop exit instead
    /// of blocking on an abandoned queue.
    pub async fn dequeue(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
