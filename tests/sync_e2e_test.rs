//! End-to-end synchronization tests.
//!
//! Each test boots the real server on an ephemeral port and drives it with
//! real WebSocket clients (`tokio-tungstenite`) and HTTP calls (`reqwest`),
//! covering the full path: inbound frame → world mutation → broadcast
//! fan-out → every client's wire, REST surface included.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use worldsync::api;
use worldsync::app_state::AppState;
use worldsync::domain::{ConnectionRegistry, World};
use worldsync::ws::BroadcastListener;
use worldsync::ws::handler::ws_handler;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Boots the server with the same wiring as `main` (minus static assets)
/// and returns its bound address.
async fn spawn_server() -> SocketAddr {
    let world = Arc::new(World::new());
    let registry = Arc::new(ConnectionRegistry::new());
    world.add_listener(Arc::new(BroadcastListener::new(Arc::clone(&registry))));
    let state = AppState { world, registry };

    let app = Router::new()
        .merge(api::build_router())
        .route("/subscribe", get(ws_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (client, _response) = connect_async(format!("ws://{addr}/subscribe"))
        .await
        .expect("websocket handshake");
    // The server registers the connection in the upgrade task, which runs
    // just after the handshake response; give it a moment to land so a
    // frame sent immediately afterwards is guaranteed to fan out here.
    tokio::time::sleep(Duration::from_millis(50)).await;
    client
}

/// Reads the next text frame as parsed JSON, failing the test on timeout,
/// close, or a non-text frame.
async fn next_json(client: &mut WsClient) -> Value {
    let frame = timeout(RECV_TIMEOUT, client.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .expect("transport error");
    match frame {
        Message::Text(text) => serde_json::from_str(&text).expect("frame is JSON"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

/// Asserts the client receives nothing within [`SILENCE_WINDOW`].
async fn assert_silent(client: &mut WsClient) {
    let result = timeout(SILENCE_WINDOW, client.next()).await;
    assert!(result.is_err(), "expected silence, got {result:?}");
}

#[tokio::test]
async fn update_echoes_to_sender_and_peers() {
    let addr = spawn_server().await;
    let mut client_a = connect(addr).await;
    let mut client_b = connect(addr).await;

    let red = json!({"entity": "x1", "data": {"color": "red"}});
    client_a
        .send(Message::Text(red.to_string()))
        .await
        .unwrap();

    // Both clients receive the exact message, the sender included.
    assert_eq!(next_json(&mut client_a).await, red);
    assert_eq!(next_json(&mut client_b).await, red);

    // A second update replaces, not merges.
    let blue = json!({"entity": "x1", "data": {"color": "blue"}});
    client_a
        .send(Message::Text(blue.to_string()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut client_a).await, blue);
    assert_eq!(next_json(&mut client_b).await, blue);

    let stored: Value = reqwest::get(format!("http://{addr}/entity/x1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, json!({"color": "blue"}));
}

#[tokio::test]
async fn clear_reaches_every_client_and_wipes_the_world() {
    let addr = spawn_server().await;
    let mut client_a = connect(addr).await;
    let mut client_b = connect(addr).await;

    let update = json!({"entity": "x1", "data": {"color": "red"}});
    client_a
        .send(Message::Text(update.to_string()))
        .await
        .unwrap();
    let _ = next_json(&mut client_a).await;
    let _ = next_json(&mut client_b).await;

    client_a
        .send(Message::Text("\"clear\"".to_string()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut client_a).await, json!("clear"));
    assert_eq!(next_json(&mut client_b).await, json!("clear"));

    let world: Value = reqwest::get(format!("http://{addr}/world"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(world, json!({}));
}

#[tokio::test]
async fn malformed_frame_closes_sender_without_side_effects() {
    let addr = spawn_server().await;
    let mut sender = connect(addr).await;
    let mut observer = connect(addr).await;

    // Missing `data` — a protocol error.
    sender
        .send(Message::Text(r#"{"entity":"x1"}"#.to_string()))
        .await
        .unwrap();

    // The offending connection is torn down.
    let ended = timeout(RECV_TIMEOUT, async {
        loop {
            match sender.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "sender connection should close");

    // No broadcast reached the other client, and the world is untouched.
    assert_silent(&mut observer).await;
    let world: Value = reqwest::get(format!("http://{addr}/world"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(world, json!({}));
}

#[tokio::test]
async fn rest_writes_broadcast_but_rest_clear_does_not() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;
    let http = reqwest::Client::new();

    // PUT replaces and echoes to WebSocket clients.
    let put: Value = http
        .put(format!("http://{addr}/entity/z9"))
        .json(&json!({"size": 4}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(put, json!({"size": 4}));
    assert_eq!(
        next_json(&mut client).await,
        json!({"entity": "z9", "data": {"size": 4}})
    );

    // POST merges one attribute at a time.
    let merged: Value = http
        .post(format!("http://{addr}/entity/z9"))
        .json(&json!({"color": "green"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(merged, json!({"size": 4, "color": "green"}));
    assert_eq!(
        next_json(&mut client).await,
        json!({"entity": "z9", "data": {"size": 4, "color": "green"}})
    );

    // REST clear wipes the world silently.
    let cleared: Value = http
        .post(format!("http://{addr}/clear"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared, json!({}));
    assert_silent(&mut client).await;
}

#[tokio::test]
async fn disconnected_client_does_not_stall_the_others() {
    let addr = spawn_server().await;
    let mut staying = connect(addr).await;
    let leaving = connect(addr).await;

    drop(leaving);
    // Give the server a moment to tear the dropped connection down.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let update = json!({"entity": "x1", "data": {"n": 1}});
    staying
        .send(Message::Text(update.to_string()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut staying).await, update);
}
