//! WebSocket endpoint for live dashboard updates
//!
//! Server to client only. Each connection gets its own broadcast receiver;
//! a slow client that lags behind the channel capacity is dropped rather
//! than allowed to stall the publisher.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

/// Upgrade the connection and start streaming events
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    tracing::debug!(
        subscribers = state.events.subscriber_count(),
        "WebSocket client connected"
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let payload = match serde_json::to_string(&event) {
                            Ok(payload) => payload,
                            Err(e) => {
                                tracing::warn!("Failed to serialize event: {e}");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "WebSocket client lagged, disconnecting");
                        break;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                // Clients do not send application messages; consume pings
                // and close frames so the connection stays healthy.
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}
