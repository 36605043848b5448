//! WebSocket endpoint feeding hub events to connected clients.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};

use figwatch_notify::BroadcastHub;

use crate::api::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Pump hub events to the client until either side goes away.
///
/// Incoming messages are read only to detect disconnects; their content is
/// ignored.
async fn handle_socket(mut socket: WebSocket, hub: Arc<BroadcastHub>) {
    let (id, mut rx) = hub.connect();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if socket.send(Message::Text(event.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.disconnect(id);
}
