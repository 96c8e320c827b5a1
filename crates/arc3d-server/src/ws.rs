//! WebSocket endpoint: a client joins a project room and receives save
//! notifications and peer presence.
//!
//! ## Protocol
//!
//! Client to server:
//! ```json
//! { "type": "join", "project_id": "project-1" }
//! { "type": "leave" }
//! ```
//! Server to client: `joined`, `peer_joined`, `peer_left`, `project_saved`,
//! `error`.

use crate::rooms::{ClientMessage, RoomReceiver, ServerMessage};
use crate::routes::SharedState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(msg: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!("Failed to encode {:?}: {}", msg, e);
            None
        }
    }
}

fn leave(state: &SharedState, project_id: &str, peer_id: &str) {
    state.rooms.leave(project_id, peer_id);
    tracing::debug!(
        "{} peer(s) still watching {}",
        state.rooms.peer_count(project_id),
        project_id
    );
    state.rooms.broadcast(
        project_id,
        peer_id,
        ServerMessage::PeerLeft {
            peer_id: peer_id.to_string(),
        },
    );
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let peer_id = Uuid::new_v4().to_string();
    info!("New connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let mut current: Option<String> = None;
    let mut room_rx: Option<RoomReceiver> = None;

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer_id, e);
                        break;
                    }
                };
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join { project_id }) => {
                        if let Some(old) = current.take() {
                            leave(&state, &old, &peer_id);
                        }
                        let (rx, peer_count) = state.rooms.join(&project_id, &peer_id);
                        room_rx = Some(rx);
                        state.rooms.broadcast(&project_id, &peer_id, ServerMessage::PeerJoined {
                            peer_id: peer_id.clone(),
                        });
                        info!("Peer {} joined project {}", peer_id, project_id);
                        current = Some(project_id.clone());
                        Some(ServerMessage::Joined { project_id, peer_count })
                    }
                    Ok(ClientMessage::Leave) => {
                        if let Some(old) = current.take() {
                            leave(&state, &old, &peer_id);
                            info!("Peer {} left project {}", peer_id, old);
                        }
                        room_rx = None;
                        None
                    }
                    Err(e) => {
                        warn!("Invalid message from {}: {}", peer_id, e);
                        Some(ServerMessage::Error { message: format!("Invalid message: {}", e) })
                    }
                };
                if let Some(out) = reply.as_ref().and_then(encode) {
                    if sender.send(out).await.is_err() {
                        break;
                    }
                }
            }

            msg = async {
                match &mut room_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => std::future::pending::<Option<(String, ServerMessage)>>().await,
                }
            } => {
                // Never echo a peer's own presence back to it.
                let Some((from, server_msg)) = msg else { continue };
                if from == peer_id {
                    continue;
                }
                if let Some(out) = encode(&server_msg) {
                    if sender.send(out).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    if let Some(project_id) = current {
        leave(&state, &project_id, &peer_id);
    }
    info!("Connection closed: {}", peer_id);
}
