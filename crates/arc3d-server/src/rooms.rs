//! Project rooms: peers watching the same project get notified when it is
//! saved and when other peers come and go.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Sender id used for notifications that come from the server itself.
pub const SERVER_PEER: &str = "server";

/// Messages sent by clients over the WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Watch a project
    Join { project_id: String },
    /// Stop watching
    Leave,
}

/// Messages pushed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined { project_id: String, peer_count: usize },
    PeerJoined { peer_id: String },
    PeerLeft { peer_id: String },
    /// The project was saved; clients reload it.
    ProjectSaved {
        project_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        version_id: Option<String>,
    },
    Error { message: String },
}

pub type RoomReceiver = broadcast::Receiver<(String, ServerMessage)>;

struct Room {
    tx: broadcast::Sender<(String, ServerMessage)>,
    peers: HashSet<String>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: HashSet::new(),
        }
    }
}

/// Active rooms keyed by project id.
#[derive(Default)]
pub struct Rooms {
    rooms: DashMap<String, Room>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer; returns its receiver and the new peer count.
    pub fn join(&self, project_id: &str, peer_id: &str) -> (RoomReceiver, usize) {
        let mut room = self.rooms.entry(project_id.to_string()).or_insert_with(Room::new);
        room.peers.insert(peer_id.to_string());
        (room.tx.subscribe(), room.peers.len())
    }

    /// Remove a peer. Empty rooms are dropped.
    pub fn leave(&self, project_id: &str, peer_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(project_id) {
            room.peers.remove(peer_id);
            if room.peers.is_empty() {
                drop(room);
                self.rooms.remove(project_id);
            }
        }
    }

    pub fn peer_count(&self, project_id: &str) -> usize {
        self.rooms.get(project_id).map(|r| r.peers.len()).unwrap_or(0)
    }

    /// Send to everyone in the room. No-op when nobody is watching.
    pub fn broadcast(&self, project_id: &str, from: &str, msg: ServerMessage) {
        if let Some(room) = self.rooms.get(project_id) {
            let _ = room.tx.send((from.to_string(), msg));
        }
    }

    /// Tell watchers the project changed.
    pub fn notify_saved(&self, project_id: &str, version_id: Option<String>) {
        self.broadcast(
            project_id,
            SERVER_PEER,
            ServerMessage::ProjectSaved {
                project_id: project_id.to_string(),
                version_id,
            },
        );
    }
}
