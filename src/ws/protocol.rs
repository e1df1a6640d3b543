//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};

use crate::game::Cell;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Change heading. The token is passed through verbatim; the room decodes
    /// the four recognized direction strings and ignores everything else.
    Direction { direction: String },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// A player joined; carries the full roster as of that join
    Join { data: Vec<RosterEntry> },

    /// A player departed
    Leave { id: u32 },

    /// Batched per-tick state for every player that moved or died
    Update { data: Vec<PlayerUpdate> },
}

/// Public attributes of one registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u32,
    pub color: String,
}

/// Per-player location/state payload inside an update batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub id: u32,
    /// Body cells, head first
    pub body: Vec<Cell>,
    pub alive: bool,
}
