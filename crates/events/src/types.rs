//! Event types for the autoplay event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: GameEvent,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: GameEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All events a running job can report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The engine process(es) started and the game loop is about to begin
    #[serde(rename = "game.started")]
    GameStarted { file: String },

    /// One full move round-trip completed
    #[serde(rename = "game.move")]
    MovePlayed {
        file: String,
        move_num: u32,
        side: String,
        text: String,
    },

    /// The game reached a terminal position
    #[serde(rename = "game.ended")]
    GameEnded {
        file: String,
        winner: Option<String>,
        moves: u32,
    },

    /// A job failed and its work order should be redone
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}
