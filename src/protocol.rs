use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::cards::Card;
use crate::game::player::PlayerId;
use crate::game::roles::Role;
use crate::game::trick::Trick;

/// Client-to-server intents. The room code is required everywhere except
/// `CREATE` and is matched case-insensitively (normalized to uppercase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientIntent {
    Create {
        name: String,
        #[serde(default)]
        code: Option<String>,
    },
    Join {
        name: String,
        code: String,
    },
    SetDeckCount {
        code: String,
        count: u8,
    },
    Start {
        code: String,
    },
    Play {
        code: String,
        cards: Vec<Card>,
    },
    Pass {
        code: String,
    },
    NewRound {
        code: String,
    },
    Rename {
        code: String,
        name: String,
    },
    ClaimHost {
        code: String,
    },
}

/// Decodes a raw JSON intent as received from a transport.
pub fn parse_intent(raw: &str) -> Result<ClientIntent, serde_json::Error> {
    serde_json::from_str(raw)
}

/// What everyone in the room may know about a player. The full hand stays
/// private; only its size is public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub hand_count: usize,
    pub finished: bool,
    pub finish_order: Option<u32>,
    pub role: Option<Role>,
    pub score: u32,
}

/// Minimal identity used in candidate lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// Tie-break draw in progress: who is in it and who was privately drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinView {
    pub candidates: Vec<PlayerRef>,
    pub winner: PlayerId,
}

/// Full public view of a room, broadcast after every accepted mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub code: String,
    pub host: PlayerId,
    pub started: bool,
    pub players: Vec<PublicPlayer>,
    pub trick: Trick,
    pub turn: Option<PlayerId>,
    pub round: u32,
    pub deck_count: u8,
    pub spin: Option<SpinView>,
}

/// Server-to-client events. `Error` is never broadcast: it goes back to
/// the acting client alone, and the other variants say who they are for
/// through [`crate::event::Outbound`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    RoomCreated {
        code: String,
    },
    Error {
        message: String,
    },
    State(RoomSnapshot),
    /// A player's full hand, sent to its owner once per round start.
    HandReveal {
        cards: Vec<Card>,
    },
    /// A player's remaining hand after their own accepted play.
    HandUpdate {
        cards: Vec<Card>,
    },
    PlayerFinished {
        player: PlayerId,
        order: u32,
    },
    RoundEnd {
        standings: Vec<PublicPlayer>,
        winner: PlayerId,
    },
    SpinStart {
        candidates: Vec<PlayerRef>,
        winner: PlayerId,
    },
    TrickReset {
        leader: PlayerId,
    },
    SwapInfo {
        given: Vec<Card>,
        received: Vec<Card>,
    },
}

impl ServerEvent {
    /// Builds the error payload a transport should relay to the actor.
    pub fn error(err: &GameError) -> Self {
        ServerEvent::Error {
            message: err.to_string(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::RoomCreated { .. } => "room_created",
            ServerEvent::Error { .. } => "error",
            ServerEvent::State(_) => "state",
            ServerEvent::HandReveal { .. } => "hand_reveal",
            ServerEvent::HandUpdate { .. } => "hand_update",
            ServerEvent::PlayerFinished { .. } => "player_finished",
            ServerEvent::RoundEnd { .. } => "round_end",
            ServerEvent::SpinStart { .. } => "spin_start",
            ServerEvent::TrickReset { .. } => "trick_reset",
            ServerEvent::SwapInfo { .. } => "swap_info",
        }
    }
}
