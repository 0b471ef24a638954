// Outbound event distribution.
//
// The room state machine produces batches of `Outbound` events; a
// `RoomPublisher` carries them to whatever transport is embedding the
// engine. `EventBus` is the in-process implementation.

pub use bus::EventBus;

mod bus;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::player::PlayerId;
use crate::protocol::ServerEvent;

/// Who an event is for. Private payloads (hands, swap notices) are
/// addressed to a single player; everything else goes to the whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recipient {
    All,
    Player(PlayerId),
}

/// One event the room wants delivered, stamped at emission time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: ServerEvent,
    pub at: DateTime<Utc>,
}

impl Outbound {
    pub fn all(event: ServerEvent) -> Self {
        Self {
            recipient: Recipient::All,
            event,
            at: Utc::now(),
        }
    }

    pub fn to(player: PlayerId, event: ServerEvent) -> Self {
        Self {
            recipient: Recipient::Player(player),
            event,
            at: Utc::now(),
        }
    }

    /// True when `player` should receive this event.
    pub fn is_for(&self, player: PlayerId) -> bool {
        match self.recipient {
            Recipient::All => true,
            Recipient::Player(id) => id == player,
        }
    }
}

/// Sink for a room's outbound events. Implementations must tolerate rooms
/// with no listeners; publishing is fire-and-forget from the engine's
/// point of view.
#[async_trait]
pub trait RoomPublisher: Send + Sync {
    async fn publish(&self, room_code: &str, events: Vec<Outbound>);

    /// Called when a room is destroyed so per-room resources can be freed.
    async fn close_room(&self, _room_code: &str) {}
}
