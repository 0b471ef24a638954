use std::collections::HashMap;
use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::GameError;
use crate::event::Outbound;
use crate::game::player::{Player, PlayerId};
use crate::game::room::{Room, SpinToken};
use crate::protocol::ServerEvent;

/// Generated room codes are this many characters.
const CODE_LEN: usize = 5;

/// Room codes are matched case-insensitively.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// What happened to one room when a player was removed from it.
#[derive(Debug)]
pub struct RemovalOutcome {
    pub code: String,
    pub events: Vec<Outbound>,
    /// The room emptied and was destroyed.
    pub destroyed: bool,
    /// Removal re-determined the leader and left a fresh tie-break pending.
    pub pending_spin: Option<SpinToken>,
}

/// Owns every live room, keyed by its code. Rooms never reference each
/// other; membership changes (create, join, removal) serialize through the
/// registry's write lock so a destruction can never race a join, while
/// in-game intents only take the read lock plus the room's own mutex.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room under the requested code (normalized) or a generated
    /// one, seating `host` as its first player.
    #[instrument(skip(self, host))]
    pub async fn create_room(
        &self,
        requested_code: Option<String>,
        host: Player,
    ) -> Result<(String, Vec<Outbound>), GameError> {
        let mut rooms = self.rooms.write().await;

        let code = match requested_code
            .map(|raw| normalize_code(&raw))
            .filter(|code| !code.is_empty())
        {
            Some(code) => {
                if rooms.contains_key(&code) {
                    warn!(room_code = %code, "requested room code is taken");
                    return Err(GameError::RoomCodeTaken);
                }
                code
            }
            None => loop {
                let code = generate_code();
                if !rooms.contains_key(&code) {
                    break code;
                }
            },
        };

        let host_id = host.id;
        let room = Room::new(code.clone(), host);
        let events = vec![
            Outbound::to(host_id, ServerEvent::RoomCreated { code: code.clone() }),
            Outbound::all(ServerEvent::State(room.snapshot())),
        ];
        rooms.insert(code.clone(), Arc::new(Mutex::new(room)));

        info!(room_code = %code, player_id = %host_id, "room created");
        Ok((code, events))
    }

    /// Adds a player to an existing, not-yet-started room.
    #[instrument(skip(self, player))]
    pub async fn join_room(
        &self,
        code: &str,
        player: Player,
    ) -> Result<Vec<Outbound>, GameError> {
        let rooms = self.rooms.write().await;
        let room = rooms.get(code).ok_or(GameError::RoomNotFound)?;
        let mut room = room.lock().await;
        let events = room.join(player)?;
        debug!(room_code = %code, players = room.players.len(), "player joined");
        Ok(events)
    }

    /// Looks up a room for an in-game intent.
    pub async fn lookup(&self, code: &str) -> Result<Arc<Mutex<Room>>, GameError> {
        let rooms = self.rooms.read().await;
        rooms.get(code).cloned().ok_or(GameError::RoomNotFound)
    }

    /// Removes a player from every room they occupy, destroying rooms that
    /// empty out. Runs under the registry write lock so no join can slip
    /// into a room that is being torn down.
    #[instrument(skip(self))]
    pub async fn remove_player_everywhere(&self, player: PlayerId) -> Vec<RemovalOutcome> {
        let mut rooms = self.rooms.write().await;
        let codes: Vec<String> = rooms.keys().cloned().collect();

        let mut outcomes = Vec::new();
        for code in codes {
            let room_arc = Arc::clone(&rooms[&code]);
            let mut room = room_arc.lock().await;
            let Some(events) = room.remove_player(player) else {
                continue;
            };

            if room.players.is_empty() {
                drop(room);
                rooms.remove(&code);
                info!(room_code = %code, "room destroyed after last player left");
                outcomes.push(RemovalOutcome {
                    code,
                    events: vec![],
                    destroyed: true,
                    pending_spin: None,
                });
            } else {
                let pending_spin = room.pending_spin_token();
                debug!(room_code = %code, players = room.players.len(), "player removed");
                outcomes.push(RemovalOutcome {
                    code,
                    events,
                    destroyed: false,
                    pending_spin,
                });
            }
        }
        outcomes
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

fn generate_code() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}
