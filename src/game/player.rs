use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::Card;
use super::roles::Role;

/// Display names longer than this are cut off.
pub const NAME_MAX_LEN: usize = 20;

/// Stable logical identity of a player, assigned at join time. Transport
/// connection ids are a separate binding owned by the embedding layer, so
/// a future reconnect can re-attach to the same player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trims and caps a requested display name; an empty request gets a
/// generated pet name instead.
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return petname::Petnames::default().generate_one(2, "-");
    }
    trimmed.chars().take(NAME_MAX_LEN).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Always kept sorted by (rank, suit).
    pub hand: Vec<Card>,
    pub finished: bool,
    pub finish_order: Option<u32>,
    pub role: Option<Role>,
    /// Room-lifetime score; never reset between rounds.
    pub score: u32,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            id: PlayerId::new(),
            name: sanitize_name(name),
            hand: Vec::new(),
            finished: false,
            finish_order: None,
            role: None,
            score: 0,
        }
    }
}
