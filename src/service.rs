use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::GameError;
use crate::event::{Outbound, RoomPublisher};
use crate::game::cards::Card;
use crate::game::player::{Player, PlayerId};
use crate::game::room::{Room, SpinToken};
use crate::protocol::ClientIntent;
use crate::registry::{normalize_code, RoomRegistry};

/// How long a tie-break draw stays on screen before the winner takes the
/// turn. Purely presentational; no intent is accepted in the meantime.
pub const SPIN_COMMIT_DELAY: Duration = Duration::from_secs(3);

/// Identity handed back when a player enters a room, for the transport to
/// bind to its connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub player: PlayerId,
    pub code: String,
}

/// Front door of the engine: validates and applies client intents against
/// the registry's rooms and pushes the resulting events to the publisher.
/// Errors are returned to the caller and never published.
pub struct RoomService {
    registry: Arc<RoomRegistry>,
    publisher: Arc<dyn RoomPublisher>,
}

impl RoomService {
    pub fn new(registry: Arc<RoomRegistry>, publisher: Arc<dyn RoomPublisher>) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    /// Routes one decoded intent. `Create` and `Join` mint a fresh player
    /// identity and return it; everything else acts as `actor` and returns
    /// `None`.
    pub async fn apply(
        &self,
        actor: PlayerId,
        intent: ClientIntent,
    ) -> Result<Option<Joined>, GameError> {
        match intent {
            ClientIntent::Create { name, code } => {
                return self.create_room(&name, code).await.map(Some)
            }
            ClientIntent::Join { name, code } => {
                return self.join_room(&code, &name).await.map(Some)
            }
            ClientIntent::SetDeckCount { code, count } => {
                self.set_deck_count(actor, &code, count).await?
            }
            ClientIntent::Start { code } => self.start(actor, &code).await?,
            ClientIntent::Play { code, cards } => self.play(actor, &code, &cards).await?,
            ClientIntent::Pass { code } => self.pass(actor, &code).await?,
            ClientIntent::NewRound { code } => self.new_round(actor, &code).await?,
            ClientIntent::Rename { code, name } => self.rename(actor, &code, &name).await?,
            ClientIntent::ClaimHost { code } => self.claim_host(actor, &code).await?,
        }
        Ok(None)
    }

    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        name: &str,
        requested_code: Option<String>,
    ) -> Result<Joined, GameError> {
        let host = Player::new(name);
        let player = host.id;
        let (code, events) = self.registry.create_room(requested_code, host).await?;
        self.publisher.publish(&code, events).await;
        Ok(Joined { player, code })
    }

    #[instrument(skip(self))]
    pub async fn join_room(&self, code: &str, name: &str) -> Result<Joined, GameError> {
        let code = normalize_code(code);
        let player = Player::new(name);
        let player_id = player.id;
        let events = self.registry.join_room(&code, player).await?;
        self.publisher.publish(&code, events).await;
        info!(room_code = %code, player_id = %player_id, "player joined room");
        Ok(Joined {
            player: player_id,
            code,
        })
    }

    #[instrument(skip(self))]
    pub async fn set_deck_count(
        &self,
        actor: PlayerId,
        code: &str,
        count: u8,
    ) -> Result<(), GameError> {
        self.with_room(code, |room| room.set_deck_count(actor, count))
            .await
    }

    #[instrument(skip(self))]
    pub async fn start(&self, actor: PlayerId, code: &str) -> Result<(), GameError> {
        self.with_round_start(code, |room| room.start(actor)).await
    }

    #[instrument(skip(self))]
    pub async fn new_round(&self, actor: PlayerId, code: &str) -> Result<(), GameError> {
        self.with_round_start(code, |room| room.new_round(actor))
            .await
    }

    #[instrument(skip(self, cards))]
    pub async fn play(
        &self,
        actor: PlayerId,
        code: &str,
        cards: &[Card],
    ) -> Result<(), GameError> {
        self.with_room(code, |room| room.play(actor, cards)).await
    }

    #[instrument(skip(self))]
    pub async fn pass(&self, actor: PlayerId, code: &str) -> Result<(), GameError> {
        self.with_room(code, |room| room.pass(actor)).await
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, actor: PlayerId, code: &str, name: &str) -> Result<(), GameError> {
        self.with_room(code, |room| room.rename(actor, name)).await
    }

    #[instrument(skip(self))]
    pub async fn claim_host(&self, actor: PlayerId, code: &str) -> Result<(), GameError> {
        self.with_room(code, |room| room.claim_host(actor)).await
    }

    /// Implicit intent: the transport lost this player. They leave every
    /// room they occupy; emptied rooms are destroyed and their channels
    /// closed.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, player: PlayerId) {
        let outcomes = self.registry.remove_player_everywhere(player).await;
        for outcome in outcomes {
            if outcome.destroyed {
                self.publisher.close_room(&outcome.code).await;
                continue;
            }
            self.publisher.publish(&outcome.code, outcome.events).await;
            if let Some(token) = outcome.pending_spin {
                self.schedule_spin_commit(outcome.code, token);
            }
        }
    }

    /// Applies a plain room mutation and publishes what it produced.
    async fn with_room<F>(&self, code: &str, mutate: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Room) -> Result<Vec<Outbound>, GameError>,
    {
        let code = normalize_code(code);
        let room = self.registry.lookup(&code).await?;
        let events = {
            let mut room = room.lock().await;
            mutate(&mut room)?
        };
        self.publisher.publish(&code, events).await;
        Ok(())
    }

    /// Like `with_room`, but the mutation may leave a tie-break pending,
    /// in which case its deferred commit gets scheduled.
    async fn with_round_start<F>(&self, code: &str, mutate: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Room) -> Result<Vec<Outbound>, GameError>,
    {
        let code = normalize_code(code);
        let room = self.registry.lookup(&code).await?;
        let (events, pending_spin) = {
            let mut room = room.lock().await;
            let events = mutate(&mut room)?;
            (events, room.pending_spin_token())
        };
        self.publisher.publish(&code, events).await;
        if let Some(token) = pending_spin {
            self.schedule_spin_commit(code, token);
        }
        Ok(())
    }

    /// Commits the announced tie-break winner after the presentation
    /// delay. The token is re-checked against the room at fire time; a
    /// room that was torn down, re-dealt, or reshaped by a disconnect
    /// swallows the commit silently.
    fn schedule_spin_commit(&self, code: String, token: SpinToken) {
        let registry = Arc::clone(&self.registry);
        let publisher = Arc::clone(&self.publisher);
        debug!(room_code = %code, round = token.round, "tie-break commit scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(SPIN_COMMIT_DELAY).await;

            let Ok(room) = registry.lookup(&code).await else {
                debug!(room_code = %code, "tie-break commit dropped: room is gone");
                return;
            };
            let events = {
                let mut room = room.lock().await;
                match room.commit_spin(token) {
                    Some(events) => events,
                    None => {
                        debug!(room_code = %code, "tie-break commit dropped: stale token");
                        return;
                    }
                }
            };
            info!(room_code = %code, "tie-break winner committed");
            publisher.publish(&code, events).await;
        });
    }
}
