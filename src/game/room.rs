use rand::seq::IndexedRandom;

use super::cards::{deck, set, Card, CardSet, Rank, SetError, Suit};
use super::player::{sanitize_name, Player, PlayerId};
use super::roles;
use super::trick::Trick;
use crate::error::GameError;
use crate::event::Outbound;
use crate::protocol::{PlayerRef, PublicPlayer, RoomSnapshot, ServerEvent, SpinView};

/// A game cannot start (or re-deal) below this seat count.
pub const MIN_PLAYERS: usize = 2;

/// Identifies one scheduled tie-break commit. The epoch moves on every
/// spin start and every player removal, so a deferred commit that outlived
/// the state it was scheduled against no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinToken {
    pub round: u32,
    pub epoch: u64,
}

/// A pending start-of-round tie-break: several players hold the starting
/// card, the winner is already drawn, and the commit is deferred so
/// clients can animate the draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    pub candidates: Vec<PlayerId>,
    pub winner: PlayerId,
    pub token: SpinToken,
}

/// One room's complete game state. Every mutating method validates the
/// intent in full before touching anything, returns the outbound events
/// the mutation produced, and leaves the room unchanged on error.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    /// Seat order doubles as turn order and deal order.
    pub players: Vec<Player>,
    pub host: PlayerId,
    pub started: bool,
    pub deck_count: u8,
    pub trick: Trick,
    pub turn_idx: usize,
    pub passes_in_row: usize,
    pub finish_counter: u32,
    pub round: u32,
    pub spin: Option<Spin>,
    spin_epoch: u64,
}

impl Room {
    /// Creates a room with its creator seated as host and first player.
    pub fn new(code: String, host: Player) -> Self {
        let host_id = host.id;
        Self {
            code,
            players: vec![host],
            host: host_id,
            started: false,
            deck_count: 1,
            trick: Trick::open(None),
            turn_idx: 0,
            passes_in_row: 0,
            finish_counter: 1,
            round: 1,
            spin: None,
            spin_epoch: 0,
        }
    }

    pub fn join(&mut self, player: Player) -> Result<Vec<Outbound>, GameError> {
        if self.started {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.seat_of(player.id).is_some() {
            return Ok(vec![]);
        }
        self.players.push(player);
        Ok(vec![self.state_event()])
    }

    pub fn set_deck_count(
        &mut self,
        actor: PlayerId,
        count: u8,
    ) -> Result<Vec<Outbound>, GameError> {
        self.ensure_host(actor)?;
        self.deck_count = count.clamp(1, 2);
        Ok(vec![self.state_event()])
    }

    pub fn start(&mut self, actor: PlayerId) -> Result<Vec<Outbound>, GameError> {
        self.ensure_host(actor)?;
        if self.started {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        self.started = true;
        self.round = 1;
        for player in &mut self.players {
            player.role = None;
        }
        self.deal_round();
        Ok(self.begin_round())
    }

    /// Re-deals for the next round: swaps run on the fresh hands using the
    /// previous round's roles, then roles clear and the new leader is
    /// determined exactly as at game start.
    pub fn new_round(&mut self, actor: PlayerId) -> Result<Vec<Outbound>, GameError> {
        self.ensure_host(actor)?;
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        self.started = true;
        self.round += 1;
        self.deal_round();

        let mut events: Vec<Outbound> = roles::run_swaps(&mut self.players)
            .into_iter()
            .map(|(player, notice)| {
                Outbound::to(
                    player,
                    ServerEvent::SwapInfo {
                        given: notice.given,
                        received: notice.received,
                    },
                )
            })
            .collect();
        for player in &mut self.players {
            player.role = None;
        }

        events.extend(self.begin_round());
        Ok(events)
    }

    pub fn play(&mut self, actor: PlayerId, cards: &[Card]) -> Result<Vec<Outbound>, GameError> {
        let seat = self.ensure_turn(actor)?;
        if cards.is_empty() {
            return Err(SetError::Empty.into());
        }
        if cards.len() > set::MAX_SET_SIZE {
            return Err(SetError::TooLarge.into());
        }
        self.ensure_owned(seat, cards)?;
        let card_set = CardSet::from_cards(cards)?;
        self.trick.try_accept(actor, &card_set)?;

        // All checks passed; the hand mutation pairs with the trick update.
        Self::remove_cards(&mut self.players[seat].hand, cards);
        let mut events = vec![Outbound::to(
            actor,
            ServerEvent::HandUpdate {
                cards: self.players[seat].hand.clone(),
            },
        )];

        if self.players[seat].hand.is_empty() {
            let order = self.next_finish_order();
            let player = &mut self.players[seat];
            player.finished = true;
            player.finish_order = Some(order);
            events.push(Outbound::all(ServerEvent::PlayerFinished {
                player: actor,
                order,
            }));
        }

        if self.active_count() <= 1 {
            events.extend(self.finish_round());
            return Ok(events);
        }

        self.passes_in_row = 0;
        self.turn_idx = self.next_active_idx(self.turn_idx);
        events.push(self.state_event());
        Ok(events)
    }

    pub fn pass(&mut self, actor: PlayerId) -> Result<Vec<Outbound>, GameError> {
        let seat = self.ensure_turn(actor)?;
        self.passes_in_row += 1;
        self.turn_idx = self.next_active_idx(self.turn_idx);

        let mut events = Vec::new();
        if self.passes_in_row >= self.active_count().saturating_sub(1) {
            // Everyone else declined: the last successful player leads a
            // fresh trick. If that player has since finished, leadership
            // falls to the next active seat after them.
            let mut leader_idx = self
                .trick
                .last_play
                .as_ref()
                .and_then(|play| self.seat_of(play.player))
                .unwrap_or(seat);
            if self.players[leader_idx].finished {
                leader_idx = self.next_active_idx(leader_idx);
            }
            let leader = self.players[leader_idx].id;
            self.trick = Trick::open(Some(leader));
            self.passes_in_row = 0;
            self.turn_idx = leader_idx;
            events.push(Outbound::all(ServerEvent::TrickReset { leader }));
        }
        events.push(self.state_event());
        Ok(events)
    }

    pub fn rename(&mut self, actor: PlayerId, name: &str) -> Result<Vec<Outbound>, GameError> {
        let Some(seat) = self.seat_of(actor) else {
            return Ok(vec![]);
        };
        self.players[seat].name = sanitize_name(name);
        Ok(vec![self.state_event()])
    }

    /// Takes over hosting, but only when the seated host is actually gone.
    pub fn claim_host(&mut self, actor: PlayerId) -> Result<Vec<Outbound>, GameError> {
        if self.seat_of(actor).is_none() {
            return Err(GameError::NotHost);
        }
        if self.seat_of(self.host).is_some() {
            return Err(GameError::NotHost);
        }
        self.host = actor;
        Ok(vec![self.state_event()])
    }

    /// Removes a departing player. Their cards leave circulation, the host
    /// seat is re-assigned if needed, and the turn index is re-clamped
    /// into the remaining seat range. A pending tie-break is abandoned and
    /// the round leader re-determined among the players still present.
    ///
    /// Returns `None` when the player was not seated here; an empty room is
    /// left for the registry to destroy.
    pub fn remove_player(&mut self, player: PlayerId) -> Option<Vec<Outbound>> {
        let seat = self.seat_of(player)?;
        let was_host = self.host == player;
        let had_spin = self.spin.take().is_some();
        self.spin_epoch += 1;
        self.players.remove(seat);

        if self.players.is_empty() {
            return Some(vec![]);
        }
        if was_host {
            self.host = self.players[0].id;
        }
        self.turn_idx %= self.players.len();
        if self.players[self.turn_idx].finished && self.active_count() > 0 {
            self.turn_idx = self.next_active_idx(self.turn_idx);
        }

        if had_spin && self.started {
            return Some(self.begin_round());
        }
        Some(vec![self.state_event()])
    }

    /// Leader determination, run whenever a round's hands are fresh:
    /// the single holder of the lowest club leads; several holders go to a
    /// tie-break spin; no holder at all falls back to the lowest card
    /// overall.
    pub fn begin_round(&mut self) -> Vec<Outbound> {
        let starter = Card::new(Rank::Three, Suit::Clubs);
        let owners: Vec<usize> = (0..self.players.len())
            .filter(|&seat| self.players[seat].hand.contains(&starter))
            .collect();

        match owners.len() {
            1 => self.seat_leader(owners[0]),
            0 => {
                let lowest = (0..self.players.len())
                    .min_by_key(|&seat| {
                        self.players[seat]
                            .hand
                            .first()
                            .map(|card| card.rank as u8)
                            .unwrap_or(u8::MAX)
                    })
                    .unwrap_or(0);
                self.seat_leader(lowest)
            }
            _ => {
                let winner_seat = *owners
                    .choose(&mut rand::rng())
                    .expect("candidate list is non-empty");
                self.spin_epoch += 1;
                let spin = Spin {
                    candidates: owners.iter().map(|&seat| self.players[seat].id).collect(),
                    winner: self.players[winner_seat].id,
                    token: SpinToken {
                        round: self.round,
                        epoch: self.spin_epoch,
                    },
                };
                let event = ServerEvent::SpinStart {
                    candidates: owners
                        .iter()
                        .map(|&seat| self.player_ref(seat))
                        .collect(),
                    winner: spin.winner,
                };
                self.spin = Some(spin);
                vec![self.state_event(), Outbound::all(event)]
            }
        }
    }

    /// Applies a deferred tie-break result. Commits only when the token
    /// still matches the pending spin; anything stale is discarded without
    /// touching the room.
    pub fn commit_spin(&mut self, token: SpinToken) -> Option<Vec<Outbound>> {
        let spin = self.spin.as_ref()?;
        if spin.token != token {
            return None;
        }
        let winner_seat = self.seat_of(spin.winner)?;
        self.spin = None;
        Some(self.seat_leader(winner_seat))
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            host: self.host,
            started: self.started,
            players: (0..self.players.len())
                .map(|seat| self.public_player(seat))
                .collect(),
            trick: self.trick.clone(),
            turn: self.players.get(self.turn_idx).map(|p| p.id),
            round: self.round,
            deck_count: self.deck_count,
            spin: self.spin.as_ref().map(|spin| SpinView {
                candidates: spin
                    .candidates
                    .iter()
                    .filter_map(|&id| self.seat_of(id))
                    .map(|seat| self.player_ref(seat))
                    .collect(),
                winner: spin.winner,
            }),
        }
    }

    pub fn pending_spin_token(&self) -> Option<SpinToken> {
        self.spin.as_ref().map(|spin| spin.token)
    }

    fn deal_round(&mut self) {
        let hands = deck::deal(self.deck_count, self.players.len());
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
            player.finished = false;
            player.finish_order = None;
        }
        self.trick = Trick::open(None);
        self.passes_in_row = 0;
        self.finish_counter = 1;
    }

    fn seat_leader(&mut self, seat: usize) -> Vec<Outbound> {
        self.turn_idx = seat;
        self.trick.leader = Some(self.players[seat].id);
        let mut events = vec![self.state_event()];
        events.extend(self.players.iter().map(|player| {
            Outbound::to(
                player.id,
                ServerEvent::HandReveal {
                    cards: player.hand.clone(),
                },
            )
        }));
        events
    }

    fn finish_round(&mut self) -> Vec<Outbound> {
        if let Some(seat) = self.players.iter().position(|player| !player.finished) {
            let order = self.next_finish_order();
            let last = &mut self.players[seat];
            last.finished = true;
            last.finish_order = Some(order);
        }

        roles::assign_roles(&mut self.players);

        let mut ranking: Vec<usize> = (0..self.players.len()).collect();
        ranking.sort_by_key(|&seat| self.players[seat].finish_order.unwrap_or(u32::MAX));
        let n = ranking.len();
        for (idx, &seat) in ranking.iter().enumerate() {
            self.players[seat].score += (n - 1 - idx) as u32;
        }

        self.trick = Trick::open(None);
        self.passes_in_row = 0;

        let standings = ranking
            .iter()
            .map(|&seat| self.public_player(seat))
            .collect();
        let winner = self.players[ranking[0]].id;
        vec![
            Outbound::all(ServerEvent::RoundEnd { standings, winner }),
            self.state_event(),
        ]
    }

    /// Validates that `actor` may act right now: no tie-break pending, the
    /// turn is theirs, and they still hold cards.
    fn ensure_turn(&self, actor: PlayerId) -> Result<usize, GameError> {
        if self.spin.is_some() {
            return Err(GameError::NotYourTurn);
        }
        let current = &self.players[self.turn_idx];
        if current.id != actor {
            return Err(GameError::NotYourTurn);
        }
        if current.finished {
            return Err(GameError::PlayerFinished);
        }
        Ok(self.turn_idx)
    }

    fn ensure_host(&self, actor: PlayerId) -> Result<(), GameError> {
        if actor != self.host {
            return Err(GameError::NotHost);
        }
        Ok(())
    }

    /// Multiset ownership check: the hand must contain every requested
    /// card at least as often as it is requested.
    fn ensure_owned(&self, seat: usize, cards: &[Card]) -> Result<(), GameError> {
        let mut remaining = self.players[seat].hand.clone();
        for card in cards {
            match remaining.iter().position(|held| held == card) {
                Some(pos) => {
                    remaining.remove(pos);
                }
                None => return Err(GameError::CardNotOwned(*card)),
            }
        }
        Ok(())
    }

    fn remove_cards(hand: &mut Vec<Card>, cards: &[Card]) {
        for card in cards {
            if let Some(pos) = hand.iter().position(|held| held == card) {
                hand.remove(pos);
            }
        }
    }

    fn next_active_idx(&self, from: usize) -> usize {
        let n = self.players.len();
        let mut idx = from;
        for _ in 0..n {
            idx = (idx + 1) % n;
            if !self.players[idx].finished {
                return idx;
            }
        }
        from
    }

    fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.finished).count()
    }

    fn next_finish_order(&mut self) -> u32 {
        let order = self.finish_counter;
        self.finish_counter += 1;
        order
    }

    fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    fn public_player(&self, seat: usize) -> PublicPlayer {
        let player = &self.players[seat];
        PublicPlayer {
            id: player.id,
            name: player.name.clone(),
            hand_count: player.hand.len(),
            finished: player.finished,
            finish_order: player.finish_order,
            role: player.role,
            score: player.score,
        }
    }

    fn player_ref(&self, seat: usize) -> PlayerRef {
        let player = &self.players[seat];
        PlayerRef {
            id: player.id,
            name: player.name.clone(),
        }
    }

    fn state_event(&self) -> Outbound {
        Outbound::all(ServerEvent::State(self.snapshot()))
    }
}
