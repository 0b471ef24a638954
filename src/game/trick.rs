use serde::{Deserialize, Serialize};

use super::cards::{Card, CardSet, Rank};
use super::player::PlayerId;
use crate::error::GameError;

/// One accepted play: who played it and the cards on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub player: PlayerId,
    pub cards: Vec<Card>,
}

/// Table state for the currently contested combination. The trick is Open
/// while `count` is unset and Contested once a play stands.
///
/// `pile` is a display log of the current trick only; the rules never
/// consult it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    pub leader: Option<PlayerId>,
    pub count: Option<usize>,
    pub top_rank: Option<Rank>,
    pub last_play: Option<Play>,
    pub pile: Vec<Play>,
}

impl Trick {
    pub fn open(leader: Option<PlayerId>) -> Self {
        Self {
            leader,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.count.is_none()
    }

    /// Applies a validated set as the new top play, or rejects it without
    /// changing anything. A challenge must bring at least `count` cards at
    /// `top_rank` or better; an accepted larger play raises `count` for the
    /// rest of the trick, never lowers it.
    pub fn try_accept(&mut self, player: PlayerId, set: &CardSet) -> Result<(), GameError> {
        if let (Some(count), Some(top_rank)) = (self.count, self.top_rank) {
            if set.size() < count {
                return Err(GameError::BelowRequiredCount { required: count });
            }
            if set.effective_rank() < top_rank {
                return Err(GameError::BelowRequiredRank);
            }
            self.count = Some(count.max(set.size()));
        } else {
            self.count = Some(set.size());
        }
        self.top_rank = Some(set.effective_rank());

        let play = Play {
            player,
            cards: set.cards().to_vec(),
        };
        self.last_play = Some(play.clone());
        self.pile.push(play);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> CardSet {
        let cards: Vec<Card> = codes.iter().map(|c| c.parse().unwrap()).collect();
        CardSet::from_cards(&cards).unwrap()
    }

    #[test]
    fn test_first_play_opens_the_contest() {
        let mut trick = Trick::open(None);
        assert!(trick.is_open());

        let player = PlayerId::new();
        trick.try_accept(player, &set(&["7C", "7D"])).unwrap();

        assert!(!trick.is_open());
        assert_eq!(trick.count, Some(2));
        assert_eq!(trick.top_rank, Some(Rank::Seven));
        assert_eq!(trick.last_play.as_ref().unwrap().player, player);
        assert_eq!(trick.pile.len(), 1);
    }

    #[test]
    fn test_challenge_below_count_rejected_unchanged() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["7C", "7D"])).unwrap();
        let before = trick.clone();

        let result = trick.try_accept(PlayerId::new(), &set(&["KH"]));
        assert_eq!(result, Err(GameError::BelowRequiredCount { required: 2 }));
        assert_eq!(trick, before);
    }

    #[test]
    fn test_challenge_below_rank_rejected_unchanged() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["9C"])).unwrap();
        let before = trick.clone();

        let result = trick.try_accept(PlayerId::new(), &set(&["8H"]));
        assert_eq!(result, Err(GameError::BelowRequiredRank));
        assert_eq!(trick, before);
    }

    #[test]
    fn test_equal_rank_and_count_is_accepted() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["9C"])).unwrap();
        trick.try_accept(PlayerId::new(), &set(&["9H"])).unwrap();
        assert_eq!(trick.top_rank, Some(Rank::Nine));
    }

    #[test]
    fn test_count_ratchets_up_and_never_down() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["7C"])).unwrap();
        trick
            .try_accept(PlayerId::new(), &set(&["9C", "9D", "9H"]))
            .unwrap();
        assert_eq!(trick.count, Some(3));

        // A later single is no longer enough, even at a higher rank.
        let result = trick.try_accept(PlayerId::new(), &set(&["AH"]));
        assert_eq!(result, Err(GameError::BelowRequiredCount { required: 3 }));
    }

    #[test]
    fn test_wild_set_beats_everything_at_size() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["AC", "AD"])).unwrap();
        trick.try_accept(PlayerId::new(), &set(&["2C", "2D"])).unwrap();
        assert_eq!(trick.top_rank, Some(Rank::Two));
    }

    #[test]
    fn test_pile_logs_every_accepted_play() {
        let mut trick = Trick::open(None);
        trick.try_accept(PlayerId::new(), &set(&["7C"])).unwrap();
        trick.try_accept(PlayerId::new(), &set(&["8C"])).unwrap();
        trick.try_accept(PlayerId::new(), &set(&["KC"])).unwrap();
        assert_eq!(trick.pile.len(), 3);
        assert_eq!(trick.last_play, trick.pile.last().cloned());
    }
}
