use thiserror::Error;

use super::basic::{Card, Rank};

/// Largest playable set: a quad of one rank.
pub const MAX_SET_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("a play must contain at least one card")]
    Empty,
    #[error("a play may contain at most {MAX_SET_SIZE} cards")]
    TooLarge,
    #[error("all non-wild cards in a play must share one rank")]
    MixedRanks,
}

/// A validated simultaneous play: 1-4 cards of one rank, where twos may
/// stand in for any rank. A set of only twos counts as a set of twos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSet {
    cards: Vec<Card>,
    effective_rank: Rank,
}

impl CardSet {
    pub fn from_cards(cards: &[Card]) -> Result<Self, SetError> {
        if cards.is_empty() {
            return Err(SetError::Empty);
        }
        if cards.len() > MAX_SET_SIZE {
            return Err(SetError::TooLarge);
        }

        let mut natural = cards.iter().filter(|c| !c.is_wild()).map(|c| c.rank);
        let effective_rank = match natural.next() {
            None => Rank::Two,
            Some(rank) => {
                if natural.any(|r| r != rank) {
                    return Err(SetError::MixedRanks);
                }
                rank
            }
        };

        Ok(Self {
            cards: cards.to_vec(),
            effective_rank,
        })
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    /// The rank this set competes at: the shared non-wild rank, or the
    /// wild rank when the set is all twos.
    pub fn effective_rank(&self) -> Rank {
        self.effective_rank
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Suit;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_single_and_plain_sets_are_valid() {
        for codes in [
            vec!["7D"],
            vec!["7D", "7H"],
            vec!["7D", "7H", "7S"],
            vec!["7D", "7H", "7S", "7C"],
        ] {
            let set = CardSet::from_cards(&cards(&codes)).unwrap();
            assert_eq!(set.effective_rank(), Rank::Seven);
            assert_eq!(set.size(), codes.len());
        }
    }

    #[test]
    fn test_wilds_fill_in_for_the_natural_rank() {
        let set = CardSet::from_cards(&cards(&["9C", "2H"])).unwrap();
        assert_eq!(set.effective_rank(), Rank::Nine);

        let set = CardSet::from_cards(&cards(&["9C", "9D", "2H", "2S"])).unwrap();
        assert_eq!(set.effective_rank(), Rank::Nine);
    }

    #[test]
    fn test_all_wild_set_ranks_as_twos() {
        let set = CardSet::from_cards(&cards(&["2C", "2H"])).unwrap();
        assert_eq!(set.effective_rank(), Rank::Two);
    }

    #[test]
    fn test_mixed_natural_ranks_rejected() {
        assert_eq!(
            CardSet::from_cards(&cards(&["7D", "8D"])),
            Err(SetError::MixedRanks)
        );
        assert_eq!(
            CardSet::from_cards(&cards(&["7D", "2H", "8D"])),
            Err(SetError::MixedRanks)
        );
    }

    #[test]
    fn test_size_limits() {
        assert_eq!(CardSet::from_cards(&[]), Err(SetError::Empty));
        assert_eq!(
            CardSet::from_cards(&[Card::new(Rank::Seven, Suit::Clubs); 5]),
            Err(SetError::TooLarge)
        );
    }

    #[test]
    fn test_validity_matches_shared_rank_rule() {
        // For any 1-4 card subset: valid iff the non-wild cards share a rank.
        let pool = cards(&["3C", "3D", "4C", "2H", "2S"]);
        for a in 0..pool.len() {
            for b in a + 1..pool.len() {
                let pick = [pool[a], pool[b]];
                let naturals: Vec<Rank> = pick
                    .iter()
                    .filter(|c| !c.is_wild())
                    .map(|c| c.rank)
                    .collect();
                let expect_ok = naturals.windows(2).all(|w| w[0] == w[1]);
                assert_eq!(
                    CardSet::from_cards(&pick).is_ok(),
                    expect_ok,
                    "pick {:?}",
                    pick
                );
            }
        }
    }
}
