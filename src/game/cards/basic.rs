use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl PartialOrd for Suit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Clubs => "C",
                Suit::Diamonds => "D",
                Suit::Hearts => "H",
                Suit::Spades => "S",
            }
        )
    }
}

impl TryFrom<&str> for Suit {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "C" => Ok(Suit::Clubs),
            "D" => Ok(Suit::Diamonds),
            "H" => Ok(Suit::Hearts),
            "S" => Ok(Suit::Spades),
            _ => Err(s.to_string()),
        }
    }
}

/// Ranks in game order: Three is lowest, Two is highest and wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Rank {
    Three = 0,
    Four = 1,
    Five = 2,
    Six = 3,
    Seven = 4,
    Eight = 5,
    Nine = 6,
    Ten = 7,
    Jack = 8,
    Queen = 9,
    King = 10,
    Ace = 11,
    Two = 12,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Rank::Three => "3",
                Rank::Four => "4",
                Rank::Five => "5",
                Rank::Six => "6",
                Rank::Seven => "7",
                Rank::Eight => "8",
                Rank::Nine => "9",
                Rank::Ten => "10",
                Rank::Jack => "J",
                Rank::Queen => "Q",
                Rank::King => "K",
                Rank::Ace => "A",
                Rank::Two => "2",
            }
        )
    }
}

impl TryFrom<&str> for Rank {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            "2" => Ok(Rank::Two),
            _ => Err(s.to_string()),
        }
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rank::try_from(s.as_str())
            .map_err(|bad| serde::de::Error::custom(format!("invalid rank: {bad}")))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid card code: {0}")]
pub struct ParseCardError(String);

/// A single card. Rooms running two decks hold duplicate cards, so
/// equality is by (rank, suit) and never by physical identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.rank.cmp(&other.rank) {
            std::cmp::Ordering::Equal => self.suit.cmp(&other.suit),
            other => other,
        }
    }
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Twos are wild: they may complete a set of any rank.
    pub fn is_wild(&self) -> bool {
        self.rank == Rank::Two
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses the compact wire form, e.g. "3C", "10H", "2S".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 2 || !s.is_ascii() {
            return Err(ParseCardError(s.to_string()));
        }
        let (rank_part, suit_part) = s.split_at(s.len() - 1);
        let rank = Rank::try_from(rank_part).map_err(|_| ParseCardError(s.to_string()))?;
        let suit = Suit::try_from(suit_part).map_err(|_| ParseCardError(s.to_string()))?;
        Ok(Self::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_card_ordering() {
        let card1 = Card::new(Rank::Three, Suit::Clubs);
        let card2 = Card::new(Rank::Three, Suit::Spades);
        let card3 = Card::new(Rank::Two, Suit::Clubs);

        assert!(card2 > card1); // Same rank, higher suit
        assert!(card3 > card1); // Higher rank
        assert!(card3 > card2); // Higher rank beats higher suit
    }

    #[test]
    fn test_two_is_the_highest_rank_and_wild() {
        assert!(Rank::Two > Rank::Ace);
        assert!(Card::new(Rank::Two, Suit::Hearts).is_wild());
        assert!(!Card::new(Rank::Ace, Suit::Hearts).is_wild());
    }

    #[test]
    fn test_suit_tiebreak_order() {
        assert!(Suit::Clubs < Suit::Diamonds);
        assert!(Suit::Diamonds < Suit::Hearts);
        assert!(Suit::Hearts < Suit::Spades);
    }

    #[test]
    fn test_card_from_str() {
        let king_hearts: Card = "KH".parse().unwrap();
        assert_eq!(king_hearts.rank, Rank::King);
        assert_eq!(king_hearts.suit, Suit::Hearts);

        let ten_clubs: Card = "10C".parse().unwrap();
        assert_eq!(ten_clubs.rank, Rank::Ten);
        assert_eq!(ten_clubs.suit, Suit::Clubs);

        assert!("ZH".parse::<Card>().is_err()); // Invalid rank
        assert!("KX".parse::<Card>().is_err()); // Invalid suit
        assert!("K".parse::<Card>().is_err()); // Too short
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for rank in Rank::iter() {
            for suit in Suit::iter() {
                let card = Card::new(rank, suit);
                let parsed: Card = card.to_string().parse().unwrap();
                assert_eq!(card, parsed);
            }
        }
    }

    #[test]
    fn test_card_serde_uses_compact_codes() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"10D\"");

        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);

        assert!(serde_json::from_str::<Card>("\"11D\"").is_err());
    }

    #[test]
    fn test_rank_serde() {
        assert_eq!(serde_json::to_string(&Rank::Ten).unwrap(), "\"10\"");
        let back: Rank = serde_json::from_str("\"J\"").unwrap();
        assert_eq!(back, Rank::Jack);
    }
}
