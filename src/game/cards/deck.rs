use rand::seq::SliceRandom;
use strum::IntoEnumIterator;

use super::basic::{Card, Rank, Suit};

/// Builds the flat card multiset for `deck_count` copies of a 52-card deck.
pub fn full_deck(deck_count: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(52 * deck_count as usize);
    for _ in 0..deck_count {
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card::new(rank, suit));
            }
        }
    }
    cards
}

/// Shuffles the full multiset and deals it round-robin starting at seat 0.
/// Hand sizes differ by at most one; every hand comes back sorted.
pub fn deal(deck_count: u8, seats: usize) -> Vec<Vec<Card>> {
    let mut cards = full_deck(deck_count);
    cards.shuffle(&mut rand::rng());

    let mut hands = vec![Vec::new(); seats];
    for (i, card) in cards.into_iter().enumerate() {
        hands[i % seats].push(card);
    }
    for hand in &mut hands {
        hand.sort();
    }
    hands
}
