//! Card facts (effective suit, power, points) and trick comparison

use super::cards_types::{Card, PlaySuit, Rank, Suit};

impl Card {
    pub fn is_trump(&self) -> bool {
        matches!(self.rank, Rank::Queen | Rank::Jack) || self.suit == Suit::Diamonds
    }

    pub fn play_suit(&self) -> PlaySuit {
        if self.is_trump() {
            return PlaySuit::Trump;
        }
        match self.suit {
            Suit::Clubs => PlaySuit::Clubs,
            Suit::Spades => PlaySuit::Spades,
            Suit::Hearts => PlaySuit::Hearts,
            Suit::Diamonds => PlaySuit::Trump,
        }
    }

    /// Ordinal strength within the card's effective suit (1 = weakest).
    pub fn power(&self) -> u8 {
        match self.rank {
            Rank::Queen => 11 + queen_jack_offset(self.suit),
            Rank::Jack => 7 + queen_jack_offset(self.suit),
            Rank::Seven => 1,
            Rank::Eight => 2,
            Rank::Nine => 3,
            Rank::King => 4,
            Rank::Ten => 5,
            Rank::Ace => 6,
        }
    }

    pub fn points(&self) -> u8 {
        match self.rank {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
        }
    }
}

// Trump order among queens and jacks: D < H < S < C.
fn queen_jack_offset(suit: Suit) -> u8 {
    match suit {
        Suit::Diamonds => 0,
        Suit::Hearts => 1,
        Suit::Spades => 2,
        Suit::Clubs => 3,
    }
}

pub fn hand_has_play_suit(hand: &[Card], suit: PlaySuit) -> bool {
    hand.iter().any(|c| c.play_suit() == suit)
}

pub fn card_points(cards: &[Card]) -> u16 {
    cards.iter().map(|c| u16::from(c.points())).sum()
}

/// Whether `a` beats `b` in a trick led in `lead`.
pub fn card_beats(a: Card, b: Card, lead: PlaySuit) -> bool {
    let a_trump = a.is_trump();
    let b_trump = b.is_trump();
    if a_trump && !b_trump {
        return true;
    }
    if b_trump && !a_trump {
        return false;
    }
    if a_trump && b_trump {
        return a.power() > b.power();
    }
    let a_follows = a.play_suit() == lead;
    let b_follows = b.play_suit() == lead;
    if a_follows && !b_follows {
        return true;
    }
    if b_follows && !a_follows {
        return false;
    }
    if a_follows && b_follows {
        return a.power() > b.power();
    }
    false
}
