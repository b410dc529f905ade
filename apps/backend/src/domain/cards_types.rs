//! Core card-related types: Card, Rank, Suit, PlaySuit

/// Natural suit printed on the card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Spades,
    Hearts,
    Diamonds,
}

/// Effective suit used for following and calling. Every queen, every jack and
/// every diamond belongs to `Trump`; the rest keep their natural fail suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PlaySuit {
    Trump,
    Clubs,
    Spades,
    Hearts,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    King,
    Ten,
    Ace,
    Jack,
    Queen,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

/// Power of an ace within its effective suit.
pub const ACE_POWER: u8 = 6;
/// Power of a ten within its effective suit.
pub const TEN_POWER: u8 = 5;
/// Cards in the catalog.
pub const CATALOG_SIZE: usize = 32;
/// Card points in the catalog.
pub const CATALOG_POINTS: u16 = 120;

pub const SUITS: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];
pub const RANKS: [Rank; 8] = [
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::King,
    Rank::Ten,
    Rank::Ace,
    Rank::Jack,
    Rank::Queen,
];

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

// Note: Ord on Card is only for stable sorting and map keys: suit order C<S<H<D
// then rank order. Trick resolution uses `power()` and `play_suit()` instead.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The fixed 32-card catalog in canonical order (suit-major).
pub fn catalog() -> Vec<Card> {
    SUITS
        .iter()
        .flat_map(|&suit| RANKS.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}
