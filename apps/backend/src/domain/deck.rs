//! Deck construction and unbiased shuffling.
//!
//! Production shuffles draw from a fresh ChaCha20 generator seeded from the
//! operating system for every call, so no generator state survives between
//! hands. Tests inject a seeded generator through the same `Shuffler` seam.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::cards_types::{catalog, Card, CATALOG_SIZE};
use crate::errors::domain::DomainError;

/// Produces a permutation of the given deck.
pub trait Shuffler: Send + Sync {
    fn shuffle(&self, deck: &mut [Card]);
}

/// Cryptographically seeded shuffler used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsShuffler;

impl Shuffler for OsShuffler {
    fn shuffle(&self, deck: &mut [Card]) {
        let mut rng = ChaCha20Rng::from_os_rng();
        shuffle_with(deck, &mut rng);
    }
}

/// In-place Fisher-Yates: for i from len-1 down to 1, swap i with a uniform
/// index in [0, i].
pub fn shuffle_with<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    for i in (1..deck.len()).rev() {
        let j = rng.random_range(0..=i);
        deck.swap(i, j);
    }
}

/// Check that a loaded catalog is exactly the built-in 32-card catalog.
pub fn validate_catalog(cards: &[Card]) -> Result<(), DomainError> {
    if cards.len() != CATALOG_SIZE {
        return Err(DomainError::invariant(format!(
            "card catalog has {} cards, expected {CATALOG_SIZE}",
            cards.len()
        )));
    }
    let mut loaded = cards.to_vec();
    loaded.sort();
    let mut expected = catalog();
    expected.sort();
    if loaded != expected {
        return Err(DomainError::invariant(
            "card catalog does not match the built-in catalog",
        ));
    }
    Ok(())
}

/// Fresh shuffled copy of the catalog.
pub fn shuffled_deck(catalog: &[Card], shuffler: &dyn Shuffler) -> Vec<Card> {
    let mut deck = catalog.to_vec();
    shuffler.shuffle(&mut deck);
    deck
}
