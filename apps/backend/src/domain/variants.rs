//! Game variant registry.
//!
//! Every declared gamemode tag has a `VariantId`, but only registered ids can
//! start a hand. Lookups for anything else fail closed with
//! `UNSUPPORTED_VARIANT`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::domain::{DomainError, ValidationKind};

/// Declared gamemode tags (`G_<players>H_<deal>_<partner rule>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantId {
    G2H4P,
    G2H6P,
    G3H10E,
    G4H8EBQ,
    G4H8EQ7,
    G4H8EFQ,
    G4H7E2BCA,
    G4H7E4BPA,
    G5HCA,
    G5HJD,
    G5HQJ,
    G5HFT,
    G6H5EDS,
    G6H5EJC,
    G7H4EJD,
    G7H4E2P,
    G7H4ELP,
    G7HDS,
    G8H4EBQ,
    G8H4EFQ,
}

const TAGS: &[(VariantId, &str)] = &[
    (VariantId::G2H4P, "G_2H_4P"),
    (VariantId::G2H6P, "G_2H_6P"),
    (VariantId::G3H10E, "G_3H_10E"),
    (VariantId::G4H8EBQ, "G_4H_8E_BQ"),
    (VariantId::G4H8EQ7, "G_4H_8E_Q7"),
    (VariantId::G4H8EFQ, "G_4H_8E_FQ"),
    (VariantId::G4H7E2BCA, "G_4H_7E_2B_CA"),
    (VariantId::G4H7E4BPA, "G_4H_7E_4B_PA"),
    (VariantId::G5HCA, "G_5H_CA"),
    (VariantId::G5HJD, "G_5H_JD"),
    (VariantId::G5HQJ, "G_5H_QJ"),
    (VariantId::G5HFT, "G_5H_FT"),
    (VariantId::G6H5EDS, "G_6H_5E_DS"),
    (VariantId::G6H5EJC, "G_6H_5E_JC"),
    (VariantId::G7H4EJD, "G_7H_4E_JD"),
    (VariantId::G7H4E2P, "G_7H_4E_2P"),
    (VariantId::G7H4ELP, "G_7H_4E_LP"),
    (VariantId::G7HDS, "G_7H_DS"),
    (VariantId::G8H4EBQ, "G_8H_4E_BQ"),
    (VariantId::G8H4EFQ, "G_8H_4E_FQ"),
];

impl VariantId {
    pub fn as_str(&self) -> &'static str {
        TAGS.iter()
            .find(|(id, _)| id == self)
            .map(|(_, tag)| *tag)
            .unwrap_or("G_UNKNOWN")
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAGS.iter()
            .find(|(_, tag)| *tag == s)
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::UnsupportedVariant,
                    format!("Unknown variant tag: {s}"),
                )
            })
    }
}

impl Serialize for VariantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VariantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: DomainError| serde::de::Error::custom(e.to_string()))
    }
}

/// One step of the deal, executed in order against the shuffled deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStep {
    /// Deal `n` cards to each player in seat order.
    Players(usize),
    /// Deal `n` cards into the blind.
    Blind(usize),
}

/// How the picker chooses a partner after burying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRule {
    /// Called-ace cascade (ace, unknown ace, ten, alone).
    CalledAce,
    /// No partner call; play begins right after the bury.
    NoCall,
}

/// Rules that drive dealing, bury size and the phase graph of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRules {
    pub id: VariantId,
    pub player_count: usize,
    pub deal: &'static [DealStep],
    pub bury_count: usize,
    pub call_rule: CallRule,
}

impl VariantRules {
    pub fn cards_per_player(&self) -> usize {
        self.deal
            .iter()
            .map(|step| match step {
                DealStep::Players(n) => *n,
                DealStep::Blind(_) => 0,
            })
            .sum()
    }

    pub fn blind_size(&self) -> usize {
        self.deal
            .iter()
            .map(|step| match step {
                DealStep::Blind(n) => *n,
                DealStep::Players(_) => 0,
            })
            .sum()
    }

    pub fn tricks_per_hand(&self) -> usize {
        self.cards_per_player()
    }
}

static FIVE_HANDED_CALLED_ACE: VariantRules = VariantRules {
    id: VariantId::G5HCA,
    player_count: 5,
    deal: &[DealStep::Players(3), DealStep::Blind(2), DealStep::Players(3)],
    bury_count: 2,
    call_rule: CallRule::CalledAce,
};

static REGISTRY: &[&VariantRules] = &[&FIVE_HANDED_CALLED_ACE];

/// Rules for a registered variant.
pub fn rules_for(id: VariantId) -> Result<&'static VariantRules, DomainError> {
    REGISTRY
        .iter()
        .find(|rules| rules.id == id)
        .copied()
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnsupportedVariant,
                format!("Variant {id} is not supported"),
            )
        })
}

/// All registered variants.
pub fn registered() -> impl Iterator<Item = VariantId> {
    REGISTRY.iter().map(|rules| rules.id)
}
