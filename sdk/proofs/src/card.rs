//! Card identifiers
//!
//! ```text
//! id   = suit * 9 + (rank - 2)      suit ∈ 0..4, rank ∈ 2..=10
//! suit = id / 9
//! rank = id % 9 + 2
//! ```

use crate::errors::{ProofError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUITS: u32 = 4;
pub const RANKS_PER_SUIT: u32 = 9;
pub const MIN_RANK: u32 = 2;
pub const MAX_RANK: u32 = 10;
pub const DECK_SIZE: u32 = SUITS * RANKS_PER_SUIT;

/// Reserved id committed when a player holds no card of the led suit
pub const NO_COMPLIANT_MOVE: u32 = u32::MAX;

/// A card in the 36-card deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card(u32);

impl Card {
    pub fn new(suit: u32, rank: u32) -> Result<Self> {
        if suit >= SUITS {
            return Err(ProofError::InvalidSuit(suit));
        }
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(ProofError::InvalidCard(suit * RANKS_PER_SUIT + rank));
        }
        Ok(Self(suit * RANKS_PER_SUIT + (rank - MIN_RANK)))
    }

    pub fn from_id(id: u32) -> Result<Self> {
        if id >= DECK_SIZE {
            return Err(ProofError::InvalidCard(id));
        }
        Ok(Self(id))
    }

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn suit(self) -> u32 {
        self.0 / RANKS_PER_SUIT
    }

    pub fn rank(self) -> u32 {
        self.0 % RANKS_PER_SUIT + MIN_RANK
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.suit(), self.rank())
    }
}

/// Check a suit index.
pub fn check_suit(suit: u32) -> Result<()> {
    if suit >= SUITS {
        return Err(ProofError::InvalidSuit(suit));
    }
    Ok(())
}

/// Ids in `hand` that follow `suit`, in hand order.
///
/// This is the public valid set a ring proof ranges over. An empty result
/// means the player must commit [`NO_COMPLIANT_MOVE`] instead.
pub fn compliant_ids(hand: &[u32], suit: u32) -> Vec<u32> {
    hand.iter()
        .copied()
        .filter(|&id| id < DECK_SIZE && id / RANKS_PER_SUIT == suit)
        .collect()
}
