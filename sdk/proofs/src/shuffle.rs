//! Fair deck derivation
//!
//! Once both seed hashes are revealed either party can rebuild the deck:
//!
//! ```text
//! shuffle_seed = keccak(seed_hash_1 ∥ seed_hash_2 ∥ session_be4)
//! deck         = fisher_yates([0, 36), ChaCha20(shuffle_seed))
//! ```

use crate::card::DECK_SIZE;
use crate::errors::{ProofError, Result};
use crate::hash::keccak256_concat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Cards dealt to each player
pub const DEFAULT_HAND_SIZE: usize = 5;

/// Combine both revealed seed hashes for one session.
pub fn shuffle_seed(first: &[u8; 32], second: &[u8; 32], session_id: u32) -> [u8; 32] {
    keccak256_concat(&[
        first.as_slice(),
        second.as_slice(),
        session_id.to_be_bytes().as_slice(),
    ])
}

/// Deterministic Fisher-Yates over the full deck
pub fn shuffle_deck(seed: &[u8; 32]) -> Vec<u32> {
    let mut rng = ChaCha20Rng::from_seed(*seed);
    let mut deck: Vec<u32> = (0..DECK_SIZE).collect();
    for i in (1..deck.len()).rev() {
        let j = rng.gen_range(0..=i);
        deck.swap(i, j);
    }
    deck
}

/// Two hands and the remaining draw pile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub first: Vec<u32>,
    pub second: Vec<u32>,
    pub draw_pile: Vec<u32>,
}

/// Deal `hand_size` cards to each player from the top of `deck`.
pub fn deal(deck: &[u32], hand_size: usize) -> Result<Deal> {
    if hand_size == 0 || hand_size * 2 > deck.len() {
        return Err(ProofError::HandTooLarge {
            size: hand_size,
            max: deck.len() / 2,
        });
    }
    Ok(Deal {
        first: deck[..hand_size].to_vec(),
        second: deck[hand_size..2 * hand_size].to_vec(),
        draw_pile: deck[2 * hand_size..].to_vec(),
    })
}
