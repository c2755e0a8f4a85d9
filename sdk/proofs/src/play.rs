//! Move commitments
//!
//! A player commits to the card they will play before either side reveals.
//!
//! ```text
//! hash:       commit_hash = keccak(card_be4 ∥ salt)
//! ring:       commit_hash = keccak(card·G + salt·H)        + ring proof
//! aggregate:  commit_hash = keccak((Σ hand)·G + r_agg·H)    + hand proof
//! ```
//!
//! A player who cannot follow the led suit commits [`NO_COMPLIANT_MOVE`],
//! either with a plain hash commitment or with an aggregate hand proof.

use crate::aggregate::{AggregateProof, item_sum};
use crate::card::{Card, NO_COMPLIANT_MOVE, compliant_ids};
use crate::context::ProofContext;
use crate::dispatch::VerifierPolicy;
use crate::errors::{ProofError, Result};
use crate::field::{encode_point, pedersen_point, scalar_from_bytes};
use crate::hash::{keccak256, keccak256_concat};
use crate::pedersen::PedersenCommitment;
use crate::rng::{RandomSource, random_blinding};
use crate::ring::RingProof;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    Hash,
    Ring,
    Aggregate,
}

impl PlayMode {
    pub fn name(self) -> &'static str {
        match self {
            PlayMode::Hash => "hash",
            PlayMode::Ring => "ring",
            PlayMode::Aggregate => "aggregate",
        }
    }
}

/// `keccak(card_be4 ∥ salt)`
pub fn hash_play_commitment(card: u32, salt: &[u8; 32]) -> [u8; 32] {
    keccak256_concat(&[card.to_be_bytes().as_slice(), salt.as_slice()])
}

/// Card and salt held until the move is revealed.
///
/// For aggregate commitments the salt is the aggregate blinding and the
/// card is always [`NO_COMPLIANT_MOVE`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PlaySecret {
    #[zeroize(skip)]
    mode: PlayMode,
    card: u32,
    salt: [u8; 32],
}

impl PlaySecret {
    pub fn new(mode: PlayMode, card: u32, salt: [u8; 32]) -> Self {
        Self { mode, card, salt }
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn card(&self) -> u32 {
        self.card
    }

    pub fn salt(&self) -> &[u8; 32] {
        &self.salt
    }

    pub fn is_no_compliant(&self) -> bool {
        self.card == NO_COMPLIANT_MOVE
    }

    /// Recompute the commit hash this opening claims.
    ///
    /// `hand` is only read for aggregate openings.
    pub fn commit_hash(&self, hand: &[u32]) -> Result<[u8; 32]> {
        match self.mode {
            PlayMode::Hash => Ok(hash_play_commitment(self.card, &self.salt)),
            PlayMode::Ring => {
                Card::from_id(self.card)?;
                Ok(PedersenCommitment::commit_u32(self.card, &self.salt)?.commit_hash())
            }
            PlayMode::Aggregate => {
                if self.card != NO_COMPLIANT_MOVE {
                    return Err(ProofError::InvalidCard(self.card));
                }
                if hand.is_empty() {
                    return Err(ProofError::EmptyHand);
                }
                let point = pedersen_point(&item_sum(hand), &scalar_from_bytes(&self.salt));
                Ok(keccak256(&encode_point(&point)))
            }
        }
    }

    /// Check this opening against the commit hash published earlier.
    pub fn verify_opening(&self, published: &[u8; 32], hand: &[u32]) -> Result<()> {
        if &self.commit_hash(hand)? != published {
            return Err(ProofError::CommitmentMismatch);
        }
        Ok(())
    }
}

impl fmt::Debug for PlaySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaySecret")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Output of a move commitment
#[derive(Debug, Clone)]
pub struct PlayCommit {
    pub commit_hash: [u8; 32],
    pub proof: Option<Vec<u8>>,
    pub secret: PlaySecret,
}

/// Plain hash commitment; `None` commits the sentinel.
pub fn commit_hashed<R: RandomSource + ?Sized>(card: Option<u32>, rng: &mut R) -> PlayCommit {
    let card = card.unwrap_or(NO_COMPLIANT_MOVE);
    let salt = random_blinding(rng);
    PlayCommit {
        commit_hash: hash_play_commitment(card, &salt),
        proof: None,
        secret: PlaySecret::new(PlayMode::Hash, card, salt),
    }
}

/// Commit to `card` with a ring proof over the hand's cards of `trick_suit`.
pub fn commit_following<R: RandomSource + ?Sized>(
    card: u32,
    hand: &[u32],
    trick_suit: u32,
    policy: &VerifierPolicy,
    ctx: &ProofContext,
    rng: &mut R,
) -> Result<PlayCommit> {
    let valid_set = compliant_ids(hand, trick_suit);
    let salt = random_blinding(rng);
    let proof = RingProof::prove_bounded(card, &salt, &valid_set, policy.max_ring, ctx, rng)?;

    Ok(PlayCommit {
        commit_hash: proof.commitment.commit_hash(),
        proof: Some(proof.to_bytes()),
        secret: PlaySecret::new(PlayMode::Ring, card, salt),
    })
}

/// Declare no compliant card, proven over the whole hand.
pub fn commit_not_following<R: RandomSource + ?Sized>(
    hand: &[u32],
    trick_suit: u32,
    policy: &VerifierPolicy,
    ctx: &ProofContext,
    rng: &mut R,
) -> Result<PlayCommit> {
    let blindings: Vec<[u8; 32]> = hand.iter().map(|_| random_blinding(rng)).collect();
    let (proof, committed) =
        AggregateProof::prove_bounded(hand, &blindings, trick_suit, policy.max_hand, ctx, rng)?;

    Ok(PlayCommit {
        commit_hash: committed.commitment.commit_hash(),
        proof: Some(proof.to_bytes().to_vec()),
        secret: PlaySecret::new(
            PlayMode::Aggregate,
            NO_COMPLIANT_MOVE,
            committed.blinding_bytes(),
        ),
    })
}

/// Pick the commitment a move needs.
///
/// A chosen card gets a ring proof and needs a non-empty valid set. With
/// no card chosen the hand must hold nothing of the led suit; the sentinel
/// is then hash-committed.
pub fn commit_play<R: RandomSource + ?Sized>(
    card: Option<u32>,
    hand: &[u32],
    trick_suit: u32,
    policy: &VerifierPolicy,
    ctx: &ProofContext,
    rng: &mut R,
) -> Result<PlayCommit> {
    let valid_set = compliant_ids(hand, trick_suit);
    match card {
        Some(_) if valid_set.is_empty() => Err(ProofError::EmptyValidSet),
        Some(card) => commit_following(card, hand, trick_suit, policy, ctx, rng),
        None if !valid_set.is_empty() => Err(ProofError::SuitViolation {
            card: valid_set[0],
            suit: trick_suit,
        }),
        None => Ok(commit_hashed(None, rng)),
    }
}
