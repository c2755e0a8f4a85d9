//! Aggregate hand proof
//!
//! Commits to a whole hand at once and proves knowledge of the combined
//! blinding, bound to the trick suit the hand claims not to follow.
//!
//! ```text
//! A     = Σ (card_i·G + r_i·H) = (Σ card_i)·G + r_agg·H
//! R     = k·H
//! e     = Fr(keccak(A ∥ R ∥ suit_be4 ∥ count_be4 ∥ session_be4 ∥ player ∥ "ZKP8"))
//! z     = k + e·r_agg
//! proof = count_be4 ∥ A ∥ R ∥ z                  (228 bytes)
//!
//! verify: z·H == R + e·(A − (Σ card_i)·G)
//! ```
//!
//! The proof only shows a consistent opening of `A` to the revealed hand.
//! Suit exclusion is checked by the verifier against the revealed cards.

use crate::card::{Card, check_suit};
use crate::context::ProofContext;
use crate::errors::{ProofError, Result};
use crate::field::{
    POINT_LEN, SCALAR_LEN, blinding_scalar, decode_point, decode_scalar, encode_point, mul_g,
    mul_h, pedersen_point, scalar_from_u32, scalar_to_bytes,
};
use crate::hash::{TAG_AGGREGATE, Transcript};
use crate::pedersen::PedersenCommitment;
use crate::rng::{RandomSource, random_scalar};
use ark_bls12_381::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::Zero;

/// Encoded proof width
pub const AGGREGATE_PROOF_LEN: usize = 4 + 2 * POINT_LEN + SCALAR_LEN;

/// Default hand bound
pub const DEFAULT_MAX_HAND: usize = 18;

/// Sum of item ids as a scalar
pub fn item_sum(items: &[u32]) -> Fr {
    items.iter().map(|&id| scalar_from_u32(id)).sum()
}

/// Combined commitment to a hand plus its aggregate blinding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandCommitment {
    pub commitment: PedersenCommitment,
    pub blinding: Fr,
    pub count: u32,
}

impl HandCommitment {
    /// Sum per-card commitments, one blinding per card.
    pub fn commit(items: &[u32], blindings: &[[u8; 32]]) -> Result<Self> {
        if items.is_empty() {
            return Err(ProofError::EmptyHand);
        }
        if items.len() != blindings.len() {
            return Err(ProofError::BlindingCountMismatch {
                items: items.len(),
                blindings: blindings.len(),
            });
        }

        let mut acc = G1Projective::zero();
        let mut r_agg = Fr::zero();
        for (&item, blinding) in items.iter().zip(blindings) {
            let r = blinding_scalar(blinding)?;
            acc += pedersen_point(&scalar_from_u32(item), &r);
            r_agg += r;
        }
        if r_agg.is_zero() {
            return Err(ProofError::ZeroBlinding);
        }

        Ok(Self {
            commitment: PedersenCommitment::from_point(acc.into_affine()),
            blinding: r_agg,
            count: items.len() as u32,
        })
    }

    pub fn blinding_bytes(&self) -> [u8; 32] {
        scalar_to_bytes(&self.blinding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateProof {
    pub count: u32,
    pub commitment: PedersenCommitment,
    pub nonce_point: G1Affine,
    pub response: Fr,
}

fn challenge(
    commitment: &PedersenCommitment,
    nonce_point: &G1Affine,
    trick_suit: u32,
    count: u32,
    ctx: &ProofContext,
) -> Fr {
    let mut t = Transcript::new();
    t.append_point(commitment.point())
        .append_point(nonce_point)
        .append_u32(trick_suit)
        .append_u32(count);
    ctx.bind(&mut t);
    t.append(&TAG_AGGREGATE);
    t.challenge_scalar()
}

/// Every card is in the deck and off the excluded suit.
fn check_exclusion(items: &[u32], trick_suit: u32) -> Result<()> {
    check_suit(trick_suit)?;
    for &id in items {
        let card = Card::from_id(id)?;
        if card.suit() == trick_suit {
            return Err(ProofError::SuitViolation {
                card: id,
                suit: trick_suit,
            });
        }
    }
    Ok(())
}

fn check_hand_size(len: usize, max_hand: usize) -> Result<()> {
    if len == 0 {
        return Err(ProofError::EmptyHand);
    }
    if len > max_hand {
        return Err(ProofError::HandTooLarge {
            size: len,
            max: max_hand,
        });
    }
    Ok(())
}

impl AggregateProof {
    /// Prove a hand with none of `trick_suit`, default hand bound.
    pub fn prove<R: RandomSource + ?Sized>(
        items: &[u32],
        blindings: &[[u8; 32]],
        trick_suit: u32,
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<(Self, HandCommitment)> {
        Self::prove_bounded(items, blindings, trick_suit, DEFAULT_MAX_HAND, ctx, rng)
    }

    pub fn prove_bounded<R: RandomSource + ?Sized>(
        items: &[u32],
        blindings: &[[u8; 32]],
        trick_suit: u32,
        max_hand: usize,
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<(Self, HandCommitment)> {
        check_hand_size(items.len(), max_hand)?;
        check_exclusion(items, trick_suit)?;
        let hand = HandCommitment::commit(items, blindings)?;

        let k = random_scalar(rng);
        let nonce_point = mul_h(&k).into_affine();
        let e = challenge(&hand.commitment, &nonce_point, trick_suit, hand.count, ctx);

        let proof = Self {
            count: hand.count,
            commitment: hand.commitment,
            nonce_point,
            response: k + e * hand.blinding,
        };
        Ok((proof, hand))
    }

    /// Verify against the revealed hand.
    pub fn verify(&self, hand: &[u32], trick_suit: u32, ctx: &ProofContext) -> Result<()> {
        self.verify_bounded(hand, trick_suit, DEFAULT_MAX_HAND, ctx)
    }

    pub fn verify_bounded(
        &self,
        hand: &[u32],
        trick_suit: u32,
        max_hand: usize,
        ctx: &ProofContext,
    ) -> Result<()> {
        if self.count as usize != hand.len() {
            return Err(ProofError::SizeMismatch {
                proof: self.count as usize,
                statement: hand.len(),
            });
        }
        check_hand_size(hand.len(), max_hand)?;
        check_exclusion(hand, trick_suit)?;

        let delta = self.commitment.point().into_group() - mul_g(&item_sum(hand));
        let e = challenge(&self.commitment, &self.nonce_point, trick_suit, self.count, ctx);

        if mul_h(&self.response) != delta * e + self.nonce_point {
            return Err(ProofError::SigmaCheckFailed);
        }
        Ok(())
    }

    /// Check the embedded commitment against the published hash, then the proof.
    pub fn verify_published(
        &self,
        commit_hash: &[u8; 32],
        hand: &[u32],
        trick_suit: u32,
        max_hand: usize,
        ctx: &ProofContext,
    ) -> Result<()> {
        if &self.commitment.commit_hash() != commit_hash {
            return Err(ProofError::CommitmentMismatch);
        }
        self.verify_bounded(hand, trick_suit, max_hand, ctx)
    }

    pub fn to_bytes(&self) -> [u8; AGGREGATE_PROOF_LEN] {
        let mut out = [0u8; AGGREGATE_PROOF_LEN];
        out[..4].copy_from_slice(&self.count.to_be_bytes());
        out[4..4 + POINT_LEN].copy_from_slice(&self.commitment.to_bytes());
        out[4 + POINT_LEN..4 + 2 * POINT_LEN].copy_from_slice(&encode_point(&self.nonce_point));
        out[4 + 2 * POINT_LEN..].copy_from_slice(&scalar_to_bytes(&self.response));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != AGGREGATE_PROOF_LEN {
            return Err(ProofError::InvalidLength {
                what: "aggregate proof",
                expected: AGGREGATE_PROOF_LEN,
                got: bytes.len(),
            });
        }
        let mut count = [0u8; 4];
        count.copy_from_slice(&bytes[..4]);
        Ok(Self {
            count: u32::from_be_bytes(count),
            commitment: PedersenCommitment::from_bytes(&bytes[4..4 + POINT_LEN])?,
            nonce_point: decode_point(&bytes[4 + POINT_LEN..4 + 2 * POINT_LEN])?,
            response: decode_scalar(&bytes[4 + 2 * POINT_LEN..])?,
        })
    }
}
