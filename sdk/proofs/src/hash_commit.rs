//! Compact hash-based seed commitment
//!
//! ```text
//! commitment = keccak(seed_hash ∥ blinding ∥ player)
//! challenge  = keccak(commitment ∥ session_be4 ∥ player ∥ "ZKV2")
//! response   = keccak(seed_hash ∥ challenge ∥ blinding)
//! proof      = blinding ∥ response                      (64 bytes)
//! ```
//!
//! The published commit hash in this mode is the commitment itself.

use crate::context::ProofContext;
use crate::errors::{ProofError, Result};
use crate::field::blinding_scalar;
use crate::hash::{TAG_HASH_SEED, Transcript, keccak256_concat};
use crate::seed::{MIN_SEED_ENTROPY, check_entropy};

/// Encoded proof width
pub const HASH_PROOF_LEN: usize = 64;

/// `keccak(seed_hash ∥ blinding ∥ player)`
pub fn commitment(seed_hash: &[u8; 32], blinding: &[u8; 32], player: &[u8]) -> [u8; 32] {
    keccak256_concat(&[seed_hash.as_slice(), blinding.as_slice(), player])
}

fn challenge(commitment: &[u8; 32], ctx: &ProofContext) -> [u8; 32] {
    let mut t = Transcript::new();
    t.append(commitment);
    ctx.bind(&mut t);
    t.append(&TAG_HASH_SEED);
    t.finalize()
}

fn response(seed_hash: &[u8; 32], challenge: &[u8; 32], blinding: &[u8; 32]) -> [u8; 32] {
    keccak256_concat(&[seed_hash.as_slice(), challenge.as_slice(), blinding.as_slice()])
}

/// Hash-based knowledge proof of a committed seed hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSeedProof {
    pub blinding: [u8; 32],
    pub response: [u8; 32],
}

impl HashSeedProof {
    /// Build the proof and the commitment it opens.
    pub fn prove(
        seed_hash: &[u8; 32],
        blinding: &[u8; 32],
        ctx: &ProofContext,
    ) -> Result<(Self, [u8; 32])> {
        blinding_scalar(blinding)?;
        let commitment = commitment(seed_hash, blinding, ctx.player_bytes());
        let challenge = challenge(&commitment, ctx);
        let proof = Self {
            blinding: *blinding,
            response: response(seed_hash, &challenge, blinding),
        };
        Ok((proof, commitment))
    }

    pub fn to_bytes(&self) -> [u8; HASH_PROOF_LEN] {
        let mut out = [0u8; HASH_PROOF_LEN];
        out[..32].copy_from_slice(&self.blinding);
        out[32..].copy_from_slice(&self.response);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HASH_PROOF_LEN {
            return Err(ProofError::InvalidLength {
                what: "hash seed proof",
                expected: HASH_PROOF_LEN,
                got: bytes.len(),
            });
        }
        let mut blinding = [0u8; 32];
        let mut response = [0u8; 32];
        blinding.copy_from_slice(&bytes[..32]);
        response.copy_from_slice(&bytes[32..]);
        Ok(Self { blinding, response })
    }

    /// Verify against the published commitment with the default entropy floor.
    pub fn verify(
        &self,
        seed_hash: &[u8; 32],
        published: &[u8; 32],
        ctx: &ProofContext,
    ) -> Result<()> {
        self.verify_with_entropy(seed_hash, published, ctx, MIN_SEED_ENTROPY)
    }

    pub fn verify_with_entropy(
        &self,
        seed_hash: &[u8; 32],
        published: &[u8; 32],
        ctx: &ProofContext,
        min_entropy: usize,
    ) -> Result<()> {
        check_entropy(seed_hash, min_entropy)?;

        let recomputed = commitment(seed_hash, &self.blinding, ctx.player_bytes());
        if &recomputed != published {
            return Err(ProofError::CommitmentMismatch);
        }

        let challenge = challenge(&recomputed, ctx);
        if response(seed_hash, &challenge, &self.blinding) != self.response {
            return Err(ProofError::ResponseMismatch);
        }
        Ok(())
    }
}
