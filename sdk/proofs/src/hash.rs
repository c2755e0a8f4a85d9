//! Hashing and Fiat-Shamir transcripts
//!
//! keccak256 backs every native commitment and challenge. blake2s256 is only
//! used to hash seeds in the circuit-compatible mode.
//!
//! Challenge preimages are built with [`Transcript`], which appends fields
//! in call order with no framing, so prover and verifier must append the
//! same fields in the same order:
//!
//! ```text
//! hash mode:  commitment ∥ session_be4 ∥ player ∥ "ZKV2"
//! pedersen:   C ∥ R ∥ seed_hash ∥ session_be4 ∥ player ∥ "ZKP4"
//! ring:       C ∥ R_0 ∥ … ∥ R_{N-1} ∥ session_be4 ∥ player ∥ "ZKP7"
//! aggregate:  A ∥ R ∥ suit_be4 ∥ count_be4 ∥ session_be4 ∥ player ∥ "ZKP8"
//! ```

use crate::field::{encode_point, scalar_from_bytes};
use ark_bls12_381::{Fr, G1Affine};
use blake2::{Blake2s256, Digest};
use tiny_keccak::{Hasher, Keccak};

/// Domain tag for the hash-based seed proof
pub const TAG_HASH_SEED: [u8; 4] = *b"ZKV2";

/// Domain tag for the Pedersen sigma seed proof
pub const TAG_PEDERSEN: [u8; 4] = *b"ZKP4";

/// Domain tag for the ring membership proof
pub const TAG_RING: [u8; 4] = *b"ZKP7";

/// Domain tag for the aggregate hand proof
pub const TAG_AGGREGATE: [u8; 4] = *b"ZKP8";

/// keccak256 of a single buffer
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// keccak256 over the concatenation of several buffers
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// blake2s-256 of a single buffer
pub fn blake2s256(data: &[u8]) -> [u8; 32] {
    Blake2s256::digest(data).into()
}

/// Order-sensitive keccak transcript for Fiat-Shamir challenges
#[derive(Clone)]
pub struct Transcript {
    hasher: Keccak,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            hasher: Keccak::v256(),
        }
    }

    pub fn append(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(bytes);
        self
    }

    /// Append a 4-byte big-endian integer
    pub fn append_u32(&mut self, v: u32) -> &mut Self {
        self.append(&v.to_be_bytes())
    }

    /// Append a 96-byte uncompressed point
    pub fn append_point(&mut self, p: &G1Affine) -> &mut Self {
        self.append(&encode_point(p))
    }

    pub fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.hasher.finalize(&mut out);
        out
    }

    /// Finalize and reduce the digest into a challenge scalar
    pub fn challenge_scalar(self) -> Fr {
        scalar_from_bytes(&self.finalize())
    }
}
