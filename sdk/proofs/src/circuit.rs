//! External circuit proofs
//!
//! Proofs above [`CIRCUIT_THRESHOLD`] bytes come from an external
//! circuit-based proving system. This crate never looks inside them: it
//! checks the seed-hash binding and forwards blob plus public inputs.
//!
//! ```text
//! seed_hash     = blake2s(seed)
//! commit_hash   = keccak(seed_hash)
//! public_inputs = be32(seed_hash[0]) ∥ … ∥ be32(seed_hash[31])   (1024 bytes)
//! ```

use crate::errors::{ProofError, Result};
use crate::hash::keccak256;

/// Proofs strictly longer than this are routed to the circuit verifier
pub const CIRCUIT_THRESHOLD: usize = 4000;

/// Width of one public-input field element
pub const FIELD_ELEMENT_LEN: usize = 32;

/// Verifier side of the external proving system
pub trait CircuitVerifier: Send + Sync {
    /// Accept or reject `proof` for the encoded public inputs.
    fn verify(&self, public_inputs: &[u8], proof: &[u8]) -> Result<()>;
}

/// Prover side of the external proving system
pub trait CircuitProver: Send + Sync {
    fn prove(&self, seed: &[u8; 32], public_inputs: &[u8]) -> Result<Vec<u8>>;
}

/// Commit hash published for a circuit-mode seed
pub fn commit_hash(seed_hash: &[u8; 32]) -> [u8; 32] {
    keccak256(seed_hash)
}

/// Encode each seed-hash byte as its own big-endian field element.
pub fn public_inputs(seed_hash: &[u8; 32]) -> Vec<u8> {
    let mut out = vec![0u8; seed_hash.len() * FIELD_ELEMENT_LEN];
    for (i, byte) in seed_hash.iter().enumerate() {
        out[(i + 1) * FIELD_ELEMENT_LEN - 1] = *byte;
    }
    out
}

/// Check the binding and hand the proof to `verifier`.
pub fn verify_seed(
    verifier: &dyn CircuitVerifier,
    proof: &[u8],
    seed_hash: &[u8; 32],
    published: &[u8; 32],
) -> Result<()> {
    if proof.len() <= CIRCUIT_THRESHOLD {
        return Err(ProofError::InvalidLength {
            what: "circuit proof",
            expected: CIRCUIT_THRESHOLD + 1,
            got: proof.len(),
        });
    }
    if &commit_hash(seed_hash) != published {
        return Err(ProofError::CommitmentMismatch);
    }
    verifier.verify(&public_inputs(seed_hash), proof)
}
