//! Schnorr sigma proof for a Pedersen seed commitment
//!
//! Proves knowledge of the blinding `r` in `C = s·G + r·H` once the seed
//! hash `s` is revealed, i.e. knowledge of `log_H(C − s·G)`.
//!
//! ```text
//! D = C − s·G
//! R = k·H                                        (fresh nonce k)
//! e = Fr(keccak(C ∥ R ∥ seed_hash ∥ session_be4 ∥ player ∥ "ZKP4"))
//! z = k + e·r
//! proof = C ∥ R ∥ z                              (224 bytes)
//!
//! verify: z·H == R + e·D
//! ```

use crate::context::ProofContext;
use crate::errors::{ProofError, Result};
use crate::field::{
    POINT_LEN, SCALAR_LEN, blinding_scalar, decode_point, decode_scalar, encode_point, mul_g,
    mul_h, scalar_from_bytes, scalar_to_bytes,
};
use crate::hash::{TAG_PEDERSEN, Transcript};
use crate::pedersen::PedersenCommitment;
use crate::rng::{RandomSource, random_scalar};
use ark_bls12_381::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};

/// Encoded proof width
pub const PEDERSEN_PROOF_LEN: usize = 2 * POINT_LEN + SCALAR_LEN;

/// Sigma proof bundled with the commitment it opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedersenSeedProof {
    pub commitment: PedersenCommitment,
    pub nonce_point: G1Affine,
    pub response: Fr,
}

fn challenge(
    commitment: &PedersenCommitment,
    nonce_point: &G1Affine,
    seed_hash: &[u8; 32],
    ctx: &ProofContext,
) -> Fr {
    let mut t = Transcript::new();
    t.append_point(commitment.point())
        .append_point(nonce_point)
        .append(seed_hash);
    ctx.bind(&mut t);
    t.append(&TAG_PEDERSEN);
    t.challenge_scalar()
}

impl PedersenSeedProof {
    pub fn prove<R: RandomSource + ?Sized>(
        seed_hash: &[u8; 32],
        blinding: &[u8; 32],
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<Self> {
        let r = blinding_scalar(blinding)?;
        let commitment = PedersenCommitment::commit(&scalar_from_bytes(seed_hash), &r)?;

        let k = random_scalar(rng);
        let nonce_point = mul_h(&k).into_affine();
        let e = challenge(&commitment, &nonce_point, seed_hash, ctx);

        Ok(Self {
            commitment,
            nonce_point,
            response: k + e * r,
        })
    }

    /// Check the sigma equation for a revealed seed hash.
    pub fn verify(&self, seed_hash: &[u8; 32], ctx: &ProofContext) -> Result<()> {
        let s = scalar_from_bytes(seed_hash);
        let d = self.commitment.point().into_group() - mul_g(&s);
        let e = challenge(&self.commitment, &self.nonce_point, seed_hash, ctx);

        if mul_h(&self.response) != d * e + self.nonce_point {
            return Err(ProofError::SigmaCheckFailed);
        }
        Ok(())
    }

    /// Check the embedded commitment against the published hash, then the proof.
    pub fn verify_published(
        &self,
        commit_hash: &[u8; 32],
        seed_hash: &[u8; 32],
        ctx: &ProofContext,
    ) -> Result<()> {
        if &self.commitment.commit_hash() != commit_hash {
            return Err(ProofError::CommitmentMismatch);
        }
        self.verify(seed_hash, ctx)
    }

    pub fn to_bytes(&self) -> [u8; PEDERSEN_PROOF_LEN] {
        let mut out = [0u8; PEDERSEN_PROOF_LEN];
        out[..POINT_LEN].copy_from_slice(&self.commitment.to_bytes());
        out[POINT_LEN..2 * POINT_LEN].copy_from_slice(&encode_point(&self.nonce_point));
        out[2 * POINT_LEN..].copy_from_slice(&scalar_to_bytes(&self.response));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PEDERSEN_PROOF_LEN {
            return Err(ProofError::InvalidLength {
                what: "pedersen seed proof",
                expected: PEDERSEN_PROOF_LEN,
                got: bytes.len(),
            });
        }
        Ok(Self {
            commitment: PedersenCommitment::from_bytes(&bytes[..POINT_LEN])?,
            nonce_point: decode_point(&bytes[POINT_LEN..2 * POINT_LEN])?,
            response: decode_scalar(&bytes[2 * POINT_LEN..])?,
        })
    }
}
