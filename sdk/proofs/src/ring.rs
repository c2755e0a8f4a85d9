//! 1-of-N ring proof of set membership
//!
//! Proves that a Pedersen commitment `C = id·G + r·H` opens to some member
//! of a public valid set without revealing which one (CDS-style OR proof).
//!
//! ```text
//! D_i = C − v_i·G
//! R_i = a_i·H − b_i·D_i          simulated: (a, b) = (z_i, e_i)
//!                                real j:    (a, b) = (k, 0)
//! e   = Fr(keccak(C ∥ R_0 ∥ … ∥ R_{N-1} ∥ session_be4 ∥ player ∥ "ZKP7"))
//! e_j = e − Σ_{i≠j} e_i
//! z_j = k + e_j·r
//! proof = C ∥ (e_i ∥ z_i) × N    (96 + 64N bytes)
//!
//! verify: R_i = z_i·H − e_i·D_i for all i, then Σ e_i == e
//! ```
//!
//! Only `D_j` is a multiple of `H` with known exponent `r`, so only branch
//! `j` can be answered for an arbitrary challenge share.

use crate::context::ProofContext;
use crate::errors::{ProofError, Result};
use crate::field::{
    POINT_LEN, SCALAR_LEN, blinding_scalar, decode_scalar, mul_g, mul_h, pedersen_point,
    scalar_from_u32, scalar_to_bytes,
};
use crate::hash::{TAG_RING, Transcript};
use crate::pedersen::PedersenCommitment;
use crate::rng::{RandomSource, random_scalar};
use ark_bls12_381::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::Zero;

/// Bytes per `(e_i, z_i)` branch
pub const RING_BRANCH_LEN: usize = 2 * SCALAR_LEN;

/// Default ring bound: the number of ranks in one suit
pub const DEFAULT_MAX_RING: usize = 9;

/// Encoded width of a proof over `n` members
pub const fn ring_proof_len(n: usize) -> usize {
    POINT_LEN + n * RING_BRANCH_LEN
}

/// [`ring_proof_len`] for untrusted member counts
pub fn checked_ring_proof_len(n: usize) -> Result<usize> {
    n.checked_mul(RING_BRANCH_LEN)
        .and_then(|branches| branches.checked_add(POINT_LEN))
        .ok_or(ProofError::LengthOverflow(n))
}

/// Member count encoded by a proof length, if the length has ring shape
pub fn ring_size_from_len(len: usize) -> Option<usize> {
    if len < ring_proof_len(1) || (len - POINT_LEN) % RING_BRANCH_LEN != 0 {
        return None;
    }
    Some((len - POINT_LEN) / RING_BRANCH_LEN)
}

/// One challenge share and its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBranch {
    pub challenge: Fr,
    pub response: Fr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingProof {
    pub commitment: PedersenCommitment,
    pub branches: Vec<RingBranch>,
}

fn offset(commitment: &G1Affine, member: u32) -> G1Projective {
    commitment.into_group() - mul_g(&scalar_from_u32(member))
}

fn branch_point(a: &Fr, b: &Fr, d: &G1Projective) -> G1Projective {
    mul_h(a) - *d * b
}

fn challenge(commitment: &G1Affine, nonce_points: &[G1Affine], ctx: &ProofContext) -> Fr {
    let mut t = Transcript::new();
    t.append_point(commitment);
    for r in nonce_points {
        t.append_point(r);
    }
    ctx.bind(&mut t);
    t.append(&TAG_RING);
    t.challenge_scalar()
}

fn nonce_points(commitment: &G1Affine, valid_set: &[u32], shares: &[RingBranch]) -> Vec<G1Affine> {
    let points: Vec<G1Projective> = valid_set
        .iter()
        .zip(shares)
        .map(|(&member, share)| {
            branch_point(&share.response, &share.challenge, &offset(commitment, member))
        })
        .collect();
    G1Projective::normalize_batch(&points)
}

impl RingProof {
    /// Prove `item ∈ valid_set` with the default ring bound.
    pub fn prove<R: RandomSource + ?Sized>(
        item: u32,
        blinding: &[u8; 32],
        valid_set: &[u32],
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<Self> {
        Self::prove_bounded(item, blinding, valid_set, DEFAULT_MAX_RING, ctx, rng)
    }

    pub fn prove_bounded<R: RandomSource + ?Sized>(
        item: u32,
        blinding: &[u8; 32],
        valid_set: &[u32],
        max_ring: usize,
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<Self> {
        if valid_set.is_empty() {
            return Err(ProofError::EmptyValidSet);
        }
        if valid_set.len() > max_ring {
            return Err(ProofError::ValidSetTooLarge {
                size: valid_set.len(),
                max: max_ring,
            });
        }
        let real = valid_set
            .iter()
            .position(|&member| member == item)
            .ok_or(ProofError::CardNotInValidSet(item))?;
        let r = blinding_scalar(blinding)?;

        let commitment = pedersen_point(&scalar_from_u32(item), &r);

        // Every branch draws the same randomness; the real one keeps only k.
        let k = random_scalar(rng);
        let mut shares: Vec<RingBranch> = (0..valid_set.len())
            .map(|i| {
                let simulated = RingBranch {
                    challenge: random_scalar(rng),
                    response: random_scalar(rng),
                };
                if i == real {
                    RingBranch {
                        challenge: Fr::zero(),
                        response: k,
                    }
                } else {
                    simulated
                }
            })
            .collect();

        let points = nonce_points(&commitment, valid_set, &shares);
        let e = challenge(&commitment, &points, ctx);

        let e_real = e - shares.iter().map(|s| s.challenge).sum::<Fr>();
        shares[real] = RingBranch {
            challenge: e_real,
            response: k + e_real * r,
        };

        Ok(Self {
            commitment: PedersenCommitment::from_point(commitment),
            branches: shares,
        })
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn verify(&self, valid_set: &[u32], ctx: &ProofContext) -> Result<()> {
        if valid_set.is_empty() {
            return Err(ProofError::EmptyValidSet);
        }
        if self.branches.len() != valid_set.len() {
            return Err(ProofError::SizeMismatch {
                proof: self.branches.len(),
                statement: valid_set.len(),
            });
        }

        let commitment = self.commitment.point();
        let points = nonce_points(commitment, valid_set, &self.branches);
        let e = challenge(commitment, &points, ctx);

        let sum: Fr = self.branches.iter().map(|b| b.challenge).sum();
        if sum != e {
            return Err(ProofError::ChallengeSumMismatch);
        }
        Ok(())
    }

    /// Check the embedded commitment against the published hash, then the proof.
    pub fn verify_published(
        &self,
        commit_hash: &[u8; 32],
        valid_set: &[u32],
        ctx: &ProofContext,
    ) -> Result<()> {
        if &self.commitment.commit_hash() != commit_hash {
            return Err(ProofError::CommitmentMismatch);
        }
        self.verify(valid_set, ctx)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ring_proof_len(self.branches.len()));
        out.extend_from_slice(&self.commitment.to_bytes());
        for branch in &self.branches {
            out.extend_from_slice(&scalar_to_bytes(&branch.challenge));
            out.extend_from_slice(&scalar_to_bytes(&branch.response));
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let n = ring_size_from_len(bytes.len()).ok_or(ProofError::InvalidLength {
            what: "ring proof",
            expected: ring_proof_len(1),
            got: bytes.len(),
        })?;

        let commitment = PedersenCommitment::from_bytes(&bytes[..POINT_LEN])?;
        let branches = bytes[POINT_LEN..]
            .chunks_exact(RING_BRANCH_LEN)
            .map(|chunk| {
                Ok(RingBranch {
                    challenge: decode_scalar(&chunk[..SCALAR_LEN])?,
                    response: decode_scalar(&chunk[SCALAR_LEN..])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug_assert_eq!(branches.len(), n);

        Ok(Self {
            commitment,
            branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::test_rng;

    fn ctx() -> ProofContext {
        ProofContext::new(7, "GPLAYERRING").unwrap()
    }

    #[test]
    fn test_every_real_index_verifies() {
        let mut rng = test_rng();
        let set = [9, 11, 13, 15, 17];
        for &item in &set {
            let proof = RingProof::prove(item, &[0x5C; 32], &set, &ctx(), &mut rng).unwrap();
            assert!(proof.verify(&set, &ctx()).is_ok(), "item {item} should verify");
        }
    }

    #[test]
    fn test_sizes_one_through_max() {
        let mut rng = test_rng();
        for n in 1..=DEFAULT_MAX_RING {
            let set: Vec<u32> = (0..n as u32).collect();
            let item = set[n - 1];
            let proof = RingProof::prove(item, &[0x21; 32], &set, &ctx(), &mut rng).unwrap();

            let bytes = proof.to_bytes();
            assert_eq!(bytes.len(), 96 + 64 * n);
            assert_eq!(ring_size_from_len(bytes.len()), Some(n));

            let decoded = RingProof::from_bytes(&bytes).unwrap();
            assert!(decoded.verify(&set, &ctx()).is_ok());
        }
    }

    #[test]
    fn test_zero_item_commitment() {
        let mut rng = test_rng();
        let set = [0, 1, 2];
        let proof = RingProof::prove(0, &[0x44; 32], &set, &ctx(), &mut rng).unwrap();
        assert!(proof.verify(&set, &ctx()).is_ok());
    }

    #[test]
    fn test_absent_item_rejected() {
        let mut rng = test_rng();
        assert_eq!(
            RingProof::prove(4, &[0x5C; 32], &[1, 2, 3], &ctx(), &mut rng),
            Err(ProofError::CardNotInValidSet(4))
        );
    }

    #[test]
    fn test_empty_and_oversized_sets_rejected() {
        let mut rng = test_rng();
        assert_eq!(
            RingProof::prove(1, &[0x5C; 32], &[], &ctx(), &mut rng),
            Err(ProofError::EmptyValidSet)
        );

        let big: Vec<u32> = (0..10).collect();
        assert_eq!(
            RingProof::prove(1, &[0x5C; 32], &big, &ctx(), &mut rng),
            Err(ProofError::ValidSetTooLarge { size: 10, max: 9 })
        );
    }

    #[test]
    fn test_wrong_context_or_set_fails() {
        let mut rng = test_rng();
        let set = [3, 5, 7];
        let proof = RingProof::prove(5, &[0x5C; 32], &set, &ctx(), &mut rng).unwrap();

        let other = ProofContext::new(8, "GPLAYERRING").unwrap();
        assert_eq!(
            proof.verify(&set, &other),
            Err(ProofError::ChallengeSumMismatch)
        );
        assert!(proof.verify(&[3, 5, 8], &ctx()).is_err());
        assert!(matches!(
            proof.verify(&[3, 5], &ctx()),
            Err(ProofError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_tampered_share_fails() {
        let mut rng = test_rng();
        let set = [3, 5, 7];
        let mut proof = RingProof::prove(7, &[0x5C; 32], &set, &ctx(), &mut rng).unwrap();
        proof.branches[0].challenge += Fr::from(1u64);
        assert!(proof.verify(&set, &ctx()).is_err());
    }

    #[test]
    fn test_published_hash_binding() {
        let mut rng = test_rng();
        let set = [3, 5, 7];
        let proof = RingProof::prove(3, &[0x5C; 32], &set, &ctx(), &mut rng).unwrap();
        let published = PedersenCommitment::commit_u32(3, &[0x5C; 32])
            .unwrap()
            .commit_hash();
        assert!(proof.verify_published(&published, &set, &ctx()).is_ok());
        assert_eq!(
            proof.verify_published(&[1u8; 32], &set, &ctx()),
            Err(ProofError::CommitmentMismatch)
        );
    }

    #[test]
    fn test_malformed_lengths() {
        assert_eq!(ring_size_from_len(96), None);
        assert_eq!(ring_size_from_len(161), None);
        assert!(RingProof::from_bytes(&[0u8; 100]).is_err());
    }
}
