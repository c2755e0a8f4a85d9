//! Pedersen commitments over BLS12-381 G1
//!
//! ```text
//! C           = value·G + blinding·H
//! commit_hash = keccak(C_bytes)
//! C(v1, r1) + C(v2, r2) = C(v1 + v2, r1 + r2)
//! ```
//!
//! Perfectly hiding, computationally binding under discrete log.

use crate::errors::{ProofError, Result};
use crate::field::{
    POINT_LEN, blinding_scalar, decode_point, encode_point, pedersen_point, scalar_from_bytes,
    scalar_from_u32,
};
use crate::hash::keccak256;
use ark_bls12_381::{Fr, G1Affine};
use ark_ec::CurveGroup;
use ark_std::Zero;
use std::ops::Add;

/// A Pedersen commitment point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedersenCommitment(G1Affine);

impl PedersenCommitment {
    /// Commit to `value` under a non-zero `blinding`.
    pub fn commit(value: &Fr, blinding: &Fr) -> Result<Self> {
        if blinding.is_zero() {
            return Err(ProofError::ZeroBlinding);
        }
        Ok(Self(pedersen_point(value, blinding)))
    }

    /// Commit to a 32-byte value (e.g. a seed hash), reducing both inputs.
    pub fn commit_bytes(value: &[u8; 32], blinding: &[u8; 32]) -> Result<Self> {
        let r = blinding_scalar(blinding)?;
        Ok(Self(pedersen_point(&scalar_from_bytes(value), &r)))
    }

    /// Commit to a small integer such as a card id.
    pub fn commit_u32(value: u32, blinding: &[u8; 32]) -> Result<Self> {
        let r = blinding_scalar(blinding)?;
        Ok(Self(pedersen_point(&scalar_from_u32(value), &r)))
    }

    pub fn from_point(point: G1Affine) -> Self {
        Self(point)
    }

    pub fn point(&self) -> &G1Affine {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; POINT_LEN] {
        encode_point(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_point(bytes).map(Self)
    }

    /// The 32-byte value published at commit time
    pub fn commit_hash(&self) -> [u8; 32] {
        keccak256(&self.to_bytes())
    }

    /// Check an opening without the zero-blinding guard.
    pub fn opens_to(&self, value: &Fr, blinding: &Fr) -> bool {
        pedersen_point(value, blinding) == self.0
    }
}

impl Add for PedersenCommitment {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self((self.0 + other.0).into_affine())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Generators;
    use crate::rng::{random_blinding, random_bytes, random_scalar, test_rng};

    #[test]
    fn test_commitment_deterministic() {
        let c1 = PedersenCommitment::commit_u32(5, &[0xBB; 32]).unwrap();
        let c2 = PedersenCommitment::commit_u32(5, &[0xBB; 32]).unwrap();
        assert_eq!(c1, c2, "Same inputs should produce same commitment");
        assert_eq!(c1.commit_hash(), c2.commit_hash());
    }

    #[test]
    fn test_commitment_hiding() {
        let c1 = PedersenCommitment::commit_u32(5, &[0x11; 32]).unwrap();
        let c2 = PedersenCommitment::commit_u32(5, &[0x22; 32]).unwrap();
        assert_ne!(c1, c2, "Different blindings should produce different commitments");
    }

    #[test]
    fn test_commitment_binding() {
        let c1 = PedersenCommitment::commit_u32(5, &[0x11; 32]).unwrap();
        let c2 = PedersenCommitment::commit_u32(6, &[0x11; 32]).unwrap();
        assert_ne!(c1, c2, "Different values should produce different commitments");
    }

    /// `value·G + blinding·H` computed straight from the generators
    fn expected(value: &Fr, blinding: &Fr) -> G1Affine {
        let gens = Generators::get();
        (gens.g * value + gens.h * blinding).into_affine()
    }

    #[test]
    fn test_commitment_matches_generators() {
        let mut rng = test_rng();
        for _ in 0..32 {
            let value = random_bytes(&mut rng);
            let blinding = random_blinding(&mut rng);
            let c = PedersenCommitment::commit_bytes(&value, &blinding).unwrap();
            let want = expected(&scalar_from_bytes(&value), &scalar_from_bytes(&blinding));
            assert_eq!(*c.point(), want);
            assert_eq!(c.commit_hash(), keccak256(&encode_point(&want)));

            let card = u32::from_be_bytes([value[0], value[1], value[2], value[3]]) % 36;
            let c = PedersenCommitment::commit_u32(card, &blinding).unwrap();
            assert_eq!(
                *c.point(),
                expected(&Fr::from(u64::from(card)), &scalar_from_bytes(&blinding))
            );
        }
    }

    #[test]
    fn test_homomorphism() {
        let mut rng = test_rng();
        for _ in 0..32 {
            let (s1, r1) = (random_scalar(&mut rng), random_scalar(&mut rng));
            let (s2, r2) = (random_scalar(&mut rng), random_scalar(&mut rng));
            if (r1 + r2).is_zero() {
                continue;
            }

            let sum = PedersenCommitment::commit(&s1, &r1).unwrap()
                + PedersenCommitment::commit(&s2, &r2).unwrap();
            let direct = PedersenCommitment::commit(&(s1 + s2), &(r1 + r2)).unwrap();
            assert_eq!(sum, direct);
            assert_eq!(*sum.point(), expected(&(s1 + s2), &(r1 + r2)));
        }
    }

    #[test]
    fn test_zero_blinding_rejected() {
        assert_eq!(
            PedersenCommitment::commit(&Fr::from(3u64), &Fr::zero()),
            Err(ProofError::ZeroBlinding)
        );
        assert_eq!(
            PedersenCommitment::commit_u32(3, &[0u8; 32]),
            Err(ProofError::ZeroBlinding)
        );
    }

    #[test]
    fn test_encoding_roundtrip_and_open() {
        let c = PedersenCommitment::commit_u32(17, &[0x33; 32]).unwrap();
        let decoded = PedersenCommitment::from_bytes(&c.to_bytes()).unwrap();
        assert_eq!(decoded, c);
        assert!(c.opens_to(&Fr::from(17u64), &scalar_from_bytes(&[0x33; 32])));
        assert!(!c.opens_to(&Fr::from(18u64), &scalar_from_bytes(&[0x33; 32])));
    }
}
