//! Secure randomness port
//!
//! Every secret and nonce in this crate is drawn through [`RandomSource`].
//! Production code hands in `OsRng`; tests hand in a seeded generator.

use crate::field::scalar_from_bytes;
use ark_bls12_381::Fr;
use ark_ff::PrimeField;
use ark_std::Zero;
use rand::{CryptoRng, RngCore};

/// Source of cryptographically secure bytes
pub trait RandomSource {
    fn fill(&mut self, dest: &mut [u8]);
}

impl<R: RngCore + CryptoRng + ?Sized> RandomSource for R {
    fn fill(&mut self, dest: &mut [u8]) {
        self.fill_bytes(dest);
    }
}

/// 32 random bytes
pub fn random_bytes<R: RandomSource + ?Sized>(rng: &mut R) -> [u8; 32] {
    let mut out = [0u8; 32];
    rng.fill(&mut out);
    out
}

/// Uniform scalar from 64 bytes of wide reduction
pub fn random_scalar<R: RandomSource + ?Sized>(rng: &mut R) -> Fr {
    let mut wide = [0u8; 64];
    rng.fill(&mut wide);
    Fr::from_be_bytes_mod_order(&wide)
}

/// Blinding bytes whose scalar reduction is non-zero
pub fn random_blinding<R: RandomSource + ?Sized>(rng: &mut R) -> [u8; 32] {
    loop {
        let candidate = random_bytes(rng);
        if !scalar_from_bytes(&candidate).is_zero() {
            return candidate;
        }
    }
}

/// Deterministic generator for tests
#[cfg(test)]
pub(crate) fn test_rng() -> rand_chacha::ChaCha20Rng {
    use rand::SeedableRng;
    rand_chacha::ChaCha20Rng::seed_from_u64(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = test_rng();
        let mut rng2 = test_rng();
        assert_eq!(random_bytes(&mut rng1), random_bytes(&mut rng2));
        assert_eq!(random_scalar(&mut rng1), random_scalar(&mut rng2));
    }

    #[test]
    fn test_draws_differ() {
        let mut rng = test_rng();
        assert_ne!(random_bytes(&mut rng), random_bytes(&mut rng));
    }

    #[test]
    fn test_blinding_is_nonzero() {
        let mut rng = test_rng();
        for _ in 0..16 {
            assert!(!scalar_from_bytes(&random_blinding(&mut rng)).is_zero());
        }
    }
}
