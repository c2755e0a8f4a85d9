//! BLS12-381 G1 primitives
//!
//! Scalars live in `Fr` (the prime subgroup order `r`), points in G1.
//!
//! ```text
//! G = standard G1 generator
//! H = hash_to_g1(msg = "PEDERSEN_H", dst = "SGS_CANGKULAN_V1")
//! ```
//!
//! `H` comes out of RFC 9380 hash-to-curve, so nobody knows `log_G(H)`.
//! Wire encodings are fixed width and big-endian: 32 bytes per scalar,
//! 96 bytes per uncompressed affine point (`x ∥ y`, 48 bytes each).

use crate::errors::{ProofError, Result};
use ark_bls12_381::{Fr, G1Affine, G1Projective, g1};
use ark_ec::hashing::{
    HashToCurve, curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField, field_hashers::DefaultFieldHasher};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;
use sha2::Sha256;
use std::sync::LazyLock;

/// Encoded scalar width
pub const SCALAR_LEN: usize = 32;

/// Encoded uncompressed G1 point width
pub const POINT_LEN: usize = 96;

/// Message hashed to derive `H`
pub const H_MESSAGE: &[u8] = b"PEDERSEN_H";

/// Hash-to-curve domain separation tag for `H`
pub const H_DST: &[u8] = b"SGS_CANGKULAN_V1";

type G1Hasher =
    MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;

static GENERATORS: LazyLock<Generators> = LazyLock::new(|| {
    Generators::derive().expect("hash-to-curve over fixed inputs cannot fail")
});

/// The two independent Pedersen generators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generators {
    pub g: G1Affine,
    pub h: G1Affine,
}

impl Generators {
    /// Derive both generators from scratch.
    pub fn derive() -> Result<Self> {
        let hasher =
            G1Hasher::new(H_DST).map_err(|e| ProofError::CryptoError(e.to_string()))?;
        let h = hasher
            .hash(H_MESSAGE)
            .map_err(|e| ProofError::CryptoError(e.to_string()))?;

        Ok(Self {
            g: G1Affine::generator(),
            h,
        })
    }

    /// Process-wide cached generators
    pub fn get() -> &'static Self {
        &GENERATORS
    }
}

/// Reduce 32 big-endian bytes modulo `r`.
///
/// Values at or above the order wrap around; nothing is clamped.
pub fn scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Reduce a blinding factor, rejecting ones congruent to zero.
pub fn blinding_scalar(bytes: &[u8; SCALAR_LEN]) -> Result<Fr> {
    let r = scalar_from_bytes(bytes);
    if r.is_zero() {
        return Err(ProofError::ZeroBlinding);
    }
    Ok(r)
}

/// Big-endian canonical encoding of a scalar
pub fn scalar_to_bytes(s: &Fr) -> [u8; SCALAR_LEN] {
    let bytes = s.into_bigint().to_bytes_be();
    let mut out = [0u8; SCALAR_LEN];
    out[SCALAR_LEN - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Decode a scalar carried inside a proof.
///
/// Unlike [`scalar_from_bytes`] this rejects encodings that are not
/// already reduced, so every proof has exactly one byte representation.
pub fn decode_scalar(bytes: &[u8]) -> Result<Fr> {
    let arr: [u8; SCALAR_LEN] = bytes.try_into().map_err(|_| ProofError::InvalidLength {
        what: "scalar",
        expected: SCALAR_LEN,
        got: bytes.len(),
    })?;
    let s = scalar_from_bytes(&arr);
    if scalar_to_bytes(&s) != arr {
        return Err(ProofError::NonCanonicalScalar);
    }
    Ok(s)
}

/// Uncompressed `x ∥ y` encoding
pub fn encode_point(p: &G1Affine) -> [u8; POINT_LEN] {
    let mut out = [0u8; POINT_LEN];
    p.serialize_uncompressed(&mut out[..])
        .expect("uncompressed G1 encoding is exactly 96 bytes");
    out
}

/// Decode and validate a point (on curve, in the prime-order subgroup).
pub fn decode_point(bytes: &[u8]) -> Result<G1Affine> {
    if bytes.len() != POINT_LEN {
        return Err(ProofError::InvalidLength {
            what: "G1 point",
            expected: POINT_LEN,
            got: bytes.len(),
        });
    }
    G1Affine::deserialize_uncompressed(bytes).map_err(|_| ProofError::InvalidPoint)
}

/// `s·G`, with the zero scalar short-circuited to the identity
pub fn mul_g(s: &Fr) -> G1Projective {
    if s.is_zero() {
        return G1Projective::zero();
    }
    Generators::get().g * s
}

/// `s·H`
pub fn mul_h(s: &Fr) -> G1Projective {
    Generators::get().h * s
}

/// `value·G + blinding·H`
pub fn pedersen_point(value: &Fr, blinding: &Fr) -> G1Affine {
    (mul_g(value) + mul_h(blinding)).into_affine()
}

/// Scalar for a small unsigned integer such as a card id
pub fn scalar_from_u32(v: u32) -> Fr {
    Fr::from(v as u64)
}
