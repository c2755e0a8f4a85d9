//! Seed secrets
//!
//! A seed is 32 secret bytes committed at the start of a session and
//! revealed later to derive the shuffle. Its public fingerprint is the
//! seed hash:
//!
//! ```text
//! compact, pedersen:  seed_hash = keccak256(seed)
//! circuit:            seed_hash = blake2s256(seed)
//! ```

use crate::errors::{ProofError, Result};
use crate::field::blinding_scalar;
use crate::hash::{blake2s256, keccak256};
use crate::rng::{RandomSource, random_blinding, random_bytes};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum distinct byte values a seed or seed hash must contain
pub const MIN_SEED_ENTROPY: usize = 4;

/// Highest meaningful floor: a 32-byte value has at most 32 distinct bytes
pub const MAX_SEED_ENTROPY: usize = 32;

/// How a seed is committed and later proven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedScheme {
    /// keccak commitment, 64-byte proof
    Compact,
    /// Pedersen commitment, 224-byte sigma proof
    Pedersen,
    /// blake2s seed hash, proof produced by an external circuit prover
    Circuit,
}

impl SeedScheme {
    pub fn name(self) -> &'static str {
        match self {
            SeedScheme::Compact => "compact",
            SeedScheme::Pedersen => "pedersen",
            SeedScheme::Circuit => "circuit",
        }
    }

    /// Seed hash under this scheme
    pub fn seed_hash(self, seed: &[u8; 32]) -> [u8; 32] {
        match self {
            SeedScheme::Circuit => blake2s256(seed),
            SeedScheme::Compact | SeedScheme::Pedersen => keccak256(seed),
        }
    }
}

impl fmt::Display for SeedScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SeedScheme {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compact" => Ok(SeedScheme::Compact),
            "pedersen" => Ok(SeedScheme::Pedersen),
            "circuit" => Ok(SeedScheme::Circuit),
            other => Err(ProofError::SerializationError(format!(
                "unknown seed scheme: {other}"
            ))),
        }
    }
}

/// Number of distinct byte values in `bytes`
pub fn distinct_bytes(bytes: &[u8]) -> usize {
    bytes.iter().collect::<HashSet<_>>().len()
}

/// Reject low-entropy values such as all-zero or repeating patterns.
pub fn check_entropy(bytes: &[u8], required: usize) -> Result<()> {
    let distinct = distinct_bytes(bytes);
    if distinct < required {
        return Err(ProofError::WeakSeedEntropy { distinct, required });
    }
    Ok(())
}

/// Seed and blinding held between commit and reveal.
///
/// Both byte arrays are wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(try_from = "RawSeedSecret")]
pub struct SeedSecret {
    #[zeroize(skip)]
    scheme: SeedScheme,
    seed: [u8; 32],
    blinding: [u8; 32],
}

/// Stored form; loading goes through [`SeedSecret::from_parts`].
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct RawSeedSecret {
    #[zeroize(skip)]
    scheme: SeedScheme,
    seed: [u8; 32],
    blinding: [u8; 32],
}

impl TryFrom<RawSeedSecret> for SeedSecret {
    type Error = ProofError;

    fn try_from(raw: RawSeedSecret) -> Result<Self> {
        Self::from_parts(raw.scheme, raw.seed, raw.blinding)
    }
}

impl SeedSecret {
    /// Draw a fresh seed and blinding.
    pub fn generate<R: RandomSource + ?Sized>(scheme: SeedScheme, rng: &mut R) -> Self {
        let seed = loop {
            let candidate = random_bytes(rng);
            if check_entropy(&candidate, MIN_SEED_ENTROPY).is_ok() {
                break candidate;
            }
        };
        Self {
            scheme,
            seed,
            blinding: random_blinding(rng),
        }
    }

    /// Wrap caller-chosen secrets, rejecting degenerate ones.
    pub fn from_parts(scheme: SeedScheme, seed: [u8; 32], blinding: [u8; 32]) -> Result<Self> {
        check_entropy(&seed, MIN_SEED_ENTROPY)?;
        blinding_scalar(&blinding)?;
        Ok(Self {
            scheme,
            seed,
            blinding,
        })
    }

    pub fn scheme(&self) -> SeedScheme {
        self.scheme
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    pub fn blinding(&self) -> &[u8; 32] {
        &self.blinding
    }

    pub fn seed_hash(&self) -> [u8; 32] {
        self.scheme.seed_hash(&self.seed)
    }
}

impl fmt::Debug for SeedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedSecret")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
