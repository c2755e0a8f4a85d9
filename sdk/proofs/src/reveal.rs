//! Seed commit and reveal
//!
//! The commit side publishes a 32-byte commit hash and persists the
//! [`SeedSecret`]. The reveal side reloads the secret, re-derives the
//! commit hash, refuses to go on if it differs from what was published,
//! and then builds the proof for the secret's scheme.
//!
//! ```text
//! compact:   commit_hash = keccak(seed_hash ∥ blinding ∥ player)
//! pedersen:  commit_hash = keccak(seed_hash·G + blinding·H)
//! circuit:   commit_hash = keccak(seed_hash)
//! ```

use crate::circuit::{self, CircuitProver};
use crate::context::ProofContext;
use crate::dispatch::{SeedStatement, Statement};
use crate::errors::{ProofError, Result};
use crate::hash_commit::{self, HashSeedProof};
use crate::pedersen::PedersenCommitment;
use crate::rng::RandomSource;
use crate::seed::{SeedScheme, SeedSecret};
use crate::sigma::PedersenSeedProof;
use log::debug;

/// What a player publishes when revealing a seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReveal {
    pub seed_hash: [u8; 32],
    pub proof: Vec<u8>,
}

impl SeedReveal {
    /// Statement a verifier checks this reveal against
    pub fn statement(&self, commit_hash: [u8; 32], context: ProofContext) -> Statement {
        Statement::Seed(SeedStatement {
            commit_hash,
            seed_hash: self.seed_hash,
            context,
        })
    }
}

impl SeedSecret {
    /// The value to publish at commit time.
    pub fn commit_hash(&self, ctx: &ProofContext) -> Result<[u8; 32]> {
        let seed_hash = self.seed_hash();
        match self.scheme() {
            SeedScheme::Compact => Ok(hash_commit::commitment(
                &seed_hash,
                self.blinding(),
                ctx.player_bytes(),
            )),
            SeedScheme::Pedersen => {
                Ok(PedersenCommitment::commit_bytes(&seed_hash, self.blinding())?.commit_hash())
            }
            SeedScheme::Circuit => Ok(circuit::commit_hash(&seed_hash)),
        }
    }

    fn check_published(&self, published: &[u8; 32], ctx: &ProofContext) -> Result<()> {
        if &self.commit_hash(ctx)? != published {
            debug!(
                "stored {} seed does not match published commitment for session {}",
                self.scheme(),
                ctx.session_id()
            );
            return Err(ProofError::CommitmentMismatch);
        }
        Ok(())
    }

    /// Rebuild the reveal for a natively proven scheme.
    pub fn reveal<R: RandomSource + ?Sized>(
        &self,
        published: &[u8; 32],
        ctx: &ProofContext,
        rng: &mut R,
    ) -> Result<SeedReveal> {
        self.check_published(published, ctx)?;
        let seed_hash = self.seed_hash();

        let proof = match self.scheme() {
            SeedScheme::Compact => {
                let (proof, _) = HashSeedProof::prove(&seed_hash, self.blinding(), ctx)?;
                proof.to_bytes().to_vec()
            }
            SeedScheme::Pedersen => {
                PedersenSeedProof::prove(&seed_hash, self.blinding(), ctx, rng)?
                    .to_bytes()
                    .to_vec()
            }
            SeedScheme::Circuit => {
                return Err(ProofError::ModeMismatch {
                    expected: "compact or pedersen",
                    got: SeedScheme::Circuit.name(),
                });
            }
        };

        Ok(SeedReveal { seed_hash, proof })
    }

    /// Rebuild the reveal through the external circuit prover.
    pub fn reveal_circuit(
        &self,
        published: &[u8; 32],
        ctx: &ProofContext,
        prover: &dyn CircuitProver,
    ) -> Result<SeedReveal> {
        if self.scheme() != SeedScheme::Circuit {
            return Err(ProofError::ModeMismatch {
                expected: SeedScheme::Circuit.name(),
                got: self.scheme().name(),
            });
        }
        self.check_published(published, ctx)?;

        let seed_hash = self.seed_hash();
        let proof = prover.prove(self.seed(), &circuit::public_inputs(&seed_hash))?;
        Ok(SeedReveal { seed_hash, proof })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{ProofKind, Verifier, VerifierPolicy};
    use crate::rng::test_rng;

    fn ctx() -> ProofContext {
        ProofContext::new(42, "GSEEDPLAYER").unwrap()
    }

    #[test]
    fn test_reveal_matches_commit_for_native_schemes() {
        let verifier = Verifier::new(VerifierPolicy::default()).unwrap();
        let mut rng = test_rng();

        for (scheme, kind) in [
            (SeedScheme::Compact, ProofKind::HashSeed),
            (SeedScheme::Pedersen, ProofKind::PedersenSeed),
        ] {
            let secret = SeedSecret::generate(scheme, &mut rng);
            let published = secret.commit_hash(&ctx()).unwrap();

            let reveal = secret.reveal(&published, &ctx(), &mut rng).unwrap();
            let statement = reveal.statement(published, ctx());
            assert_eq!(verifier.check(&reveal.proof, &statement), Ok(kind));
        }
    }

    #[test]
    fn test_reveal_refuses_foreign_commitment() {
        let mut rng = test_rng();
        let secret = SeedSecret::generate(SeedScheme::Pedersen, &mut rng);
        assert_eq!(
            secret.reveal(&[7u8; 32], &ctx(), &mut rng),
            Err(ProofError::CommitmentMismatch)
        );
    }

    #[test]
    fn test_compact_reveal_is_deterministic() {
        let mut rng = test_rng();
        let secret = SeedSecret::generate(SeedScheme::Compact, &mut rng);
        let published = secret.commit_hash(&ctx()).unwrap();
        let a = secret.reveal(&published, &ctx(), &mut rng).unwrap();
        let b = secret.reveal(&published, &ctx(), &mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_circuit_scheme_needs_prover() {
        let mut rng = test_rng();
        let secret = SeedSecret::generate(SeedScheme::Circuit, &mut rng);
        let published = secret.commit_hash(&ctx()).unwrap();
        assert!(matches!(
            secret.reveal(&published, &ctx(), &mut rng),
            Err(ProofError::ModeMismatch { .. })
        ));
    }
}
