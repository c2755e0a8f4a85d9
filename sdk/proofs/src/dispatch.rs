//! Length-keyed proof dispatch
//!
//! A verifier receives an opaque blob and picks the proof kind from its
//! length alone:
//!
//! ```text
//! seed statements               move statements
//! ───────────────────────────   ──────────────────────────────
//!   64      hash seed proof       96 + 64N   ring proof (1 ≤ N ≤ max)
//!   224     pedersen sigma        228        aggregate hand proof
//!   > 4000  external circuit
//! ```
//!
//! A ring over two members is 224 bytes, the same as a pedersen proof, so
//! seed and move proofs use separate tables. Each table is checked for
//! overlapping lengths when it is built.

use crate::aggregate::{AGGREGATE_PROOF_LEN, AggregateProof, DEFAULT_MAX_HAND};
use crate::card::{DECK_SIZE, compliant_ids};
use crate::circuit::{self, CIRCUIT_THRESHOLD, CircuitVerifier};
use crate::context::ProofContext;
use crate::errors::{ProofError, Result};
use crate::hash_commit::{HASH_PROOF_LEN, HashSeedProof};
use crate::ring::{DEFAULT_MAX_RING, RingProof, checked_ring_proof_len, ring_size_from_len};
use crate::seed::{MAX_SEED_ENTROPY, MIN_SEED_ENTROPY, check_entropy};
use crate::sigma::{PEDERSEN_PROOF_LEN, PedersenSeedProof};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Closed set of proof kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofKind {
    HashSeed,
    PedersenSeed,
    Circuit,
    Ring { members: usize },
    Aggregate,
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofKind::HashSeed => f.write_str("hash-seed"),
            ProofKind::PedersenSeed => f.write_str("pedersen-seed"),
            ProofKind::Circuit => f.write_str("circuit"),
            ProofKind::Ring { members } => write!(f, "ring({members})"),
            ProofKind::Aggregate => f.write_str("aggregate"),
        }
    }
}

/// Tunable verification limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierPolicy {
    pub max_ring: usize,
    pub max_hand: usize,
    pub min_seed_entropy: usize,
}

impl Default for VerifierPolicy {
    fn default() -> Self {
        Self {
            max_ring: DEFAULT_MAX_RING,
            max_hand: DEFAULT_MAX_HAND,
            min_seed_entropy: MIN_SEED_ENTROPY,
        }
    }
}

impl VerifierPolicy {
    /// Every limit lies in its supported range.
    pub fn validate(&self) -> Result<()> {
        let deck = DECK_SIZE as usize;
        check_range("max_ring", self.max_ring, 1, deck)?;
        check_range("max_hand", self.max_hand, 1, deck)?;
        check_range("min_seed_entropy", self.min_seed_entropy, 1, MAX_SEED_ENTROPY)
    }
}

fn check_range(field: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ProofError::InvalidPolicy {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum LengthRule {
    Exact(usize, ProofKind),
    Ring { max_members: usize },
    Above(usize, ProofKind),
}

impl LengthRule {
    fn classify(&self, len: usize) -> Option<ProofKind> {
        match *self {
            LengthRule::Exact(l, kind) => (l == len).then_some(kind),
            LengthRule::Ring { max_members } => ring_size_from_len(len)
                .filter(|&n| n <= max_members)
                .map(|members| ProofKind::Ring { members }),
            LengthRule::Above(l, kind) => (len > l).then_some(kind),
        }
    }

    /// Largest finite length this rule can claim
    fn upper_bound(&self) -> Result<usize> {
        match *self {
            LengthRule::Exact(l, _) | LengthRule::Above(l, _) => Ok(l),
            LengthRule::Ring { max_members } => checked_ring_proof_len(max_members),
        }
    }
}

/// A validated length → kind table
#[derive(Debug, Clone)]
pub struct DispatchTable {
    rules: Vec<LengthRule>,
}

impl DispatchTable {
    /// `{64, 224, > 4000}`
    pub fn seed() -> Result<Self> {
        Self::build(vec![
            LengthRule::Exact(HASH_PROOF_LEN, ProofKind::HashSeed),
            LengthRule::Exact(PEDERSEN_PROOF_LEN, ProofKind::PedersenSeed),
            LengthRule::Above(CIRCUIT_THRESHOLD, ProofKind::Circuit),
        ])
    }

    /// `{96 + 64N, 228}` for `1 ≤ N ≤ max_ring ≤ 36`
    pub fn moves(max_ring: usize) -> Result<Self> {
        check_range("max_ring", max_ring, 1, DECK_SIZE as usize)?;
        Self::build(vec![
            LengthRule::Ring {
                max_members: max_ring,
            },
            LengthRule::Exact(AGGREGATE_PROOF_LEN, ProofKind::Aggregate),
        ])
    }

    fn build(rules: Vec<LengthRule>) -> Result<Self> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// Every length is claimed by at most one rule.
    fn validate(&self) -> Result<()> {
        let mut bound = 0;
        for rule in &self.rules {
            bound = bound.max(rule.upper_bound()?);
        }
        for len in 0..=bound.saturating_add(1) {
            let claims = self
                .rules
                .iter()
                .filter(|rule| rule.classify(len).is_some())
                .count();
            if claims > 1 {
                return Err(ProofError::AmbiguousDispatch(len));
            }
        }
        Ok(())
    }

    pub fn classify(&self, len: usize) -> Result<ProofKind> {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(len))
            .ok_or(ProofError::UnknownProofLength(len))
    }
}

/// Public data for checking a seed reveal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedStatement {
    pub commit_hash: [u8; 32],
    pub seed_hash: [u8; 32],
    pub context: ProofContext,
}

/// Public data for checking a move commitment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveStatement {
    pub commit_hash: [u8; 32],
    /// The mover's hand as known to the verifier
    pub hand: Vec<u32>,
    pub trick_suit: u32,
    pub context: ProofContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Seed(SeedStatement),
    Move(MoveStatement),
}

/// Single verification entry point for every proof kind
#[derive(Clone)]
pub struct Verifier {
    policy: VerifierPolicy,
    seed_table: DispatchTable,
    move_table: DispatchTable,
    circuit: Option<Arc<dyn CircuitVerifier>>,
}

impl Verifier {
    pub fn new(policy: VerifierPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            seed_table: DispatchTable::seed()?,
            move_table: DispatchTable::moves(policy.max_ring)?,
            circuit: None,
        })
    }

    /// Attach the external circuit verifier.
    pub fn with_circuit(mut self, verifier: Arc<dyn CircuitVerifier>) -> Self {
        self.circuit = Some(verifier);
        self
    }

    pub fn policy(&self) -> &VerifierPolicy {
        &self.policy
    }

    /// Classify and verify, returning the kind that was checked.
    pub fn check(&self, proof: &[u8], statement: &Statement) -> Result<ProofKind> {
        match statement {
            Statement::Seed(st) => {
                let kind = self.seed_table.classify(proof.len())?;
                self.check_seed(kind, proof, st)?;
                Ok(kind)
            }
            Statement::Move(st) => {
                let kind = self.move_table.classify(proof.len())?;
                self.check_move(kind, proof, st)?;
                Ok(kind)
            }
        }
    }

    /// Boolean form of [`Verifier::check`]; rejections are logged.
    pub fn verify(&self, proof: &[u8], statement: &Statement) -> bool {
        match self.check(proof, statement) {
            Ok(kind) => {
                debug!("accepted {kind} proof ({} bytes)", proof.len());
                true
            }
            Err(e) => {
                debug!("rejected {} byte proof: {e}", proof.len());
                false
            }
        }
    }

    fn check_seed(&self, kind: ProofKind, proof: &[u8], st: &SeedStatement) -> Result<()> {
        // applies to every seed scheme
        check_entropy(&st.seed_hash, self.policy.min_seed_entropy)?;
        match kind {
            ProofKind::HashSeed => HashSeedProof::from_bytes(proof)?.verify_with_entropy(
                &st.seed_hash,
                &st.commit_hash,
                &st.context,
                self.policy.min_seed_entropy,
            ),
            ProofKind::PedersenSeed => PedersenSeedProof::from_bytes(proof)?.verify_published(
                &st.commit_hash,
                &st.seed_hash,
                &st.context,
            ),
            ProofKind::Circuit => {
                let verifier = self
                    .circuit
                    .as_deref()
                    .ok_or(ProofError::CircuitVerifierMissing)?;
                circuit::verify_seed(verifier, proof, &st.seed_hash, &st.commit_hash)
            }
            ProofKind::Ring { .. } | ProofKind::Aggregate => {
                Err(ProofError::UnknownProofLength(proof.len()))
            }
        }
    }

    fn check_move(&self, kind: ProofKind, proof: &[u8], st: &MoveStatement) -> Result<()> {
        match kind {
            ProofKind::Ring { members } => {
                let valid_set = compliant_ids(&st.hand, st.trick_suit);
                if valid_set.len() != members {
                    return Err(ProofError::SizeMismatch {
                        proof: members,
                        statement: valid_set.len(),
                    });
                }
                RingProof::from_bytes(proof)?.verify_published(
                    &st.commit_hash,
                    &valid_set,
                    &st.context,
                )
            }
            ProofKind::Aggregate => AggregateProof::from_bytes(proof)?.verify_published(
                &st.commit_hash,
                &st.hand,
                st.trick_suit,
                self.policy.max_hand,
                &st.context,
            ),
            ProofKind::HashSeed | ProofKind::PedersenSeed | ProofKind::Circuit => {
                Err(ProofError::UnknownProofLength(proof.len()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_table() {
        let table = DispatchTable::seed().unwrap();
        assert_eq!(table.classify(64).unwrap(), ProofKind::HashSeed);
        assert_eq!(table.classify(224).unwrap(), ProofKind::PedersenSeed);
        assert_eq!(table.classify(4001).unwrap(), ProofKind::Circuit);
        assert_eq!(table.classify(4000), Err(ProofError::UnknownProofLength(4000)));
        assert_eq!(table.classify(160), Err(ProofError::UnknownProofLength(160)));
        assert!(table.classify(0).is_err());
    }

    #[test]
    fn test_move_table() {
        let table = DispatchTable::moves(DEFAULT_MAX_RING).unwrap();
        for n in 1..=DEFAULT_MAX_RING {
            assert_eq!(
                table.classify(96 + 64 * n).unwrap(),
                ProofKind::Ring { members: n }
            );
        }
        assert_eq!(table.classify(228).unwrap(), ProofKind::Aggregate);
        assert!(table.classify(96 + 64 * 10).is_err());
        assert!(table.classify(64).is_err());
        assert!(table.classify(5000).is_err());
    }

    #[test]
    fn test_ring_lengths_avoid_fixed_lengths() {
        use crate::ring::ring_proof_len;
        for n in 1..=DEFAULT_MAX_RING {
            let len = ring_proof_len(n);
            assert_ne!(len, HASH_PROOF_LEN);
            assert_ne!(len, AGGREGATE_PROOF_LEN);
            assert!(len <= CIRCUIT_THRESHOLD);
            if n != 2 {
                assert_ne!(len, PEDERSEN_PROOF_LEN);
            }
        }
        // why the tables are split
        assert_eq!(ring_proof_len(2), PEDERSEN_PROOF_LEN);
    }

    #[test]
    fn test_overlap_detected() {
        let merged = DispatchTable::build(vec![
            LengthRule::Exact(PEDERSEN_PROOF_LEN, ProofKind::PedersenSeed),
            LengthRule::Ring { max_members: 3 },
        ]);
        assert_eq!(merged.unwrap_err(), ProofError::AmbiguousDispatch(224));
    }

    #[test]
    fn test_ring_bound_crossing_circuit_threshold_is_ambiguous() {
        let rules = vec![
            LengthRule::Ring { max_members: 70 },
            LengthRule::Above(CIRCUIT_THRESHOLD, ProofKind::Circuit),
        ];
        assert!(matches!(
            DispatchTable::build(rules),
            Err(ProofError::AmbiguousDispatch(_))
        ));
    }

    #[test]
    fn test_missing_circuit_verifier() {
        let verifier = Verifier::new(VerifierPolicy::default()).unwrap();
        let st = Statement::Seed(SeedStatement {
            commit_hash: [1; 32],
            seed_hash: core::array::from_fn(|i| i as u8),
            context: ProofContext::new(1, "GP").unwrap(),
        });
        assert_eq!(
            verifier.check(&[0u8; 5000], &st),
            Err(ProofError::CircuitVerifierMissing)
        );
        assert!(!verifier.verify(&[0u8; 10], &st));
    }

    #[test]
    fn test_weak_seed_hash_rejected_for_pedersen() {
        let ctx = ProofContext::new(1, "GP").unwrap();
        let weak = [0u8; 32];
        let proof =
            PedersenSeedProof::prove(&weak, &[9u8; 32], &ctx, &mut crate::rng::test_rng()).unwrap();
        // the sigma proof itself is sound for any seed hash
        proof.verify(&weak, &ctx).unwrap();

        let verifier = Verifier::new(VerifierPolicy::default()).unwrap();
        let st = Statement::Seed(SeedStatement {
            commit_hash: proof.commitment.commit_hash(),
            seed_hash: weak,
            context: ctx,
        });
        assert_eq!(
            verifier.check(&proof.to_bytes(), &st),
            Err(ProofError::WeakSeedEntropy {
                distinct: 1,
                required: MIN_SEED_ENTROPY,
            })
        );
    }

    #[test]
    fn test_weak_seed_hash_rejected_before_circuit() {
        let verifier = Verifier::new(VerifierPolicy::default()).unwrap();
        let st = Statement::Seed(SeedStatement {
            commit_hash: [1; 32],
            seed_hash: [2; 32],
            context: ProofContext::new(1, "GP").unwrap(),
        });
        assert!(matches!(
            verifier.check(&[0u8; 5000], &st),
            Err(ProofError::WeakSeedEntropy { .. })
        ));
    }

    #[test]
    fn test_policy_ranges() {
        assert!(VerifierPolicy::default().validate().is_ok());

        let deck = DECK_SIZE as usize;
        let cases = [
            ("max_ring", VerifierPolicy { max_ring: 0, ..Default::default() }),
            ("max_ring", VerifierPolicy { max_ring: deck + 1, ..Default::default() }),
            ("max_hand", VerifierPolicy { max_hand: 0, ..Default::default() }),
            ("max_hand", VerifierPolicy { max_hand: usize::MAX, ..Default::default() }),
            ("min_seed_entropy", VerifierPolicy { min_seed_entropy: 0, ..Default::default() }),
            ("min_seed_entropy", VerifierPolicy { min_seed_entropy: 33, ..Default::default() }),
        ];
        for (field, policy) in cases {
            match Verifier::new(policy) {
                Err(ProofError::InvalidPolicy { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{field}: expected InvalidPolicy, got {:?}", other.err()),
            }
        }

        let edge = VerifierPolicy {
            max_ring: deck,
            max_hand: deck,
            min_seed_entropy: MAX_SEED_ENTROPY,
        };
        assert!(Verifier::new(edge).is_ok());
    }

    #[test]
    fn test_huge_ring_bound_is_an_error() {
        for max in [0, DECK_SIZE as usize + 1, 1 << 20, usize::MAX / 32, usize::MAX] {
            assert!(matches!(
                DispatchTable::moves(max),
                Err(ProofError::InvalidPolicy { field: "max_ring", .. })
            ));
        }
        assert_eq!(
            checked_ring_proof_len(usize::MAX / 32),
            Err(ProofError::LengthOverflow(usize::MAX / 32))
        );
        let rules = vec![LengthRule::Ring {
            max_members: usize::MAX,
        }];
        assert_eq!(
            DispatchTable::build(rules).unwrap_err(),
            ProofError::LengthOverflow(usize::MAX)
        );
    }
}
