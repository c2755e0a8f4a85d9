//! zkplay proofs
//!
//! Commit-and-reveal primitives for a two-player trick-taking card game:
//! seeds for a fair shuffle, and moves with optional proofs that they follow
//! the rules. Nobody learns the other side's secret before it is revealed.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Verifier (dispatch)                      │
//! │     seed table: 64 │ 224 │ >4000      move table: 96+64N │ 228   │
//! └──────────────────────────────────────────────────────────────────┘
//!        │          │        │                    │           │
//!        ▼          ▼        ▼                    ▼           ▼
//! ┌───────────┐ ┌───────┐ ┌─────────┐      ┌──────────┐ ┌───────────┐
//! │hash_commit│ │ sigma │ │ circuit │      │   ring   │ │ aggregate │
//! └───────────┘ └───────┘ └─────────┘      └──────────┘ └───────────┘
//!        │          │                             │           │
//!        │          └──────────────┬──────────────┴───────────┘
//!        ▼                         ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  hash (keccak, blake2s, transcript)  │  pedersen  │  field (G, H) │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Secrets between commit and reveal are [`SeedSecret`] and [`PlaySecret`];
//! both serialize with serde so they can be parked in a durable store.

pub mod aggregate;
pub mod card;
pub mod circuit;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod field;
pub mod hash;
pub mod hash_commit;
pub mod pedersen;
pub mod play;
pub mod reveal;
pub mod ring;
pub mod rng;
pub mod seed;
pub mod shuffle;
pub mod sigma;

pub use aggregate::{AGGREGATE_PROOF_LEN, AggregateProof, HandCommitment};
pub use card::{Card, DECK_SIZE, NO_COMPLIANT_MOVE, compliant_ids};
pub use circuit::{CIRCUIT_THRESHOLD, CircuitProver, CircuitVerifier};
pub use context::ProofContext;
pub use dispatch::{
    DispatchTable, MoveStatement, ProofKind, SeedStatement, Statement, Verifier, VerifierPolicy,
};
pub use errors::{ProofError, Result};
pub use hash_commit::{HASH_PROOF_LEN, HashSeedProof};
pub use pedersen::PedersenCommitment;
pub use play::{PlayCommit, PlayMode, PlaySecret, commit_not_following, commit_play};
pub use reveal::SeedReveal;
pub use ring::{RingProof, ring_proof_len};
pub use rng::RandomSource;
pub use seed::{SeedScheme, SeedSecret};
pub use shuffle::{Deal, deal, shuffle_deck, shuffle_seed};
pub use sigma::{PEDERSEN_PROOF_LEN, PedersenSeedProof};
