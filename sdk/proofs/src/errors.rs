//! Error definitions for commitment and proof operations.
//!
//! Every routine in this crate either succeeds or returns one of these
//! variants. Verification never panics on attacker-controlled bytes.
use thiserror::Error;

/// Errors that can occur while building or checking commitments and proofs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Byte input of the wrong width
    #[error("Invalid length for {what}: expected {expected}, got {got}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Bytes do not decode to a point in the prime-order subgroup
    #[error("Invalid G1 point encoding")]
    InvalidPoint,

    /// Scalar bytes are not the canonical encoding of a field element
    #[error("Non-canonical scalar encoding")]
    NonCanonicalScalar,

    /// Player address is empty
    #[error("Player address must not be empty")]
    EmptyPlayer,

    /// Blinding factor reduces to zero
    #[error("Blinding factor must be non-zero")]
    ZeroBlinding,

    /// Seed or seed hash has too few distinct byte values
    #[error("Weak seed entropy: {distinct} distinct bytes, need at least {required}")]
    WeakSeedEntropy { distinct: usize, required: usize },

    /// Ring proofs need at least one member
    #[error("Valid set is empty")]
    EmptyValidSet,

    /// Ring size above the configured maximum
    #[error("Valid set too large: max {max}, got {size}")]
    ValidSetTooLarge { size: usize, max: usize },

    /// Committed item is not a member of the valid set
    #[error("Card {0} is not in the valid set")]
    CardNotInValidSet(u32),

    /// Card identifier outside the deck
    #[error("Invalid card id: {0}")]
    InvalidCard(u32),

    /// Suit outside 0..4
    #[error("Invalid suit: {0}")]
    InvalidSuit(u32),

    /// Aggregate proofs need at least one item
    #[error("Hand is empty")]
    EmptyHand,

    /// Hand above the configured maximum
    #[error("Hand too large: max {max}, got {size}")]
    HandTooLarge { size: usize, max: usize },

    /// One blinding factor per committed item is required
    #[error("Blinding count mismatch: {items} items, {blindings} blindings")]
    BlindingCountMismatch { items: usize, blindings: usize },

    /// A hand item shares the excluded suit
    #[error("Card {card} follows excluded suit {suit}")]
    SuitViolation { card: u32, suit: u32 },

    /// Proof size and statement disagree on the number of items
    #[error("Size mismatch: proof encodes {proof}, statement has {statement}")]
    SizeMismatch { proof: usize, statement: usize },

    /// Recomputed commitment differs from the published one
    #[error("Commitment mismatch")]
    CommitmentMismatch,

    /// Recomputed response differs from the embedded one
    #[error("Response mismatch")]
    ResponseMismatch,

    /// Sigma verification equation does not hold
    #[error("Sigma equation check failed")]
    SigmaCheckFailed,

    /// Ring challenges do not sum to the transcript challenge
    #[error("Ring challenge sum mismatch")]
    ChallengeSumMismatch,

    /// No proof kind is registered for this length
    #[error("Unsupported proof length: {0}")]
    UnknownProofLength(usize),

    /// Two proof kinds claim the same length
    #[error("Ambiguous dispatch table: length {0} maps to more than one kind")]
    AmbiguousDispatch(usize),

    /// Verifier limit outside its supported range
    #[error("Invalid policy: {field} = {value}, expected {min}..={max}")]
    InvalidPolicy {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Ring size whose encoded length does not fit in `usize`
    #[error("Ring of {0} members has no representable proof length")]
    LengthOverflow(usize),

    /// Large proofs need an external verifier
    #[error("No circuit verifier configured")]
    CircuitVerifierMissing,

    /// External verifier rejected or failed
    #[error("Circuit verification failed: {0}")]
    CircuitRejected(String),

    /// Opening uses a different mode than the stored secret
    #[error("Mode mismatch: expected {expected}, got {got}")]
    ModeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Cryptographic operation error
    #[error("Cryptographic error: {0}")]
    CryptoError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for proof operations
pub type Result<T> = std::result::Result<T, ProofError>;
