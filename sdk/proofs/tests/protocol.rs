use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use zkplay_proofs::circuit::public_inputs;
use zkplay_proofs::play::{commit_hashed, commit_not_following};
use zkplay_proofs::{
    CircuitProver, CircuitVerifier, MoveStatement, PlaySecret, ProofContext, ProofError,
    ProofKind, SeedScheme, SeedSecret, Statement, Verifier, VerifierPolicy, commit_play,
    compliant_ids, deal, shuffle_deck, shuffle_seed,
};

fn test_rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(0x5eed)
}

const SESSION: u32 = 4242;

fn players() -> (ProofContext, ProofContext) {
    (
        ProofContext::new(SESSION, "GALICEPLAYERADDRESS").unwrap(),
        ProofContext::new(SESSION, "GBOBPLAYERADDRESS").unwrap(),
    )
}

/// Stand-in for an external proving system: the "proof" is the public
/// inputs padded past the dispatch threshold.
struct PaddingCircuit;

impl CircuitProver for PaddingCircuit {
    fn prove(&self, _seed: &[u8; 32], public_inputs: &[u8]) -> zkplay_proofs::Result<Vec<u8>> {
        let mut proof = public_inputs.to_vec();
        proof.resize(8 * 1024, 0x5A);
        Ok(proof)
    }
}

impl CircuitVerifier for PaddingCircuit {
    fn verify(&self, public_inputs: &[u8], proof: &[u8]) -> zkplay_proofs::Result<()> {
        if proof.starts_with(public_inputs) {
            Ok(())
        } else {
            Err(ProofError::CircuitRejected("public inputs not bound".into()))
        }
    }
}

#[test]
fn full_session_flow() {
    let mut rng = test_rng();
    let policy = VerifierPolicy::default();
    let verifier = Verifier::new(policy).unwrap();
    let (alice, bob) = players();

    // Commit phase
    let alice_secret = SeedSecret::generate(SeedScheme::Pedersen, &mut rng);
    let bob_secret = SeedSecret::generate(SeedScheme::Compact, &mut rng);
    let alice_commit = alice_secret.commit_hash(&alice).unwrap();
    let bob_commit = bob_secret.commit_hash(&bob).unwrap();

    // Secrets survive a round trip through durable storage
    let parked = serde_json::to_vec(&alice_secret).unwrap();
    let alice_secret: SeedSecret = serde_json::from_slice(&parked).unwrap();

    // Reveal phase
    let alice_reveal = alice_secret.reveal(&alice_commit, &alice, &mut rng).unwrap();
    let bob_reveal = bob_secret.reveal(&bob_commit, &bob, &mut rng).unwrap();
    assert_eq!(alice_reveal.proof.len(), 224);
    assert_eq!(bob_reveal.proof.len(), 64);

    assert_eq!(
        verifier.check(&alice_reveal.proof, &alice_reveal.statement(alice_commit, alice.clone())),
        Ok(ProofKind::PedersenSeed)
    );
    assert_eq!(
        verifier.check(&bob_reveal.proof, &bob_reveal.statement(bob_commit, bob.clone())),
        Ok(ProofKind::HashSeed)
    );

    // A reveal cannot be replayed for the other seat
    let replayed = alice_reveal.statement(alice_commit, bob.clone());
    assert!(!verifier.verify(&alice_reveal.proof, &replayed));

    // Both sides derive the same deck
    let seed = shuffle_seed(&alice_reveal.seed_hash, &bob_reveal.seed_hash, SESSION);
    let deck = shuffle_deck(&seed);
    let dealt = deal(&deck, 5).unwrap();
    assert_eq!(dealt.first.len() + dealt.second.len() + dealt.draw_pile.len(), 36);

    // Alice leads; Bob answers in the led suit if he can
    let lead = dealt.first[0];
    let trick_suit = lead / 9;
    let bob_hand = dealt.second.clone();
    let followable = compliant_ids(&bob_hand, trick_suit);

    let card = followable.first().copied();
    let commit = match card {
        Some(card) => commit_play(Some(card), &bob_hand, trick_suit, &policy, &bob, &mut rng),
        None => commit_not_following(&bob_hand, trick_suit, &policy, &bob, &mut rng),
    }
    .unwrap();

    let statement = Statement::Move(MoveStatement {
        commit_hash: commit.commit_hash,
        hand: bob_hand.clone(),
        trick_suit,
        context: bob.clone(),
    });
    let proof = commit.proof.as_deref().unwrap();
    let kind = verifier.check(proof, &statement).unwrap();
    match card {
        Some(_) => assert_eq!(kind, ProofKind::Ring { members: followable.len() }),
        None => assert_eq!(kind, ProofKind::Aggregate),
    }

    // Opening the move later
    let parked = serde_json::to_vec(&commit.secret).unwrap();
    let reopened: PlaySecret = serde_json::from_slice(&parked).unwrap();
    assert!(reopened.verify_opening(&commit.commit_hash, &bob_hand).is_ok());
}

#[test]
fn circuit_seed_flow() {
    let mut rng = test_rng();
    let (alice, _) = players();
    let circuit = Arc::new(PaddingCircuit);
    let verifier = Verifier::new(VerifierPolicy::default())
        .unwrap()
        .with_circuit(circuit.clone());

    let secret = SeedSecret::generate(SeedScheme::Circuit, &mut rng);
    let published = secret.commit_hash(&alice).unwrap();
    let reveal = secret.reveal_circuit(&published, &alice, circuit.as_ref()).unwrap();

    assert!(reveal.proof.len() > 4000);
    assert!(reveal.proof.starts_with(&public_inputs(&reveal.seed_hash)));
    assert_eq!(
        verifier.check(&reveal.proof, &reveal.statement(published, alice.clone())),
        Ok(ProofKind::Circuit)
    );

    let no_circuit = Verifier::new(VerifierPolicy::default()).unwrap();
    assert_eq!(
        no_circuit.check(&reveal.proof, &reveal.statement(published, alice)),
        Err(ProofError::CircuitVerifierMissing)
    );
}

#[test]
fn sentinel_move_opens_without_proof() {
    let mut rng = test_rng();
    let commit = commit_hashed(None, &mut rng);
    assert!(commit.proof.is_none());
    assert!(commit.secret.is_no_compliant());
    assert!(commit.secret.verify_opening(&commit.commit_hash, &[]).is_ok());
}

#[test]
fn seed_proof_never_dispatches_as_move() {
    let mut rng = test_rng();
    let (alice, _) = players();
    let verifier = Verifier::new(VerifierPolicy::default()).unwrap();

    let secret = SeedSecret::generate(SeedScheme::Compact, &mut rng);
    let published = secret.commit_hash(&alice).unwrap();
    let reveal = secret.reveal(&published, &alice, &mut rng).unwrap();

    let as_move = Statement::Move(MoveStatement {
        commit_hash: published,
        hand: vec![0, 1, 2],
        trick_suit: 0,
        context: alice,
    });
    assert_eq!(
        verifier.check(&reveal.proof, &as_move),
        Err(ProofError::UnknownProofLength(64))
    );
}
