use crate::{Seat, open_vault, parse_hash, parse_hex};
use anyhow::{Result, bail};
use clap::Subcommand;
use log::info;
use rand::rngs::OsRng;
use zkplay_config::ZkPlayConfig;
use zkplay_proofs::{
    Card, MoveStatement, PlayCommit, ProofContext, RandomSource, Statement, Verifier,
    VerifierPolicy, commit_not_following, commit_play,
};
use zkplay_vault::PendingPlay;

#[derive(Subcommand, Debug)]
pub enum PlayAction {
    /// Commit to a card, or to having no card of the led suit
    Commit {
        #[command(flatten)]
        seat: Seat,
        /// Card ids in hand, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        hand: Vec<u32>,
        /// Suit of the card that was led
        #[arg(long)]
        suit: u32,
        /// Card id to play; omit when no card follows suit
        #[arg(long)]
        card: Option<u32>,
        /// With no card, prove the whole hand lacks the led suit
        #[arg(long, conflicts_with = "card")]
        aggregate: bool,
    },
    /// Open the stored move
    Reveal {
        #[command(flatten)]
        seat: Seat,
        /// Hand at commit time, needed for whole-hand openings
        #[arg(long, value_delimiter = ',')]
        hand: Vec<u32>,
        #[arg(long)]
        keep: bool,
    },
    /// Check a move proof against the mover's hand
    Verify {
        #[command(flatten)]
        seat: Seat,
        #[arg(long, value_parser = parse_hash)]
        commit: [u8; 32],
        #[arg(long, value_delimiter = ',', required = true)]
        hand: Vec<u32>,
        #[arg(long)]
        suit: u32,
        #[arg(long)]
        proof: String,
    },
}

pub fn run(action: PlayAction, config: &ZkPlayConfig) -> Result<()> {
    match action {
        PlayAction::Commit {
            seat,
            hand,
            suit,
            card,
            aggregate,
        } => commit(&seat, &hand, suit, card, aggregate, config),
        PlayAction::Reveal { seat, hand, keep } => reveal(&seat, &hand, keep, config),
        PlayAction::Verify {
            seat,
            commit,
            hand,
            suit,
            proof,
        } => verify(&seat, commit, hand, suit, &proof, config),
    }
}

fn commit(
    seat: &Seat,
    hand: &[u32],
    suit: u32,
    card: Option<u32>,
    aggregate: bool,
    config: &ZkPlayConfig,
) -> Result<()> {
    let ctx = seat.context()?;
    let vault = open_vault(config)?;
    if vault.load_play(&ctx)?.is_some() {
        bail!(
            "a move for session {} is already pending; reveal it first",
            ctx.session_id()
        );
    }

    let commit = build_commit(card, hand, suit, aggregate, &config.policy(), &ctx, &mut OsRng)?;
    vault.save_play(
        &ctx,
        &PendingPlay {
            commit_hash: commit.commit_hash,
            secret: commit.secret.clone(),
        },
    )?;
    info!(
        "committed {} move for session {}",
        commit.secret.mode().name(),
        ctx.session_id()
    );

    println!("✅ commit_hash: {}", hex::encode(commit.commit_hash));
    match &commit.proof {
        Some(proof) => println!("proof:          {}", hex::encode(proof)),
        None => println!("proof:          (none, opened by reveal)"),
    }
    Ok(())
}

/// Aggregate hand proof when asked for, otherwise the default choice.
fn build_commit<R: RandomSource + ?Sized>(
    card: Option<u32>,
    hand: &[u32],
    suit: u32,
    aggregate: bool,
    policy: &VerifierPolicy,
    ctx: &ProofContext,
    rng: &mut R,
) -> Result<PlayCommit> {
    let commit = if aggregate {
        commit_not_following(hand, suit, policy, ctx, rng)?
    } else {
        commit_play(card, hand, suit, policy, ctx, rng)?
    };
    Ok(commit)
}

fn reveal(seat: &Seat, hand: &[u32], keep: bool, config: &ZkPlayConfig) -> Result<()> {
    let ctx = seat.context()?;
    let vault = open_vault(config)?;
    let Some(pending) = vault.load_play(&ctx)? else {
        bail!("no pending move for session {}", ctx.session_id());
    };

    pending.secret.verify_opening(&pending.commit_hash, hand)?;
    if !keep {
        vault.clear_play(&ctx)?;
    }

    let secret = &pending.secret;
    if secret.is_no_compliant() {
        println!("card: none");
    } else {
        println!("card: {} ({})", secret.card(), Card::from_id(secret.card())?);
    }
    println!("mode: {}", secret.mode().name());
    println!("salt: {}", hex::encode(secret.salt()));
    Ok(())
}

fn verify(
    seat: &Seat,
    commit_hash: [u8; 32],
    hand: Vec<u32>,
    trick_suit: u32,
    proof: &str,
    config: &ZkPlayConfig,
) -> Result<()> {
    let proof = parse_hex(proof)?;
    let statement = Statement::Move(MoveStatement {
        commit_hash,
        hand,
        trick_suit,
        context: seat.context()?,
    });

    let kind = Verifier::new(config.policy())?.check(&proof, &statement)?;
    println!("✅ valid {kind} proof");
    Ok(())
}
