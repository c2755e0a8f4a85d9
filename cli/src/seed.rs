use crate::{Seat, open_vault, parse_hash, parse_hex};
use anyhow::{Result, bail};
use clap::Subcommand;
use log::info;
use rand::rngs::OsRng;
use zkplay_config::ZkPlayConfig;
use zkplay_proofs::{SeedScheme, SeedSecret, SeedStatement, Statement, Verifier};
use zkplay_vault::PendingSeed;

#[derive(Subcommand, Debug)]
pub enum SeedAction {
    /// Generate a seed, store it and print the commit hash
    Commit {
        #[command(flatten)]
        seat: Seat,
        /// compact | pedersen
        #[arg(long, default_value = "pedersen")]
        scheme: SeedScheme,
    },
    /// Load the stored seed and print its seed hash and proof
    Reveal {
        #[command(flatten)]
        seat: Seat,
        /// Keep the secret in the store after revealing
        #[arg(long)]
        keep: bool,
    },
    /// Check a revealed seed against its commit hash
    Verify {
        #[command(flatten)]
        seat: Seat,
        #[arg(long, value_parser = parse_hash)]
        commit: [u8; 32],
        #[arg(long, value_parser = parse_hash)]
        seed_hash: [u8; 32],
        #[arg(long)]
        proof: String,
    },
}

pub fn run(action: SeedAction, config: &ZkPlayConfig) -> Result<()> {
    match action {
        SeedAction::Commit { seat, scheme } => commit(&seat, scheme, config),
        SeedAction::Reveal { seat, keep } => reveal(&seat, keep, config),
        SeedAction::Verify {
            seat,
            commit,
            seed_hash,
            proof,
        } => verify(&seat, commit, seed_hash, &proof, config),
    }
}

fn commit(seat: &Seat, scheme: SeedScheme, config: &ZkPlayConfig) -> Result<()> {
    if scheme == SeedScheme::Circuit {
        // reveal would need a circuit prover, which this tool does not carry
        bail!("circuit seeds cannot be revealed from the CLI; use compact or pedersen");
    }
    let ctx = seat.context()?;
    let vault = open_vault(config)?;
    if vault.load_seed(&ctx)?.is_some() {
        bail!(
            "a seed for session {} is already pending; reveal it first",
            ctx.session_id()
        );
    }

    let secret = SeedSecret::generate(scheme, &mut OsRng);
    let pending = PendingSeed {
        commit_hash: secret.commit_hash(&ctx)?,
        secret,
    };
    // stored before the hash is printed
    vault.save_seed(&ctx, &pending)?;
    info!("committed {scheme} seed for session {}", ctx.session_id());

    println!("✅ commit_hash: {}", hex::encode(pending.commit_hash));
    Ok(())
}

fn reveal(seat: &Seat, keep: bool, config: &ZkPlayConfig) -> Result<()> {
    let ctx = seat.context()?;
    let vault = open_vault(config)?;
    let Some(pending) = vault.load_seed(&ctx)? else {
        bail!("no pending seed for session {}", ctx.session_id());
    };

    let reveal = pending
        .secret
        .reveal(&pending.commit_hash, &ctx, &mut OsRng)?;
    if !keep {
        vault.clear_seed(&ctx)?;
    }

    println!("commit_hash: {}", hex::encode(pending.commit_hash));
    println!("seed_hash:   {}", hex::encode(reveal.seed_hash));
    println!("proof:       {}", hex::encode(&reveal.proof));
    Ok(())
}

fn verify(
    seat: &Seat,
    commit_hash: [u8; 32],
    seed_hash: [u8; 32],
    proof: &str,
    config: &ZkPlayConfig,
) -> Result<()> {
    let proof = parse_hex(proof)?;
    let statement = Statement::Seed(SeedStatement {
        commit_hash,
        seed_hash,
        context: seat.context()?,
    });

    let kind = Verifier::new(config.policy())?.check(&proof, &statement)?;
    println!("✅ valid {kind} proof");
    Ok(())
}
