mod play;
mod seed;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use zkplay_config::{StoreBackend, ZkPlayConfig};
use zkplay_proofs::shuffle::DEFAULT_HAND_SIZE;
use zkplay_proofs::{Card, ProofContext, deal, shuffle_deck, shuffle_seed};
use zkplay_vault::{MemoryStore, PendingSecrets, RocksDbStore, SecretStore};

#[derive(Parser, Debug)]
#[command(name = "zkplay")]
#[command(about = "Commit, prove and verify card game moves")]
struct Cli {
    /// Config file (otherwise ZKPLAY_CONFIG, ./zkplay.toml, ~/.zkplay/zkplay.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shuffle seed commitments
    Seed {
        #[command(subcommand)]
        action: seed::SeedAction,
    },
    /// Card play commitments
    Play {
        #[command(subcommand)]
        action: play::PlayAction,
    },
    /// Rebuild the deck from both revealed seed hashes
    Shuffle {
        #[arg(long, value_parser = parse_hash)]
        first: [u8; 32],
        #[arg(long, value_parser = parse_hash)]
        second: [u8; 32],
        #[arg(long)]
        session: u32,
        #[arg(long, default_value_t = DEFAULT_HAND_SIZE)]
        hand_size: usize,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print a sample zkplay.toml
    Sample,
    /// Print the effective configuration
    Show,
}

/// Seat identity shared by seed and play commands
#[derive(clap::Args, Debug, Clone)]
pub struct Seat {
    #[arg(long)]
    session: u32,
    #[arg(long, env = "ZKPLAY_PLAYER")]
    player: String,
}

impl Seat {
    pub fn context(&self) -> Result<ProofContext> {
        Ok(ProofContext::new(self.session, self.player.clone())?)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        let config = ZkPlayConfig::load_from(path)?;
        ZkPlayConfig::set_global(config).map_err(|_| anyhow!("config already initialized"))?;
    }
    let config = ZkPlayConfig::global();

    match cli.command {
        Command::Seed { action } => seed::run(action, config),
        Command::Play { action } => play::run(action, config),
        Command::Shuffle {
            first,
            second,
            session,
            hand_size,
        } => shuffle(&first, &second, session, hand_size),
        Command::Config { action } => {
            match action {
                ConfigAction::Sample => print!("{}", ZkPlayConfig::generate_sample()),
                ConfigAction::Show => print!("{}", toml::to_string_pretty(config)?),
            }
            Ok(())
        }
    }
}

fn shuffle(first: &[u8; 32], second: &[u8; 32], session: u32, hand_size: usize) -> Result<()> {
    let seed = shuffle_seed(first, second, session);
    let dealt = deal(&shuffle_deck(&seed), hand_size)?;

    println!("shuffle_seed: {}", hex::encode(seed));
    println!("first:        {}", render_cards(&dealt.first));
    println!("second:       {}", render_cards(&dealt.second));
    println!("draw_pile:    {}", render_cards(&dealt.draw_pile));
    Ok(())
}

fn render_cards(ids: &[u32]) -> String {
    ids.iter()
        .map(|&id| match Card::from_id(id) {
            Ok(card) => format!("{id}({card})"),
            Err(_) => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Open the configured secret store.
pub fn open_vault(config: &ZkPlayConfig) -> Result<PendingSecrets<Arc<dyn SecretStore>>> {
    let store: Arc<dyn SecretStore> = match config.store.backend {
        StoreBackend::Memory => {
            warn!("memory store selected; secrets will not survive this process");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Rocksdb => Arc::new(
            RocksDbStore::open(&config.store.path)
                .with_context(|| format!("cannot open secret store at {}", config.store.path))?,
        ),
    };
    Ok(PendingSecrets::new(store))
}

pub fn parse_hash(s: &str) -> Result<[u8; 32]> {
    let bytes = parse_hex(s)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("expected 32 bytes, got {}", b.len()))
}

pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim_start_matches("0x")).context("invalid hex")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hash() {
        let hex32 = "ab".repeat(32);
        assert_eq!(parse_hash(&hex32).unwrap(), [0xab; 32]);
        assert_eq!(parse_hash(&format!("0x{hex32}")).unwrap(), [0xab; 32]);
        assert!(parse_hash("abcd").is_err());
        assert!(parse_hash("zz").is_err());
    }

    #[test]
    fn test_parse_play_commit() {
        let cli = Cli::try_parse_from([
            "zkplay", "play", "commit", "--session", "3", "--player", "GALICE", "--hand",
            "2,10,14", "--suit", "1", "--card", "10",
        ])
        .unwrap();
        let Command::Play {
            action: play::PlayAction::Commit { hand, card, .. },
        } = cli.command
        else {
            panic!("wrong command");
        };
        assert_eq!(hand, vec![2, 10, 14]);
        assert_eq!(card, Some(10));
    }

    #[test]
    fn test_parse_play_aggregate() {
        let base = [
            "zkplay", "play", "commit", "--session", "3", "--player", "GALICE", "--hand", "2,10",
            "--suit", "3", "--aggregate",
        ];
        let cli = Cli::try_parse_from(base).unwrap();
        let Command::Play {
            action: play::PlayAction::Commit {
                aggregate, card, ..
            },
        } = cli.command
        else {
            panic!("wrong command");
        };
        assert!(aggregate);
        assert_eq!(card, None);

        let with_card = base.iter().copied().chain(["--card", "2"]);
        assert!(Cli::try_parse_from(with_card).is_err());
    }

    #[test]
    fn test_render_cards() {
        assert_eq!(render_cards(&[u32::MAX]), u32::MAX.to_string());
        assert!(render_cards(&[0, 35]).starts_with("0("));
    }
}
