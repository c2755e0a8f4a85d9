//! zkplay Configuration
//!
//! Shared configuration crate for all zkplay components.
//!
//! Handles loading configuration from:
//! 1. ZKPLAY_CONFIG env var (explicit path)
//! 2. ./zkplay.toml (current directory)
//! 3. ~/.zkplay/zkplay.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::{env, fmt, fs};
use zkplay_proofs::VerifierPolicy;
use zkplay_proofs::aggregate::DEFAULT_MAX_HAND;
use zkplay_proofs::ring::DEFAULT_MAX_RING;
use zkplay_proofs::seed::MIN_SEED_ENTROPY;

/// Global config instance for convenience access
pub static GLOBAL_CONFIG: OnceLock<ZkPlayConfig> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "zkplay.toml";
const CONFIG_DIR_NAME: &str = ".zkplay";

const DEFAULT_STORE_PATH: &str = "./zkplay-secrets";

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkPlayConfig {
    #[serde(default)]
    pub proofs: ProofsConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Verification limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofsConfig {
    #[serde(default = "default_max_ring")]
    pub max_ring: usize,
    #[serde(default = "default_max_hand")]
    pub max_hand: usize,
    #[serde(default = "default_min_entropy")]
    pub min_seed_entropy: usize,
}

impl Default for ProofsConfig {
    fn default() -> Self {
        Self {
            max_ring: DEFAULT_MAX_RING,
            max_hand: DEFAULT_MAX_HAND,
            min_seed_entropy: MIN_SEED_ENTROPY,
        }
    }
}

fn default_max_ring() -> usize {
    DEFAULT_MAX_RING
}
fn default_max_hand() -> usize {
    DEFAULT_MAX_HAND
}
fn default_min_entropy() -> usize {
    MIN_SEED_ENTROPY
}

/// Where pending secrets live between commit and reveal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Rocksdb,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "rocksdb" => Ok(StoreBackend::Rocksdb),
            other => bail!("unknown store backend: {other}"),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Rocksdb => f.write_str("rocksdb"),
        }
    }
}

/// Secret store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: DEFAULT_STORE_PATH.into(),
        }
    }
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.into()
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Set field from the variable if present
fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut String) {
    if let Some(v) = lookup(key) {
        *field = v;
    }
}

/// Set field from the variable if present and parseable
fn env_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut T) {
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("ignoring unparseable {key}={v}"),
        }
    }
}

// ============================================================================
// Implementation
// ============================================================================

impl ZkPlayConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject limits outside the ranges the verifier supports
    pub fn validate(&self) -> Result<()> {
        self.policy().validate().context("Invalid [proofs] configuration")
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("ZKPLAY_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        Self::default_config_path().filter(|p| p.exists())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Store
        env_parse(&lookup, "ZKPLAY_STORE_BACKEND", &mut self.store.backend);
        env_string(&lookup, "ZKPLAY_STORE_PATH", &mut self.store.path);

        // Proofs
        env_parse(&lookup, "ZKPLAY_MAX_RING", &mut self.proofs.max_ring);
        env_parse(&lookup, "ZKPLAY_MAX_HAND", &mut self.proofs.max_hand);
        env_parse(&lookup, "ZKPLAY_MIN_ENTROPY", &mut self.proofs.min_seed_entropy);
    }

    /// Limits handed to the verifier and provers
    pub fn policy(&self) -> VerifierPolicy {
        VerifierPolicy {
            max_ring: self.proofs.max_ring,
            max_hand: self.proofs.max_hand,
            min_seed_entropy: self.proofs.min_seed_entropy,
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Get the global config instance, initializing it if necessary.
    ///
    /// Falls back to defaults if loading fails.
    pub fn global() -> &'static ZkPlayConfig {
        GLOBAL_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                log::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Returns `None` if config hasn't been initialized yet.
    pub fn try_global() -> Option<&'static ZkPlayConfig> {
        GLOBAL_CONFIG.get()
    }

    /// Returns `Err(config)` if already initialized.
    pub fn set_global(config: ZkPlayConfig) -> Result<(), ZkPlayConfig> {
        GLOBAL_CONFIG.set(config)
    }
}

/// Shorthand for `ZkPlayConfig::global()`.
#[inline]
pub fn global_config() -> &'static ZkPlayConfig {
    ZkPlayConfig::global()
}

// ============================================================================
// Tests
// ============================================================================
