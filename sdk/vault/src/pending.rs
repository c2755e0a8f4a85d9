//! Typed access to pending secrets
//!
//! Keys are `seed/<session>/<player>` and `play/<session>/<player>`; one
//! pending seed and one pending move per seat at a time.

use crate::store::SecretStore;
use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use zkplay_proofs::{PlaySecret, ProofContext, SeedSecret};

/// A seed secret plus the commit hash that was published for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSeed {
    pub commit_hash: [u8; 32],
    pub secret: SeedSecret,
}

/// A move secret plus the commit hash that was published for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPlay {
    pub commit_hash: [u8; 32],
    pub secret: PlaySecret,
}

pub struct PendingSecrets<S: SecretStore> {
    store: S,
}

fn key(kind: &str, ctx: &ProofContext) -> Vec<u8> {
    format!("{kind}/{}/{}", ctx.session_id(), ctx.player()).into_bytes()
}

impl<S: SecretStore> PendingSecrets<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save<T: Serialize>(&self, kind: &str, ctx: &ProofContext, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).context("failed to encode pending secret")?;
        self.store.put(&key(kind, ctx), &bytes)?;
        debug!("stored pending {kind} for session {}", ctx.session_id());
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, kind: &str, ctx: &ProofContext) -> Result<Option<T>> {
        match self.store.get(&key(kind, ctx))? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("corrupt pending {kind} record"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn save_seed(&self, ctx: &ProofContext, pending: &PendingSeed) -> Result<()> {
        self.save("seed", ctx, pending)
    }

    pub fn load_seed(&self, ctx: &ProofContext) -> Result<Option<PendingSeed>> {
        self.load("seed", ctx)
    }

    pub fn clear_seed(&self, ctx: &ProofContext) -> Result<()> {
        self.store.clear(&key("seed", ctx))
    }

    pub fn save_play(&self, ctx: &ProofContext, pending: &PendingPlay) -> Result<()> {
        self.save("play", ctx, pending)
    }

    pub fn load_play(&self, ctx: &ProofContext) -> Result<Option<PendingPlay>> {
        self.load("play", ctx)
    }

    pub fn clear_play(&self, ctx: &ProofContext) -> Result<()> {
        self.store.clear(&key("play", ctx))
    }
}
