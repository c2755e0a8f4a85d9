//! Session binding for challenges
//!
//! Every challenge hashes the session id and the player address so a proof
//! made for one game or one seat never verifies for another.

use crate::errors::{ProofError, Result};
use crate::hash::Transcript;
use serde::{Deserialize, Serialize};

/// Session id plus player address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawContext")]
pub struct ProofContext {
    session_id: u32,
    player: String,
}

#[derive(Deserialize)]
struct RawContext {
    session_id: u32,
    player: String,
}

impl TryFrom<RawContext> for ProofContext {
    type Error = ProofError;

    fn try_from(raw: RawContext) -> Result<Self> {
        Self::new(raw.session_id, raw.player)
    }
}

impl ProofContext {
    pub fn new(session_id: u32, player: impl Into<String>) -> Result<Self> {
        let player = player.into();
        if player.is_empty() {
            return Err(ProofError::EmptyPlayer);
        }
        Ok(Self { session_id, player })
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn player_bytes(&self) -> &[u8] {
        self.player.as_bytes()
    }

    /// Append `session_be4 ∥ player` to a transcript.
    pub fn bind(&self, transcript: &mut Transcript) {
        transcript
            .append_u32(self.session_id)
            .append(self.player_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_player_rejected() {
        assert_eq!(ProofContext::new(1, ""), Err(ProofError::EmptyPlayer));
    }

    #[test]
    fn test_deserialize_checks_player() {
        let ctx: ProofContext =
            serde_json::from_str(r#"{"session_id":7,"player":"GPLAYER"}"#).unwrap();
        assert_eq!(ctx, ProofContext::new(7, "GPLAYER").unwrap());

        let err = serde_json::from_str::<ProofContext>(r#"{"session_id":7,"player":""}"#);
        assert!(err.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_bind_layout() {
        let ctx = ProofContext::new(42, "GPLAYER").unwrap();
        let mut t = Transcript::new();
        ctx.bind(&mut t);

        let mut expected = Transcript::new();
        expected.append(&[0, 0, 0, 42]).append(b"GPLAYER");
        assert_eq!(t.finalize(), expected.finalize());
    }
}
