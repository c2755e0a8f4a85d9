//! zkplay vault
//!
//! Keeps seed and move secrets alive across the commit → reveal gap.
//!
//! ```text
//! commit:  generate secret ─► PendingSecrets::save_* ─► publish commit hash
//! reveal:  PendingSecrets::load_* ─► rebuild proof ─► publish ─► clear_*
//! ```

pub mod memory;
pub mod pending;
pub mod rocks;
pub mod store;

pub use memory::MemoryStore;
pub use pending::{PendingPlay, PendingSecrets, PendingSeed};
pub use rocks::RocksDbStore;
pub use store::SecretStore;
