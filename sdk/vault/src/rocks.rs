use crate::store::SecretStore;
use anyhow::{Context, Result};
use log::info;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteOptions};
use std::path::Path;
use std::sync::Arc;

const CF_PENDING: &str = "pending_secrets";

/// RocksDB-backed secret store.
///
/// Writes are synced to disk before returning.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens the database at the specified path, creating it if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = vec![ColumnFamilyDescriptor::new(CF_PENDING, Options::default())];

        let db = DB::open_cf_descriptors(&opts, path.as_ref(), families)
            .map_err(|e| anyhow::anyhow!("Failed to open RocksDB: {}", e))?;
        info!("opened secret store at {}", path.as_ref().display());

        Ok(Self { db: Arc::new(db) })
    }

    fn synced() -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(true);
        opts
    }
}

impl SecretStore for RocksDbStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_PENDING)
            .context("pending_secrets CF missing")?;

        self.db.put_cf_opt(cf, key, value, &Self::synced())?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self
            .db
            .cf_handle(CF_PENDING)
            .context("pending_secrets CF missing")?;

        Ok(self.db.get_cf(cf, key)?)
    }

    fn clear(&self, key: &[u8]) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_PENDING)
            .context("pending_secrets CF missing")?;

        self.db.delete_cf_opt(cf, key, &Self::synced())?;
        Ok(())
    }
}
