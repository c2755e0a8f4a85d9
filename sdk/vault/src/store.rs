use anyhow::Result;

/// Durable key-value storage for secrets between commit and reveal.
///
/// A `put` must be durable before the matching commitment is published,
/// otherwise a crash in between leaves a commitment that can never be opened.
pub trait SecretStore: Send + Sync {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Removing a missing key is not an error.
    fn clear(&self, key: &[u8]) -> Result<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for std::sync::Arc<S> {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn clear(&self, key: &[u8]) -> Result<()> {
        (**self).clear(key)
    }
}
