// Transient Store Port (TTL-aware key-value storage)

use crate::error::Result;
use async_trait::async_trait;

/// A live key-value record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transient {
    pub value: String,
    /// Bumped on every write; never reused for a key, even after expiry
    pub version: u64,
    /// Absolute expiry (epoch ms); the record is absent once `now >= expires_at`
    pub expires_at: i64,
}

/// Rewrite callback for [`TransientStore::update`].
///
/// Receives the live value (`None` when absent or expired) and returns the
/// replacement, or `None` to leave the record untouched.
pub type Rewrite<'a> = dyn FnMut(Option<&str>) -> Result<Option<String>> + Send + 'a;

/// Key-value store with per-key expiry and atomic read-modify-write.
///
/// Expired records behave exactly like missing ones for every operation.
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Read a live record
    async fn get(&self, key: &str) -> Result<Option<Transient>>;

    /// Unconditional write with expiry `now + ttl_ms`
    async fn set(&self, key: &str, value: &str, ttl_ms: i64) -> Result<()>;

    /// Read, rewrite and store one record as a single atomic step.
    ///
    /// `rewrite` runs exactly once while no other writer can touch the
    /// store. A written record expires at `now + ttl_ms`. Errors from
    /// `rewrite` abort the update without writing.
    ///
    /// # Returns
    /// True if a new value was written
    async fn update(&self, key: &str, ttl_ms: i64, rewrite: &mut Rewrite<'_>) -> Result<bool>;

    /// Remove a record. Returns true if a live record was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Physically drop expired records
    ///
    /// # Returns
    /// Number of records removed
    async fn purge_expired(&self) -> Result<u64>;
}
