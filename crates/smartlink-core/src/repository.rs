use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short code, unique among live records.
    pub id: ShortCode,
    /// The destination URL.
    pub original: String,
    /// Number of successful redirects served for this record.
    pub clicks: u64,
    /// When the record expires, if ever.
    pub expires_at: Option<Timestamp>,
    /// When the record was inserted.
    pub created_at: Timestamp,
}

impl LinkRecord {
    /// Creates a fresh record with a zero click count.
    pub fn new(
        id: ShortCode,
        original: impl Into<String>,
        expires_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            original: original.into(),
            clicks: 0,
            expires_at,
            created_at,
        }
    }

    /// Returns true once `now` is strictly past the expiry timestamp.
    /// Permanent records never expire.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// Storage for link records.
///
/// Every mutation of a [`LinkRecord`] goes through this trait. Implementations
/// must make each operation atomic with respect to concurrent callers.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts a new record. Returns `Err(Conflict)` if the code is already present.
    ///
    /// The duplicate check and the insertion happen as a single operation.
    async fn insert(&self, record: LinkRecord) -> Result<()>;

    /// Retrieves the record for a given short code without side effects.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Atomically increments the click counter and returns the new value.
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64>;

    /// Deletes the record for a given short code.
    /// Returns `true` if the record existed and was removed; deleting an absent
    /// code is not an error.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Deletes every record whose expiry is strictly before `now` and returns
    /// how many were removed. Permanent records are never touched.
    async fn delete_expired(&self, now: Timestamp) -> Result<u64>;
}
