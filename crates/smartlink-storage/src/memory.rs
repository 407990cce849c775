use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use smartlink_core::repository::{LinkRecord, Repository, Result};
use smartlink_core::{ShortCode, StorageError};
use tracing::trace;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Every operation on a single record runs under
/// its shard lock, so inserts, increments and deletes of the same code
/// serialize and readers only ever see whole records.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, LinkRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored records, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        match self.storage.entry(record.id.clone()) {
            Entry::Occupied(occupied) => Err(StorageError::Conflict(occupied.key().to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64> {
        let Some(mut entry) = self.storage.get_mut(code) else {
            return Err(StorageError::NotFound(code.to_string()));
        };
        entry.clicks += 1;
        Ok(entry.clicks)
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.remove(code).is_some())
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64> {
        let mut removed = 0u64;
        self.storage.retain(|code, record| {
            if record.is_expired_at(now) {
                trace!(code = %code, "evicting expired record");
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }
}
