//! In-memory implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use auth_core::{DomainError, RefreshTokenRecord, RefreshTokenRepository, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryRefreshTokenRepository {
    records: DashMap<String, RefreshTokenRecord>,
}

impl MemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateTokenId),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, id: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        // The shard lock makes remove() exactly-once per id.
        Ok(self.records.remove(id).is_some())
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let before = self.records.len();
        self.records.retain(|_, record| record.expires_at >= cutoff);
        Ok(before.saturating_sub(self.records.len()) as u64)
    }
}
