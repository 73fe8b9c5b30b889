//! In-memory implementation of OtpRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use auth_core::{OtpRecord, OtpRepository, RepoResult};

/// Keyed by `(email, token_hash)`
#[derive(Debug, Default)]
pub struct MemoryOtpRepository {
    codes: DashMap<(String, String), OtpRecord>,
}

impl MemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending codes for an email
    pub fn count_for_email(&self, email: &str) -> usize {
        self.codes.iter().filter(|entry| entry.key().0 == email).count()
    }
}

#[async_trait]
impl OtpRepository for MemoryOtpRepository {
    async fn create(&self, record: &OtpRecord) -> RepoResult<()> {
        self.codes.insert(
            (record.email.clone(), record.token_hash.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn find(&self, email: &str, token_hash: &str) -> RepoResult<Option<OtpRecord>> {
        Ok(self
            .codes
            .get(&(email.to_string(), token_hash.to_string()))
            .map(|r| r.value().clone()))
    }

    async fn delete(&self, email: &str, token_hash: &str) -> RepoResult<bool> {
        Ok(self
            .codes
            .remove(&(email.to_string(), token_hash.to_string()))
            .is_some())
    }

    async fn delete_all_for_email(&self, email: &str) -> RepoResult<u64> {
        let mut removed = 0;
        self.codes.retain(|(owner, _), _| {
            let keep = owner != email;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let before = self.codes.len();
        self.codes.retain(|_, record| record.expires_at >= cutoff);
        Ok(before.saturating_sub(self.codes.len()) as u64)
    }
}
