//! In-process backend, used by tests and throwaway sessions.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{AccountBackend, StoredAccount};
use crate::models::{Account, Profile};

#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<BTreeMap<String, StoredAccount>>,
    reject_writes: AtomicBool,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend as if the records had been persisted earlier.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = StoredAccount>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.account.username.clone(), r))
            .collect();

        Self {
            records: RwLock::new(records),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Make every following write fail, simulating an unavailable disk.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<StoredAccount> {
        self.records.read().await.values().cloned().collect()
    }

    fn check_writable(&self) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            anyhow::bail!("Backend is rejecting writes");
        }
        Ok(())
    }
}

#[async_trait]
impl AccountBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load_all(&self) -> Result<Vec<StoredAccount>> {
        Ok(self.snapshot().await)
    }

    async fn insert_account(&self, account: &Account) -> Result<bool> {
        self.check_writable()?;

        let mut records = self.records.write().await;
        if records.contains_key(&account.username) {
            return Ok(false);
        }
        records.insert(
            account.username.clone(),
            StoredAccount {
                account: account.clone(),
                profile: None,
            },
        );
        Ok(true)
    }

    async fn upsert_account(&self, account: &Account) -> Result<()> {
        self.check_writable()?;

        let mut records = self.records.write().await;
        records
            .entry(account.username.clone())
            .and_modify(|r| r.account = account.clone())
            .or_insert_with(|| StoredAccount {
                account: account.clone(),
                profile: None,
            });
        Ok(())
    }

    async fn upsert_profile(&self, username: &str, profile: &Profile) -> Result<()> {
        self.check_writable()?;

        let mut records = self.records.write().await;
        let record = records
            .get_mut(username)
            .ok_or_else(|| anyhow::anyhow!("Account not found: {username}"))?;
        record.profile = Some(profile.clone());
        Ok(())
    }
}
