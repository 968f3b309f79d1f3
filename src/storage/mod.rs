//! Persistence backends for the account store.
//!
//! The store only talks to [`AccountBackend`]; which implementation sits behind
//! it is decided by `[storage] backend` in the config.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::db::Store;
use crate::models::{Account, Profile};

pub mod json_lines;
pub mod memory;
pub mod relational;

pub use json_lines::JsonLinesBackend;
pub use memory::MemoryBackend;
pub use relational::SeaOrmBackend;

/// An account together with its profile, if one was ever saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub account: Account,
    pub profile: Option<Profile>,
}

/// Storage capability required by the account store.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Read every account. Unreadable individual records are skipped with a warning.
    async fn load_all(&self) -> Result<Vec<StoredAccount>>;

    /// Create an account. Returns `false` without writing when the username is
    /// already stored, including records `load_all` skipped as unreadable.
    async fn insert_account(&self, account: &Account) -> Result<bool>;

    /// Insert or fully overwrite the account with the same username.
    async fn upsert_account(&self, account: &Account) -> Result<()>;

    /// Insert or fully overwrite the profile of an existing account.
    async fn upsert_profile(&self, username: &str, profile: &Profile) -> Result<()>;
}

/// Builds the backend selected in the configuration.
pub async fn open_backend(config: &StorageConfig) -> Result<Arc<dyn AccountBackend>> {
    let backend: Arc<dyn AccountBackend> = match config.backend {
        StorageBackend::Sqlite => {
            let store = Store::with_pool_options(
                &config.database_path,
                config.max_db_connections,
                config.min_db_connections,
            )
            .await?;
            Arc::new(SeaOrmBackend::new(store))
        }
        StorageBackend::JsonLines => Arc::new(JsonLinesBackend::new(&config.accounts_file)),
    };

    info!(backend = backend.name(), "Account storage ready");
    Ok(backend)
}
