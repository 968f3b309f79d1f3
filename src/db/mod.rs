use crate::models::{Account, Profile};
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{perfiles, usuarios};

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn profile_repo(&self) -> repositories::profile::ProfileRepository {
        repositories::profile::ProfileRepository::new(self.conn.clone())
    }

    pub async fn list_account_rows(&self) -> Result<Vec<usuarios::Model>> {
        self.account_repo().list_all().await
    }

    pub async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get(username).await
    }

    pub async fn insert_account(&self, account: &Account) -> Result<bool> {
        self.account_repo().insert(account).await
    }

    pub async fn upsert_account(&self, account: &Account) -> Result<()> {
        self.account_repo().upsert(account).await
    }

    pub async fn list_profile_rows(&self) -> Result<Vec<perfiles::Model>> {
        self.profile_repo().list_all().await
    }

    pub async fn get_profile(&self, username: &str) -> Result<Option<Profile>> {
        self.profile_repo().get(username).await
    }

    pub async fn upsert_profile(&self, username: &str, profile: &Profile) -> Result<()> {
        self.profile_repo().upsert(username, profile).await
    }
}
