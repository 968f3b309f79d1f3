//! `SeaORM` (SQLite) backend over the `usuarios` and `perfiles` tables.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

use super::{AccountBackend, StoredAccount};
use crate::db::Store;
use crate::models::{Account, Profile};

pub struct SeaOrmBackend {
    store: Store,
}

impl SeaOrmBackend {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

#[async_trait]
impl AccountBackend for SeaOrmBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn load_all(&self) -> Result<Vec<StoredAccount>> {
        let mut profiles: HashMap<String, Profile> = HashMap::new();
        for row in self.store.list_profile_rows().await? {
            let username = row.username.clone();
            match Profile::try_from(row) {
                Ok(profile) => {
                    profiles.insert(username, profile);
                }
                Err(e) => warn!(username = %username, error = %e, "Skipping unreadable profile row"),
            }
        }

        let mut accounts = Vec::new();
        for row in self.store.list_account_rows().await? {
            let username = row.username.clone();
            match Account::try_from(row) {
                Ok(account) => accounts.push(StoredAccount {
                    profile: profiles.remove(&account.username),
                    account,
                }),
                Err(e) => warn!(username = %username, error = %e, "Skipping unreadable account row"),
            }
        }

        Ok(accounts)
    }

    async fn insert_account(&self, account: &Account) -> Result<bool> {
        self.store.insert_account(account).await
    }

    async fn upsert_account(&self, account: &Account) -> Result<()> {
        self.store.upsert_account(account).await
    }

    async fn upsert_profile(&self, username: &str, profile: &Profile) -> Result<()> {
        self.store.upsert_profile(username, profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    async fn backend() -> SeaOrmBackend {
        let store = Store::new("sqlite::memory:").await.unwrap();
        SeaOrmBackend::new(store)
    }

    fn account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            password_hash: crate::services::password::hash_password("password1"),
            email: format!("{username}@example.com"),
            role: Role::User,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_load() {
        let backend = backend().await;
        let mut ana = account("ana");
        backend.upsert_account(&ana).await.unwrap();
        backend.upsert_account(&account("bob")).await.unwrap();

        ana.last_login = Some(Utc::now());
        backend.upsert_account(&ana).await.unwrap();

        let loaded = backend.load_all().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].account, ana);
        assert!(loaded[0].profile.is_none());

        let bob = backend.store().get_account("bob").await.unwrap();
        assert_eq!(bob.map(|a| a.email).as_deref(), Some("bob@example.com"));
        assert!(backend.store().get_account("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_refuses_existing_username() {
        let backend = backend().await;
        assert!(backend.insert_account(&account("ana")).await.unwrap());

        let mut other = account("ana");
        other.email = "other@example.com".to_string();
        assert!(!backend.insert_account(&other).await.unwrap());

        let stored = backend.store().get_account("ana").await.unwrap().unwrap();
        assert_eq!(stored.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_insert_refuses_unreadable_row() {
        use crate::entities::{prelude::Usuarios, usuarios};
        use sea_orm::{EntityTrait, Set};

        let backend = backend().await;
        let row = usuarios::ActiveModel {
            username: Set("admin".to_string()),
            password_hash: Set("keep-me".to_string()),
            email: Set("root@example.com".to_string()),
            role: Set("Admin".to_string()),
            created_at: Set("2024-01-01T00:00:00+00:00".to_string()),
            last_login: Set(None),
        };
        Usuarios::insert(row)
            .exec_without_returning(&backend.store().conn)
            .await
            .unwrap();

        assert!(backend.load_all().await.unwrap().is_empty());
        assert!(!backend.insert_account(&account("admin")).await.unwrap());

        let rows = backend.store().list_account_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].password_hash, "keep-me");
        assert_eq!(rows[0].role, "Admin");
    }

    #[tokio::test]
    async fn test_profile_insert_then_replace() {
        let backend = backend().await;
        backend.upsert_account(&account("ana")).await.unwrap();

        let first = Profile {
            full_name: Some("Ana Pérez".to_string()),
            city: Some("Lima".to_string()),
            ..Profile::with_interests(["music", "art"])
        };
        backend.upsert_profile("ana", &first).await.unwrap();

        let second = Profile::with_interests(["travel"]);
        backend.upsert_profile("ana", &second).await.unwrap();

        let stored = backend.store().get_profile("ana").await.unwrap();
        assert_eq!(stored, Some(second));
    }

    #[tokio::test]
    async fn test_blank_profile_updates_instead_of_reinserting() {
        let backend = backend().await;
        backend.upsert_account(&account("ana")).await.unwrap();

        backend.upsert_profile("ana", &Profile::default()).await.unwrap();
        backend
            .upsert_profile("ana", &Profile::default())
            .await
            .unwrap();

        let loaded = backend.load_all().await.unwrap();
        assert_eq!(loaded[0].profile, Some(Profile::default()));
    }
}
