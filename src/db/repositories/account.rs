use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{prelude::*, usuarios};
use crate::models::{Account, timestamp};

impl TryFrom<usuarios::Model> for Account {
    type Error = anyhow::Error;

    fn try_from(model: usuarios::Model) -> Result<Self> {
        Ok(Self {
            role: model
                .role
                .parse()
                .with_context(|| format!("Bad role for account {}", model.username))?,
            created_at: timestamp::decode(&model.created_at)?,
            last_login: timestamp::decode_optional(model.last_login.as_deref())?,
            username: model.username,
            password_hash: model.password_hash,
            email: model.email,
        })
    }
}

fn to_active_model(account: &Account) -> usuarios::ActiveModel {
    usuarios::ActiveModel {
        username: Set(account.username.clone()),
        password_hash: Set(account.password_hash.clone()),
        email: Set(account.email.clone()),
        role: Set(account.role.as_str().to_string()),
        created_at: Set(timestamp::encode(&account.created_at)),
        last_login: Set(account.last_login.as_ref().map(timestamp::encode)),
    }
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns raw rows; decoding is left to the caller so one bad row does not hide the rest.
    pub async fn list_all(&self) -> Result<Vec<usuarios::Model>> {
        Usuarios::find()
            .order_by_asc(usuarios::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")
    }

    pub async fn get(&self, username: &str) -> Result<Option<Account>> {
        let row = Usuarios::find_by_id(username.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        row.map(Account::try_from).transpose()
    }

    /// Insert a new account. Returns `false` and writes nothing when a row with the
    /// same username exists, even one that no longer decodes.
    pub async fn insert(&self, account: &Account) -> Result<bool> {
        let existing = Usuarios::find_by_id(account.username.clone())
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;
        if existing.is_some() {
            return Ok(false);
        }

        Usuarios::insert(to_active_model(account))
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to create account {}", account.username))?;

        Ok(true)
    }

    /// Insert the account, or overwrite every mutable column if the username exists.
    pub async fn upsert(&self, account: &Account) -> Result<()> {
        Usuarios::insert(to_active_model(account))
            .on_conflict(
                OnConflict::column(usuarios::Column::Username)
                    .update_columns([
                        usuarios::Column::PasswordHash,
                        usuarios::Column::Email,
                        usuarios::Column::Role,
                        usuarios::Column::LastLogin,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to save account {}", account.username))?;

        Ok(())
    }
}
