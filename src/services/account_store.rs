//! The account store: registration, login, password changes and profiles.

use chrono::{Local, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::SecurityConfig;
use crate::constants::accounts::BOOTSTRAP_USERNAME;
use crate::models::{Account, AccountStats, AccountView, Profile, Role};
use crate::services::account_service::{
    AuthError, PasswordChangeError, ProfileError, RegistrationError,
};
use crate::services::password::{hash_password, verify_password};
use crate::services::validation::{is_valid_email, meets_password_policy};
use crate::storage::AccountBackend;

/// Owns the registered accounts and the single active session.
///
/// State is held in memory and written through to the backend inside the call
/// that changes it. Memory is only updated once the backend accepted the write.
pub struct AccountStore {
    backend: Arc<dyn AccountBackend>,
    security: SecurityConfig,
    accounts: BTreeMap<String, Account>,
    profiles: HashMap<String, Profile>,
    session: Option<String>,
}

impl AccountStore {
    /// Load every account from `backend` and make sure the bootstrap admin exists.
    ///
    /// Load failures are logged and the store starts with whatever was read.
    pub async fn open(backend: Arc<dyn AccountBackend>, security: SecurityConfig) -> Self {
        let mut store = Self {
            backend,
            security,
            accounts: BTreeMap::new(),
            profiles: HashMap::new(),
            session: None,
        };

        match store.backend.load_all().await {
            Ok(records) => {
                for record in records {
                    let username = record.account.username.clone();
                    if let Some(profile) = record.profile {
                        store.profiles.insert(username.clone(), profile);
                    }
                    store.accounts.insert(username, record.account);
                }
            }
            Err(e) => error!(
                backend = store.backend.name(),
                error = %format!("{e:#}"),
                "Failed to load accounts, continuing with an empty set"
            ),
        }

        store.ensure_bootstrap_admin().await;

        info!(
            backend = store.backend.name(),
            accounts = store.accounts.len(),
            "Account store opened"
        );
        store
    }

    async fn ensure_bootstrap_admin(&mut self) {
        if self.accounts.contains_key(BOOTSTRAP_USERNAME) {
            return;
        }

        let admin = Account {
            username: BOOTSTRAP_USERNAME.to_string(),
            password_hash: hash_password(&self.security.bootstrap.password),
            email: self.security.bootstrap.email.clone(),
            role: Role::Admin,
            created_at: Utc::now(),
            last_login: None,
        };

        match self.backend.insert_account(&admin).await {
            Ok(true) => info!(username = BOOTSTRAP_USERNAME, "Created bootstrap admin account"),
            Ok(false) => {
                warn!(
                    username = BOOTSTRAP_USERNAME,
                    "Admin account is stored but could not be loaded, leaving it untouched"
                );
                return;
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to persist bootstrap admin account");
            }
        }
        self.accounts.insert(admin.username.clone(), admin);
    }

    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), RegistrationError> {
        if self.accounts.contains_key(username) {
            return Err(RegistrationError::DuplicateUsername);
        }

        let min = self.security.min_password_length;
        if !meets_password_policy(password, min) {
            return Err(RegistrationError::WeakPassword(min));
        }

        if !is_valid_email(email) {
            return Err(RegistrationError::InvalidEmail);
        }

        let account = Account {
            username: username.to_string(),
            password_hash: hash_password(password),
            email: email.to_string(),
            role: Role::User,
            created_at: Utc::now(),
            last_login: None,
        };

        if !self.backend.insert_account(&account).await? {
            warn!(username, "Username is stored but could not be loaded, refusing to overwrite");
            return Err(RegistrationError::DuplicateUsername);
        }
        self.accounts.insert(account.username.clone(), account);

        info!(username, "Account registered");
        Ok(())
    }

    /// Check credentials and, on success, make the account the current session.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AccountView, AuthError> {
        let account = self.accounts.get(username).ok_or_else(|| {
            warn!(username, "Login attempt for unknown user");
            AuthError::UnknownUser
        })?;

        if !verify_password(password, &account.password_hash) {
            warn!(username, "Login attempt with wrong password");
            return Err(AuthError::WrongPassword);
        }

        let mut updated = account.clone();
        updated.last_login = Some(Utc::now());
        self.backend.upsert_account(&updated).await?;

        let view = updated.view();
        self.accounts.insert(updated.username.clone(), updated);
        self.session = Some(username.to_string());

        info!(username, "Account authenticated");
        Ok(view)
    }

    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), PasswordChangeError> {
        let account = self
            .session_account()
            .ok_or(PasswordChangeError::NotAuthenticated)?;

        if !verify_password(current_password, &account.password_hash) {
            return Err(PasswordChangeError::WrongPassword);
        }

        let min = self.security.min_password_length;
        if !meets_password_policy(new_password, min) {
            return Err(PasswordChangeError::WeakPassword(min));
        }

        let mut updated = account.clone();
        updated.password_hash = hash_password(new_password);
        self.backend.upsert_account(&updated).await?;

        info!(username = %updated.username, "Password changed");
        self.accounts.insert(updated.username.clone(), updated);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.session.take() {
            info!(username = %username, "Logged out");
        }
    }

    #[must_use]
    pub fn current_account(&self) -> Option<AccountView> {
        self.session_account().map(Account::view)
    }

    /// Every account, ordered by username, for admin sessions; empty for anyone else.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<AccountView> {
        if !self.session_is_admin() {
            return Vec::new();
        }
        self.accounts.values().map(Account::view).collect()
    }

    /// Account counts for admin sessions; `None` for anyone else.
    #[must_use]
    pub fn statistics(&self) -> Option<AccountStats> {
        if !self.session_is_admin() {
            return None;
        }

        let today = Local::now().date_naive();
        let mut stats = AccountStats::default();
        for account in self.accounts.values() {
            stats.total += 1;
            match account.role {
                Role::Admin => stats.admins += 1,
                Role::User => stats.users += 1,
            }
            if account.created_at.with_timezone(&Local).date_naive() == today {
                stats.registered_today += 1;
            }
            if account.last_login.is_some() {
                stats.ever_logged_in += 1;
            }
        }
        Some(stats)
    }

    /// Replace the whole profile of `username`.
    pub async fn save_profile(
        &mut self,
        username: &str,
        profile: Profile,
    ) -> Result<(), ProfileError> {
        if !self.accounts.contains_key(username) {
            return Err(ProfileError::UnknownUser);
        }

        self.backend.upsert_profile(username, &profile).await?;
        self.profiles.insert(username.to_string(), profile);

        info!(username, "Profile saved");
        Ok(())
    }

    /// The saved profile, or an all-empty one if none was ever saved.
    #[must_use]
    pub fn load_profile(&self, username: &str) -> Profile {
        self.profiles.get(username).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn session_account(&self) -> Option<&Account> {
        self.session
            .as_deref()
            .and_then(|username| self.accounts.get(username))
    }

    fn session_is_admin(&self) -> bool {
        self.session_account().is_some_and(Account::is_admin)
    }
}
