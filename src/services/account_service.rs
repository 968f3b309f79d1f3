//! Error types for account operations.
//!
//! Every failure is recoverable; the `Display` text is the message shown to the
//! person at the keyboard.

use thiserror::Error;

/// Errors from [`AccountStore::register`](super::AccountStore::register).
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("Email format is not valid")]
    InvalidEmail,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from [`AccountStore::authenticate`](super::AccountStore::authenticate).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UnknownUser,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from [`AccountStore::change_password`](super::AccountStore::change_password).
#[derive(Debug, Error)]
pub enum PasswordChangeError {
    #[error("No user is logged in")]
    NotAuthenticated,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("New password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from [`AccountStore::save_profile`](super::AccountStore::save_profile).
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User not found")]
    UnknownUser,

    #[error("Storage error: {0}")]
    Storage(String),
}

macro_rules! storage_from_anyhow {
    ($($ty:ty),+) => {
        $(
            impl From<anyhow::Error> for $ty {
                fn from(err: anyhow::Error) -> Self {
                    Self::Storage(format!("{err:#}"))
                }
            }
        )+
    };
}

storage_from_anyhow!(RegistrationError, AuthError, PasswordChangeError, ProfileError);
