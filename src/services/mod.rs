pub mod account_service;
pub use account_service::{AuthError, PasswordChangeError, ProfileError, RegistrationError};

pub mod account_store;
pub use account_store::AccountStore;

pub mod password;
pub mod validation;

pub mod submissions;
pub use submissions::{SubmissionError, SubmissionLog};
