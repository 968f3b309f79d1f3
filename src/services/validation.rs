use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Name is required")]
    NameRequired,

    #[error("Name must be at least {0} characters")]
    NameTooShort(usize),

    #[error("Email is required")]
    EmailRequired,

    #[error("Email format is not valid")]
    InvalidEmail,

    #[error("Age must be a whole number between {min} and {max}")]
    InvalidAge { min: u32, max: u32 },

    #[error("Gender '{0}' is not one of the offered options")]
    UnknownGender(String),

    #[error("Interest '{0}' is not one of the offered options")]
    UnknownInterest(String),
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid regex")
    })
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Length is counted in characters, not bytes.
#[must_use]
pub fn meets_password_policy(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}

pub fn validate_name(name: &str, min_length: usize) -> Result<&str, FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FieldError::NameRequired);
    }
    if trimmed.chars().count() < min_length {
        return Err(FieldError::NameTooShort(min_length));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, FieldError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmailRequired);
    }
    if !is_valid_email(trimmed) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(trimmed)
}

/// Blank ages are allowed and yield `None`.
pub fn validate_age(age: &str, min: u32, max: u32) -> Result<Option<u32>, FieldError> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<u32>() {
        Ok(value) if (min..=max).contains(&value) => Ok(Some(value)),
        _ => Err(FieldError::InvalidAge { min, max }),
    }
}

/// A blank gender means none was selected.
pub fn validate_gender(gender: &str, options: &[String]) -> Result<(), FieldError> {
    let trimmed = gender.trim();
    if trimmed.is_empty() || options.iter().any(|o| o == trimmed) {
        Ok(())
    } else {
        Err(FieldError::UnknownGender(trimmed.to_string()))
    }
}

/// Every unknown interest is reported, in input order.
pub fn validate_interests(interests: &[String], options: &[String]) -> Vec<FieldError> {
    interests
        .iter()
        .filter(|i| !options.contains(i))
        .map(|i| FieldError::UnknownInterest(i.clone()))
        .collect()
}
