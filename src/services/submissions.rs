//! Registration-form submissions kept in a newline-delimited JSON file.

use anyhow::{Context, Result};
use chrono::Local;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::FormsConfig;
use crate::constants::LEGACY_TIMESTAMP_FORMAT;
use crate::models::{Submission, SubmissionForm};
use crate::services::validation::{
    FieldError, validate_age, validate_email, validate_gender, validate_interests, validate_name,
};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Validation failed: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(String),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<anyhow::Error> for SubmissionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Check every field and report all problems at once.
pub fn validate_form(
    form: &SubmissionForm,
    rules: &FormsConfig,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_name(&form.name, rules.min_name_length) {
        errors.push(e);
    }
    if let Err(e) = validate_email(&form.email) {
        errors.push(e);
    }
    if let Err(e) = validate_age(&form.age, rules.min_age, rules.max_age) {
        errors.push(e);
    }
    if let Err(e) = validate_gender(&form.gender, &rules.genders) {
        errors.push(e);
    }
    errors.extend(validate_interests(&form.interests, &rules.interests));

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub struct SubmissionLog {
    path: PathBuf,
    rules: FormsConfig,
}

impl SubmissionLog {
    #[must_use]
    pub fn new(rules: FormsConfig) -> Self {
        Self {
            path: PathBuf::from(&rules.submissions_file),
            rules,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate the form, stamp it, and append it as one JSON line.
    pub async fn submit(&self, form: SubmissionForm) -> Result<Submission, SubmissionError> {
        validate_form(&form, &self.rules).map_err(SubmissionError::Invalid)?;

        let submission = Submission {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            age: form.age.trim().to_string(),
            gender: form.gender.trim().to_string(),
            interests: form.interests,
            registered_at: Local::now().format(LEGACY_TIMESTAMP_FORMAT).to_string(),
        };

        self.append(&submission).await?;
        info!(name = %submission.name, "Form submission saved");
        Ok(submission)
    }

    async fn append(&self, submission: &Submission) -> Result<()> {
        let mut line = serde_json::to_string(submission)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }

    /// Read back every well-formed submission. Never fails: problems are logged.
    pub async fn load(&self) -> Vec<Submission> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_submissions(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read submissions");
                Vec::new()
            }
        }
    }
}

/// Accepts a JSON array or one object per line; records missing required fields are dropped.
fn parse_submissions(content: &str) -> Vec<Submission> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
        return values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
    }

    let mut records = Vec::new();
    for (idx, raw) in trimmed.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match serde_json::from_str::<Submission>(raw) {
            Ok(record) => records.push(record),
            Err(e) => warn!(line = idx + 1, error = %e, "Skipping malformed submission"),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(file: &str) -> FormsConfig {
        FormsConfig {
            submissions_file: std::env::temp_dir()
                .join(format!("rollcall-{file}-{}.jsonl", uuid::Uuid::new_v4()))
                .display()
                .to_string(),
            ..FormsConfig::default()
        }
    }

    fn form() -> SubmissionForm {
        SubmissionForm {
            name: " Ana ".to_string(),
            email: "ana@example.com".to_string(),
            age: "30".to_string(),
            gender: "Femenino".to_string(),
            interests: vec!["Música".to_string()],
        }
    }

    #[test]
    fn test_validate_form_collects_all_errors() {
        let bad = SubmissionForm {
            name: "A".to_string(),
            email: String::new(),
            age: "200".to_string(),
            ..SubmissionForm::default()
        };
        let errors = validate_form(&bad, &FormsConfig::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::NameTooShort(2),
                FieldError::EmailRequired,
                FieldError::InvalidAge { min: 0, max: 120 },
            ]
        );
    }

    #[test]
    fn test_options_come_from_config() {
        let f = SubmissionForm {
            gender: "Robot".to_string(),
            interests: vec!["Música".to_string(), "Golf".to_string()],
            ..form()
        };
        let errors = validate_form(&f, &FormsConfig::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::UnknownGender("Robot".to_string()),
                FieldError::UnknownInterest("Golf".to_string()),
            ]
        );

        let rules = FormsConfig {
            genders: vec!["Robot".to_string()],
            interests: vec!["Música".to_string(), "Golf".to_string()],
            ..FormsConfig::default()
        };
        assert!(validate_form(&f, &rules).is_ok());
    }

    #[test]
    fn test_blank_age_is_allowed() {
        let f = SubmissionForm {
            age: "  ".to_string(),
            ..form()
        };
        assert!(validate_form(&f, &FormsConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_submit_and_load() {
        let log = SubmissionLog::new(rules("submit"));
        let saved = log.submit(form()).await.unwrap();
        assert_eq!(saved.name, "Ana");

        log.submit(SubmissionForm {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            ..SubmissionForm::default()
        })
        .await
        .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"nombre\":\"Ana\""));

        let loaded = log.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], saved);
        assert_eq!(loaded[1].age, "");

        std::fs::remove_file(log.path()).ok();
    }

    #[tokio::test]
    async fn test_invalid_submission_is_not_written() {
        let log = SubmissionLog::new(rules("invalid"));
        let result = log
            .submit(SubmissionForm {
                email: "nope".to_string(),
                ..form()
            })
            .await;
        assert!(matches!(result, Err(SubmissionError::Invalid(_))));
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let log = SubmissionLog::new(rules("missing"));
        assert!(log.load().await.is_empty());
    }

    #[test]
    fn test_parse_skips_incomplete_records() {
        let content = r#"{"nombre":"Ana","email":"a@b.co","edad":"","genero":"Otro","intereses":[],"fecha_registro":"2024-01-01 10:00:00"}
{"nombre":"NoInterests","email":"a@b.co","genero":"Otro","fecha_registro":"2024-01-01 10:00:00"}
{"nombre":"BadInterests","email":"a@b.co","genero":"Otro","intereses":"x","fecha_registro":"2024-01-01 10:00:00"}
garbage
"#;
        let records = parse_submissions(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ana");
    }

    #[test]
    fn test_parse_array_form() {
        let content = r#"[
            {"nombre":"Ana","email":"a@b.co","genero":"Otro","intereses":["Arte"],"fecha_registro":"2024-01-01 10:00:00"},
            {"nombre":"Missing"}
        ]"#;
        let records = parse_submissions(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].interests, vec!["Arte".to_string()]);
    }
}
