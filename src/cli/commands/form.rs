//! Registration-form command handlers

use super::marker;
use crate::config::Config;
use crate::models::SubmissionForm;
use crate::services::{SubmissionError, SubmissionLog};

pub async fn cmd_form_submit(config: &Config, form: SubmissionForm) -> anyhow::Result<()> {
    let log = SubmissionLog::new(config.forms.clone());

    let submission = match log.submit(form).await {
        Ok(s) => s,
        Err(SubmissionError::Invalid(errors)) => {
            println!("Validation errors:");
            for e in &errors {
                println!("  {} {e}", marker(&config.display, "•", "-"));
            }
            anyhow::bail!("Submission rejected ({} errors)", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    let none = "Not specified";
    println!(
        "{} Saved to {}",
        marker(&config.display, "✓", "OK"),
        log.path().display()
    );
    println!("{:-<50}", "");
    println!("Name:      {}", submission.name);
    println!("Email:     {}", submission.email);
    println!(
        "Age:       {}",
        if submission.age.is_empty() { none } else { submission.age.as_str() }
    );
    println!(
        "Gender:    {}",
        if submission.gender.is_empty() { none } else { submission.gender.as_str() }
    );
    println!(
        "Interests: {}",
        if submission.interests.is_empty() {
            "None".to_string()
        } else {
            submission.interests.join(", ")
        }
    );
    println!("Date:      {}", submission.registered_at);

    Ok(())
}

pub async fn cmd_form_list(config: &Config) -> anyhow::Result<()> {
    let log = SubmissionLog::new(config.forms.clone());
    let submissions = log.load().await;

    if submissions.is_empty() {
        println!("No submissions stored in {}.", log.path().display());
        return Ok(());
    }

    println!("Submissions ({} total)", submissions.len());
    println!("{:-<70}", "");

    for s in submissions {
        println!(
            "{} {} <{}> [{}]",
            marker(&config.display, "•", "-"),
            s.name,
            s.email,
            s.registered_at
        );
        let age = if s.age.is_empty() { "?" } else { s.age.as_str() };
        println!(
            "  Age: {} | Gender: {} | Interests: {}",
            age,
            s.gender,
            s.interests.join(", ")
        );
    }

    Ok(())
}
