use super::{marker, open_store};
use crate::cli::Credentials;
use crate::config::Config;
use crate::models::Profile;

pub async fn cmd_profile_show(config: &Config, auth: &Credentials) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    let account = store.authenticate(&auth.username, &auth.password).await?;
    let profile = store.load_profile(&account.username);
    let unset = "Not specified";

    println!("Profile: {}", account.username);
    println!("{:-<50}", "");

    if profile.is_blank() {
        println!("No profile data saved yet.");
        println!();
        println!(
            "Set one with: rollcall profile set --username {} --password ... --full-name \"...\"",
            account.username
        );
        return Ok(());
    }

    println!("Full name: {}", profile.full_name.as_deref().unwrap_or(unset));
    println!("Age:       {}", profile.age.as_deref().unwrap_or(unset));
    println!("City:      {}", profile.city.as_deref().unwrap_or(unset));

    let interests = if profile.interests.is_empty() {
        unset.to_string()
    } else {
        profile
            .interests
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Interests: {interests}");

    Ok(())
}

/// Replace the profile of the account the credentials log in as.
pub async fn cmd_profile_set(
    config: &Config,
    auth: &Credentials,
    profile: Profile,
) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    let account = store.authenticate(&auth.username, &auth.password).await?;
    store.save_profile(&account.username, profile).await?;

    println!(
        "{} Profile saved for '{}'",
        marker(&config.display, "✓", "OK"),
        account.username
    );
    Ok(())
}
