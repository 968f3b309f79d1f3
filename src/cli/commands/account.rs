//! Account command handlers

use super::{format_last_login, format_timestamp, marker, open_store};
use crate::config::Config;

pub async fn cmd_register(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    store.register(username, password, email).await?;

    println!(
        "{} Account '{}' registered",
        marker(&config.display, "✅", "OK"),
        username
    );
    Ok(())
}

pub async fn cmd_login(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    let account = store.authenticate(username, password).await?;
    let display = &config.display;

    println!("Welcome, {}!", account.username);
    println!("{:-<50}", "");
    println!("{} Email:      {}", marker(display, "📧", "-"), account.email);
    println!("{} Role:       {}", marker(display, "👑", "-"), account.role);
    println!(
        "{} Registered: {}",
        marker(display, "📅", "-"),
        format_timestamp(display, &account.created_at)
    );
    println!(
        "{} Last login: {}",
        marker(display, "🕒", "-"),
        format_last_login(display, account.last_login.as_ref())
    );

    Ok(())
}

pub async fn cmd_passwd(
    config: &Config,
    username: &str,
    current_password: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    store.authenticate(username, current_password).await?;
    store.change_password(current_password, new_password).await?;
    store.logout();

    println!(
        "{} Password changed for '{}'",
        marker(&config.display, "✅", "OK"),
        username
    );
    Ok(())
}
