//! Admin-only command handlers

use super::{format_last_login, format_timestamp, marker, open_store};
use crate::cli::Credentials;
use crate::config::Config;
use crate::models::Role;

pub async fn cmd_users(config: &Config, auth: &Credentials) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    store.authenticate(&auth.username, &auth.password).await?;
    let accounts = store.list_accounts();

    if accounts.is_empty() {
        println!("No accounts to show. Only admins can list accounts.");
        return Ok(());
    }

    let display = &config.display;
    println!("Accounts ({} total)", accounts.len());
    println!("{:-<70}", "");

    for account in accounts {
        let role_marker = if account.role == Role::Admin {
            marker(display, "👑", "*")
        } else {
            marker(display, "👤", "-")
        };
        println!("{} {} <{}>", role_marker, account.username, account.email);
        println!(
            "  Role: {} | Registered: {} | Last login: {}",
            account.role,
            format_timestamp(display, &account.created_at),
            format_last_login(display, account.last_login.as_ref())
        );
    }

    Ok(())
}

pub async fn cmd_stats(config: &Config, auth: &Credentials) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    store.authenticate(&auth.username, &auth.password).await?;

    let Some(stats) = store.statistics() else {
        anyhow::bail!("Only administrators can view statistics");
    };

    let display = &config.display;
    println!("{} Account statistics", marker(display, "📊", "#"));
    println!("{:-<50}", "");
    println!("Total accounts:      {}", stats.total);
    println!("Administrators:      {}", stats.admins);
    println!("Regular users:       {}", stats.users);
    println!("Registered today:    {}", stats.registered_today);
    println!("Have logged in:      {}", stats.ever_logged_in);

    if stats.total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let pct = |n: usize| n as f64 / stats.total as f64 * 100.0;
        println!();
        println!("Admins: {:.1}% | Users: {:.1}%", pct(stats.admins), pct(stats.users));
    }

    Ok(())
}
