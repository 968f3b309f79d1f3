mod account;
mod admin;
mod form;
mod profile;

pub use account::{cmd_login, cmd_passwd, cmd_register};
pub use admin::{cmd_stats, cmd_users};
pub use form::{cmd_form_list, cmd_form_submit};
pub use profile::{cmd_profile_set, cmd_profile_show};

use chrono::{DateTime, Local, Utc};

use crate::config::{Config, DisplayConfig};
use crate::services::AccountStore;
use crate::storage::open_backend;

/// Write `config.toml` with defaults unless one already exists.
pub fn cmd_init(config: &Config) -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!(
            "{} Created config.toml with default settings",
            marker(&config.display, "✓", "OK")
        );
    } else {
        println!("config.toml already exists");
    }
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<AccountStore> {
    let backend = open_backend(&config.storage).await?;
    Ok(AccountStore::open(backend, config.security.clone()).await)
}

fn format_timestamp(display: &DisplayConfig, ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format(&display.timestamp_format)
        .to_string()
}

fn format_last_login(display: &DisplayConfig, ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(
        || display.never_label.clone(),
        |ts| format_timestamp(display, ts),
    )
}

fn marker<'a>(display: &DisplayConfig, emoji: &'a str, plain: &'a str) -> &'a str {
    if display.use_emoji { emoji } else { plain }
}
