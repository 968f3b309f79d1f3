pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;

use clap::CommandFactory;
use cli::{Cli, Commands, FormCommands, ProfileCommands};
use models::{Profile, SubmissionForm};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so command output stays clean.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Init => cli::cmd_init(&config),

        Commands::Register {
            username,
            email,
            password,
        } => cli::cmd_register(&config, &username, &email, &password).await,

        Commands::Login { username, password } => {
            cli::cmd_login(&config, &username, &password).await
        }

        Commands::Passwd {
            username,
            password,
            new_password,
        } => cli::cmd_passwd(&config, &username, &password, &new_password).await,

        Commands::Users { auth } => cli::cmd_users(&config, &auth).await,

        Commands::Stats { auth } => cli::cmd_stats(&config, &auth).await,

        Commands::Profile { command } => match command {
            ProfileCommands::Show { auth } => cli::cmd_profile_show(&config, &auth).await,
            ProfileCommands::Set {
                auth,
                full_name,
                age,
                city,
                interests,
            } => {
                let profile = Profile {
                    full_name,
                    age,
                    city,
                    interests: interests.into_iter().collect(),
                };
                cli::cmd_profile_set(&config, &auth, profile).await
            }
        },

        Commands::Form { command } => match command {
            FormCommands::Submit {
                name,
                email,
                age,
                gender,
                interests,
            } => {
                let form = SubmissionForm {
                    name,
                    email,
                    age,
                    gender,
                    interests,
                };
                cli::cmd_form_submit(&config, form).await
            }
            FormCommands::List => cli::cmd_form_list(&config).await,
        },
    }
}
