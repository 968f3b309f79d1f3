//! CLI module - Command-line interface for rollcall
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rollcall - account registry and registration-form log
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    Init,

    /// Register a new account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Check credentials and record the login
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Change an account's password
    Passwd {
        username: String,
        /// Current password
        #[arg(long)]
        password: String,
        #[arg(long)]
        new_password: String,
    },

    /// List all accounts (admin only)
    #[command(alias = "ls")]
    Users {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Show account statistics (admin only)
    Stats {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Show or replace the profile of the logged-in account
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Registration-form submissions
    Form {
        #[command(subcommand)]
        command: FormCommands,
    },
}

#[derive(Args)]
pub struct Credentials {
    #[arg(long, default_value = "admin")]
    pub username: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your saved profile
    Show {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Replace your profile (unset fields are cleared)
    Set {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Interest tag, repeatable
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum FormCommands {
    /// Validate and store a registration form
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        gender: String,
        /// Interest tag, repeatable
        #[arg(long = "interest")]
        interests: Vec<String>,
    },

    /// List stored submissions
    #[command(alias = "ls")]
    List,
}

pub use commands::*;
