use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{accounts, forms};
use crate::services::validation::{is_valid_email, meets_password_policy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub storage: StorageConfig,

    pub security: SecurityConfig,

    pub forms: FormsConfig,

    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Sqlite,
    JsonLines,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// `SeaORM` connection URL, used by the sqlite backend
    pub database_path: String,

    /// Path of the newline-delimited JSON file, used by the json_lines backend
    pub accounts_file: String,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_path: "sqlite:data/usuarios.db".to_string(),
            accounts_file: "data/usuarios.jsonl".to_string(),
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Minimum password length in characters (default: 6)
    pub min_password_length: usize,

    /// Credentials of the `admin` account created on first run.
    pub bootstrap: BootstrapConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            min_password_length: accounts::MIN_PASSWORD_LENGTH,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub password: String,

    pub email: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            password: accounts::BOOTSTRAP_PASSWORD.to_string(),
            email: accounts::BOOTSTRAP_EMAIL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub submissions_file: String,

    pub min_name_length: usize,

    pub min_age: u32,

    pub max_age: u32,

    /// Interest tags offered by front ends
    pub interests: Vec<String>,

    pub genders: Vec<String>,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submissions_file: "data/datos_usuarios.jsonl".to_string(),
            min_name_length: forms::MIN_NAME_LENGTH,
            min_age: forms::MIN_AGE,
            max_age: forms::MAX_AGE,
            interests: forms::INTERESTS.iter().map(ToString::to_string).collect(),
            genders: forms::GENDERS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Presentation settings handed to the command handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// chrono format string, rendered in local time
    pub timestamp_format: String,

    /// Shown in place of a missing last-login time
    pub never_label: String,

    pub use_emoji: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            never_label: "Never".to_string(),
            use_emoji: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rollcall").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".rollcall").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::Sqlite if self.storage.database_path.is_empty() => {
                anyhow::bail!("storage.database_path cannot be empty for the sqlite backend");
            }
            StorageBackend::JsonLines if self.storage.accounts_file.is_empty() => {
                anyhow::bail!("storage.accounts_file cannot be empty for the json_lines backend");
            }
            _ => {}
        }

        if self.storage.min_db_connections > self.storage.max_db_connections {
            anyhow::bail!("storage.min_db_connections must not exceed max_db_connections");
        }

        let bootstrap = &self.security.bootstrap;
        if !meets_password_policy(&bootstrap.password, self.security.min_password_length) {
            anyhow::bail!(
                "security.bootstrap.password must be at least {} characters",
                self.security.min_password_length
            );
        }

        if !is_valid_email(&bootstrap.email) {
            anyhow::bail!("security.bootstrap.email is not a valid email address");
        }

        if self.forms.min_age > self.forms.max_age {
            anyhow::bail!("forms.min_age must not exceed forms.max_age");
        }

        if self.forms.submissions_file.is_empty() {
            anyhow::bail!("forms.submissions_file cannot be empty");
        }

        Ok(())
    }
}
