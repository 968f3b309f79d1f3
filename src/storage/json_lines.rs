//! Flat-file backend: one JSON object per line, rewritten in full on every save.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{AccountBackend, StoredAccount};
use crate::models::{Account, Profile, Role, timestamp};

/// On-disk shape of one account line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountLine {
    username: String,
    password_hash: String,
    email: String,
    role: Role,
    created_at: String,
    #[serde(default)]
    last_login: Option<String>,
    #[serde(default)]
    profile_data: Option<ProfileData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ProfileData {
    nombre_completo: Option<String>,
    edad: Option<String>,
    ciudad: Option<String>,
    intereses: BTreeSet<String>,
}

impl From<&Profile> for ProfileData {
    fn from(profile: &Profile) -> Self {
        Self {
            nombre_completo: profile.full_name.clone(),
            edad: profile.age.clone(),
            ciudad: profile.city.clone(),
            intereses: profile.interests.clone(),
        }
    }
}

impl From<ProfileData> for Profile {
    fn from(data: ProfileData) -> Self {
        Self {
            full_name: data.nombre_completo,
            age: data.edad,
            city: data.ciudad,
            interests: data.intereses,
        }
    }
}

impl AccountLine {
    fn from_account(account: &Account, profile_data: Option<ProfileData>) -> Self {
        Self {
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            email: account.email.clone(),
            role: account.role,
            created_at: timestamp::encode(&account.created_at),
            last_login: account.last_login.as_ref().map(timestamp::encode),
            profile_data,
        }
    }

    fn into_stored(self) -> Result<StoredAccount> {
        Ok(StoredAccount {
            account: Account {
                created_at: timestamp::decode(&self.created_at)?,
                last_login: timestamp::decode_optional(self.last_login.as_deref())?,
                username: self.username,
                password_hash: self.password_hash,
                email: self.email,
                role: self.role,
            },
            profile: self.profile_data.map(Profile::from),
        })
    }
}

/// One line of the accounts file. Lines that do not decode are carried through
/// rewrites verbatim so a save never destroys data it could not read.
#[derive(Debug, Clone)]
enum FileLine {
    Account(AccountLine),
    Unreadable {
        text: String,
        username: Option<String>,
    },
}

impl FileLine {
    fn unreadable(text: String) -> Self {
        let username = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("username")?.as_str().map(str::to_string));
        Self::Unreadable { text, username }
    }

    fn username(&self) -> Option<&str> {
        match self {
            Self::Account(line) => Some(&line.username),
            Self::Unreadable { username, .. } => username.as_deref(),
        }
    }
}

fn find_account<'a>(lines: &'a mut [FileLine], username: &str) -> Option<&'a mut AccountLine> {
    lines.iter_mut().find_map(|line| match line {
        FileLine::Account(account) if account.username == username => Some(account),
        _ => None,
    })
}

/// Parses file contents, accepting either one object per line or a single JSON array.
fn parse_lines(content: &str) -> Vec<FileLine> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(values) => {
                return values
                    .into_iter()
                    .map(|value| match serde_json::from_value(value.clone()) {
                        Ok(line) => FileLine::Account(line),
                        Err(e) => {
                            warn!(error = %e, "Skipping malformed account record");
                            FileLine::unreadable(value.to_string())
                        }
                    })
                    .collect();
            }
            Err(e) => debug!(error = %e, "Accounts file is not a JSON array, reading line by line"),
        }
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(idx, raw)| match serde_json::from_str(raw.trim()) {
            Ok(line) => FileLine::Account(line),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Skipping malformed account line");
                FileLine::unreadable(raw.trim().to_string())
            }
        })
        .collect()
}

pub struct JsonLinesBackend {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl JsonLinesBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_lines(&self) -> Result<Vec<FileLine>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(parse_lines(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read accounts file: {}", self.path.display())),
        }
    }

    /// Replace the file atomically: write a sibling temp file, then rename over the original.
    async fn write_lines(&self, lines: &[FileLine]) -> Result<()> {
        let mut content = String::new();
        let mut kept = 0usize;
        for line in lines {
            match line {
                FileLine::Account(account) => content.push_str(&serde_json::to_string(account)?),
                FileLine::Unreadable { text, .. } => {
                    kept += 1;
                    content.push_str(text);
                }
            }
            content.push('\n');
        }
        if kept > 0 {
            warn!(
                path = %self.path.display(),
                lines = kept,
                "Rewriting accounts file with unreadable lines kept as-is"
            );
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl AccountBackend for JsonLinesBackend {
    fn name(&self) -> &'static str {
        "json_lines"
    }

    async fn load_all(&self) -> Result<Vec<StoredAccount>> {
        let lines = self.read_lines().await?;

        Ok(lines
            .into_iter()
            .filter_map(|line| match line {
                FileLine::Account(line) => Some(line),
                FileLine::Unreadable { .. } => None,
            })
            .filter_map(|line| {
                let username = line.username.clone();
                match line.into_stored() {
                    Ok(stored) => Some(stored),
                    Err(e) => {
                        warn!(username = %username, error = %e, "Skipping unreadable account record");
                        None
                    }
                }
            })
            .collect())
    }

    async fn insert_account(&self, account: &Account) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut lines = self.read_lines().await?;

        if lines
            .iter()
            .any(|line| line.username() == Some(account.username.as_str()))
        {
            return Ok(false);
        }

        lines.push(FileLine::Account(AccountLine::from_account(account, None)));
        self.write_lines(&lines).await?;
        Ok(true)
    }

    async fn upsert_account(&self, account: &Account) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut lines = self.read_lines().await?;

        match find_account(&mut lines, &account.username) {
            Some(existing) => {
                let profile_data = existing.profile_data.take();
                *existing = AccountLine::from_account(account, profile_data);
            }
            None => lines.push(FileLine::Account(AccountLine::from_account(account, None))),
        }

        self.write_lines(&lines).await
    }

    async fn upsert_profile(&self, username: &str, profile: &Profile) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut lines = self.read_lines().await?;

        let line = find_account(&mut lines, username)
            .ok_or_else(|| anyhow::anyhow!("Account not found: {username}"))?;
        line.profile_data = Some(ProfileData::from(profile));

        self.write_lines(&lines).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rollcall-{name}-{}.jsonl", uuid::Uuid::new_v4()))
    }

    fn account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            password_hash: crate::services::password::hash_password("password1"),
            email: format!("{username}@example.com"),
            role: Role::User,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let backend = JsonLinesBackend::new(temp_path("missing"));
        assert!(backend.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_object_per_line() {
        let path = temp_path("lines");
        let backend = JsonLinesBackend::new(&path);
        backend.upsert_account(&account("ana")).await.unwrap();
        backend.upsert_account(&account("bob")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        for key in [
            "username",
            "password_hash",
            "email",
            "role",
            "created_at",
            "last_login",
            "profile_data",
        ] {
            assert!(first.get(key).is_some(), "missing key {key}");
        }
        assert!(first["last_login"].is_null());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_upsert_keeps_profile() {
        let path = temp_path("keep-profile");
        let backend = JsonLinesBackend::new(&path);
        let mut ana = account("ana");
        backend.upsert_account(&ana).await.unwrap();
        backend
            .upsert_profile("ana", &Profile::with_interests(["music"]))
            .await
            .unwrap();

        ana.last_login = Some(Utc::now());
        backend.upsert_account(&ana).await.unwrap();

        let loaded = backend.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].account, ana);
        assert_eq!(loaded[0].profile, Some(Profile::with_interests(["music"])));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let path = temp_path("malformed");
        let good = serde_json::to_string(&AccountLine::from_account(&account("ana"), None)).unwrap();
        std::fs::write(&path, format!("{{not json\n{good}\n\n{{\"username\":\"half\"}}\n")).unwrap();

        let backend = JsonLinesBackend::new(&path);
        let loaded = backend.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].account.username, "ana");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_legacy_array_file() {
        let path = temp_path("legacy");
        let legacy = r#"[
  {
    "username": "admin",
    "password_hash": "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9",
    "email": "admin@demo.com",
    "role": "admin",
    "created_at": "2024-03-01 09:15:00",
    "last_login": null,
    "profile_data": {}
  },
  {
    "username": "ana",
    "password_hash": "x",
    "email": "ana@example.com",
    "role": "user",
    "created_at": "2024-03-02 10:00:00",
    "last_login": "2024-03-03 11:00:00",
    "profile_data": {"nombre_completo": "Ana", "intereses": ["Música"]}
  }
]"#;
        std::fs::write(&path, legacy).unwrap();

        let backend = JsonLinesBackend::new(&path);
        let loaded = backend.load_all().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].account.role, Role::Admin);
        assert!(loaded[1].account.last_login.is_some());

        let profile = loaded[1].profile.clone().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Ana"));
        assert!(profile.interests.contains("Música"));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_insert_refuses_username_of_undecodable_record() {
        let path = temp_path("insert-existing");
        let stored = r#"{"username":"admin","password_hash":"keep-me","email":"root@example.com","role":"admin","created_at":"not-a-date"}"#;
        std::fs::write(&path, format!("{stored}\n")).unwrap();

        let backend = JsonLinesBackend::new(&path);
        assert!(backend.load_all().await.unwrap().is_empty());

        let mut admin = account("admin");
        admin.role = Role::Admin;
        assert!(!backend.insert_account(&admin).await.unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().contains("keep-me"));

        assert!(backend.insert_account(&account("ana")).await.unwrap());
        assert!(!backend.insert_account(&account("ana")).await.unwrap());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_rewrite_keeps_malformed_lines() {
        let path = temp_path("keep-malformed");
        std::fs::write(&path, "{not json\n{\"username\":\"half\"}\n").unwrap();

        let backend = JsonLinesBackend::new(&path);
        backend.upsert_account(&account("ana")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "{not json");
        assert_eq!(lines[1], r#"{"username":"half"}"#);

        // "half" is still reserved even though it never loads.
        assert!(!backend.insert_account(&account("half")).await.unwrap());
        assert_eq!(backend.load_all().await.unwrap().len(), 1);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_profile_for_unknown_account_fails() {
        let backend = JsonLinesBackend::new(temp_path("unknown"));
        let result = backend
            .upsert_profile("ghost", &Profile::default())
            .await;
        assert!(result.is_err());
    }
}
