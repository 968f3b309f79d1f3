use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::collections::BTreeSet;

use crate::entities::{perfiles, prelude::*};
use crate::models::Profile;

impl TryFrom<perfiles::Model> for Profile {
    type Error = anyhow::Error;

    fn try_from(model: perfiles::Model) -> Result<Self> {
        let interests: BTreeSet<String> = match model.intereses.as_deref() {
            None | Some("") => BTreeSet::new(),
            Some(raw) => serde_json::from_str(raw)
                .with_context(|| format!("Bad interests for profile {}", model.username))?,
        };

        Ok(Self {
            full_name: model.nombre_completo,
            age: model.edad,
            city: model.ciudad,
            interests,
        })
    }
}

pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<perfiles::Model>> {
        Perfiles::find()
            .all(&self.conn)
            .await
            .context("Failed to list profiles")
    }

    pub async fn get(&self, username: &str) -> Result<Option<Profile>> {
        let row = Perfiles::find_by_id(username.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query profile")?;

        row.map(Profile::try_from).transpose()
    }

    /// Replace the whole profile row, inserting it when none exists yet.
    pub async fn upsert(&self, username: &str, profile: &Profile) -> Result<()> {
        let intereses = serde_json::to_string(&profile.interests)?;

        let existing = Perfiles::find_by_id(username.to_string())
            .one(&self.conn)
            .await
            .context("Failed to check for an existing profile")?;

        let active = perfiles::ActiveModel {
            username: Set(username.to_string()),
            nombre_completo: Set(profile.full_name.clone()),
            edad: Set(profile.age.clone()),
            ciudad: Set(profile.city.clone()),
            intereses: Set(Some(intereses)),
        };

        if existing.is_some() {
            active.update(&self.conn).await
        } else {
            active.insert(&self.conn).await
        }
        .with_context(|| format!("Failed to save profile for {username}"))?;

        Ok(())
    }
}
