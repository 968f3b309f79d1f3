use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Free-form personal details attached to an account.
///
/// Saving a profile replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: Option<String>,
    pub age: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl Profile {
    #[must_use]
    pub fn with_interests<I, S>(interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        [&self.full_name, &self.age, &self.city]
            .iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
            && self.interests.is_empty()
    }
}
