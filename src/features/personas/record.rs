use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One alternate identity a user can speak as.
///
/// Triggers are unique per owner by convention only; the matcher tolerates duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaRecord {
    /// Discord user id of the owner
    pub owner: u64,
    pub name: String,
    /// Prefix that routes a message to this persona, compared case-insensitively
    pub trigger: String,
    /// Image URL; `None` falls back to the owner's own avatar
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub universe: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl PersonaRecord {
    pub fn new(
        owner: u64,
        name: impl Into<String>,
        trigger: impl Into<String>,
        avatar: Option<&str>,
    ) -> Self {
        PersonaRecord {
            owner,
            name: name.into(),
            trigger: trigger.into(),
            avatar: avatar.map(str::to_string),
            universe: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.trigger.to_lowercase() == trigger.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_trigger_comparison_ignores_case() {
        let record = PersonaRecord::new(7, "Nyx", "Nx:", None);
        assert!(record.is_named("nyx"));
        assert!(record.is_named(" NYX "));
        assert!(!record.is_named("ny"));
        assert!(record.has_trigger("NX:"));
        assert!(!record.has_trigger("Nx"));
    }

    #[test]
    fn test_deserialize_fills_optional_fields() {
        let record: PersonaRecord =
            serde_json::from_str(r#"{"owner": 42, "name": "Idh", "trigger": "idh:"}"#).unwrap();
        assert_eq!(record.owner, 42);
        assert_eq!(record.avatar, None);
        assert_eq!(record.universe, None);
    }
}
