//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use std::sync::Arc;

use crate::features::personas::{strip_trigger, PersonaRecord, PersonaStore};

/// Shared context for all command handlers
#[derive(Clone)]
pub struct CommandContext {
    pub store: Arc<dyn PersonaStore>,
    pub prefix: String,
}

impl CommandContext {
    pub fn new(store: Arc<dyn PersonaStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Look up one of `owner`'s personas by name (case-insensitive)
    pub async fn persona(&self, owner: u64, name: &str) -> Result<Option<PersonaRecord>> {
        Ok(self
            .store
            .get_personas(owner)
            .await?
            .into_iter()
            .find(|p| p.is_named(name)))
    }

    /// Usage line for a command, with the configured prefix
    pub fn usage(&self, syntax: &str) -> String {
        format!("Usage: `{}{syntax}`", self.prefix)
    }

    pub fn not_found(&self, name: &str) -> String {
        format!(
            "❌ You don't have a persona named **{name}**. Use `{}list` to see yours.",
            self.prefix
        )
    }

    /// Check a trigger is usable by `owner`, ignoring the persona called `except` (when editing one).
    ///
    /// Returns a user-facing reason when it is not.
    pub async fn trigger_problem(
        &self,
        owner: u64,
        trigger: &str,
        except: Option<&str>,
    ) -> Result<Option<String>> {
        if trigger.trim().is_empty() {
            return Ok(Some("❌ A trigger cannot be empty.".to_string()));
        }
        // Either way round, some of this owner's commands would be relayed instead of run
        if strip_trigger(&self.prefix, trigger).is_some()
            || strip_trigger(trigger, &self.prefix).is_some()
        {
            return Ok(Some(format!(
                "❌ Trigger `{trigger}` would capture every `{}` command.",
                self.prefix
            )));
        }
        let clash = self
            .store
            .get_personas(owner)
            .await?
            .into_iter()
            .filter(|p| except.map_or(true, |name| !p.is_named(name)))
            .find(|p| p.has_trigger(trigger));
        Ok(clash.map(|p| format!("❌ Trigger `{trigger}` is already used by **{}**.", p.name)))
    }
}

/// Accept only http(s) image links as avatars
pub fn is_avatar_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")) && !url.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::personas::FilePersonaStore;

    #[test]
    fn test_command_context_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }

    #[test]
    fn test_is_avatar_url() {
        assert!(is_avatar_url("https://cdn.example.com/a.png"));
        assert!(is_avatar_url("HTTP://example.com/a.png"));
        assert!(!is_avatar_url("ftp://example.com/a.png"));
        assert!(!is_avatar_url("https://example.com/a b.png"));
        assert!(!is_avatar_url("clear"));
    }

    #[tokio::test]
    async fn test_trigger_problem() {
        let store = Arc::new(FilePersonaStore::ephemeral());
        store
            .insert(PersonaRecord::new(1, "Nyx", "Nx:", None))
            .await
            .unwrap();
        let ctx = CommandContext::new(store, "!");

        assert!(ctx.trigger_problem(1, "Idh:", None).await.unwrap().is_none());
        assert!(ctx.trigger_problem(1, "  ", None).await.unwrap().is_some());
        assert!(ctx.trigger_problem(1, "!", None).await.unwrap().is_some());
        assert!(ctx.trigger_problem(1, "!l", None).await.unwrap().is_some());
        assert!(ctx.trigger_problem(1, "!list", None).await.unwrap().is_some());
        // The prefix inside a trigger is fine
        assert!(ctx.trigger_problem(1, "Nyx!", None).await.unwrap().is_none());
        assert!(ctx.trigger_problem(1, "NX:", None).await.unwrap().is_some());
        // Editing Nyx itself may keep its trigger
        assert!(ctx.trigger_problem(1, "nx:", Some("nyx")).await.unwrap().is_none());
        // Other owners are independent
        assert!(ctx.trigger_problem(2, "Nx:", None).await.unwrap().is_none());
    }
}
