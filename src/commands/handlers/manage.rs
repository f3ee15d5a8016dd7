//! Persona management commands
//!
//! Handles: register, rename, avatar, trigger, universe, delete
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::{is_avatar_url, CommandContext};
use crate::commands::handler::{Invocation, Reply, TextCommandHandler};
use crate::features::personas::{Insertion, PersonaRecord};

/// Handler for commands that create or change the caller's personas
pub struct ManageHandler;

#[async_trait]
impl TextCommandHandler for ManageHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["register", "rename", "avatar", "trigger", "universe", "delete"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation<'_>) -> Result<Reply> {
        match invocation.name.as_str() {
            "register" => self.handle_register(&ctx, invocation).await,
            "rename" => self.handle_rename(&ctx, invocation).await,
            "avatar" => self.handle_avatar(&ctx, invocation).await,
            "trigger" => self.handle_trigger(&ctx, invocation).await,
            "universe" => self.handle_universe(&ctx, invocation).await,
            "delete" => self.handle_delete(&ctx, invocation).await,
            _ => Ok(Reply::text("Unknown command")),
        }
    }
}

impl ManageHandler {
    async fn handle_register(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let (Some(name), Some(trigger)) = (invocation.arg(0), invocation.arg(1)) else {
            return Ok(Reply::text(ctx.usage("register <name> <trigger> [avatar_url]")));
        };
        let name = name.trim();
        let owner = invocation.owner();

        if name.is_empty() {
            return Ok(Reply::text("❌ A persona needs a name."));
        }
        if ctx.persona(owner, name).await?.is_some() {
            return Ok(Reply::text(format!("❌ You already have a persona named **{name}**.")));
        }
        if let Some(problem) = ctx.trigger_problem(owner, trigger, None).await? {
            return Ok(Reply::text(problem));
        }

        let avatar = match invocation.arg(2) {
            Some(url) if !is_avatar_url(url) => {
                return Ok(Reply::text("❌ The avatar must be an http(s) link to an image."));
            }
            Some(url) => Some(url),
            None => invocation.message.attachments.first().map(String::as_str),
        };

        // Another register may have landed since the checks above
        let reply = match ctx
            .store
            .insert(PersonaRecord::new(owner, name, trigger, avatar))
            .await?
        {
            Insertion::Added => {
                info!("Persona '{name}' registered for user {owner}");
                format!("✅ Persona **{name}** registered! Start a message with `{trigger}` to speak as them.")
            }
            Insertion::NameTaken => format!("❌ You already have a persona named **{name}**."),
            Insertion::TriggerTaken(other) => {
                format!("❌ Trigger `{trigger}` is already used by **{other}**.")
            }
        };
        Ok(Reply::text(reply))
    }

    async fn handle_rename(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let (Some(name), Some(new_name)) = (invocation.arg(0), invocation.rest(1)) else {
            return Ok(Reply::text(ctx.usage("rename <name> <new name>")));
        };
        let owner = invocation.owner();
        let Some(mut persona) = ctx.persona(owner, name).await? else {
            return Ok(Reply::text(ctx.not_found(name)));
        };

        if !persona.is_named(&new_name) && ctx.persona(owner, &new_name).await?.is_some() {
            return Ok(Reply::text(format!(
                "❌ You already have a persona named **{new_name}**."
            )));
        }

        let old_name = std::mem::replace(&mut persona.name, new_name.clone());
        ctx.store.replace(owner, &old_name, persona).await?;
        info!("Persona '{old_name}' renamed to '{new_name}' for user {owner}");

        Ok(Reply::text(format!("✅ **{old_name}** is now **{new_name}**.")))
    }

    async fn handle_avatar(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let Some(name) = invocation.arg(0) else {
            return Ok(Reply::text(ctx.usage("avatar <name> [url | clear]")));
        };
        let owner = invocation.owner();
        let Some(mut persona) = ctx.persona(owner, name).await? else {
            return Ok(Reply::text(ctx.not_found(name)));
        };

        let reply = match invocation.arg(1) {
            Some(word) if word.eq_ignore_ascii_case("clear") => {
                persona.avatar = None;
                format!("✅ **{}** now uses your own avatar.", persona.name)
            }
            Some(url) if is_avatar_url(url) => {
                persona.avatar = Some(url.to_string());
                format!("✅ Avatar updated for **{}**.", persona.name)
            }
            Some(_) => return Ok(Reply::text("❌ The avatar must be an http(s) link to an image.")),
            None => match invocation.message.attachments.first() {
                Some(url) => {
                    persona.avatar = Some(url.clone());
                    format!("✅ Avatar updated for **{}**.", persona.name)
                }
                None => {
                    return Ok(Reply::text(format!(
                        "{} (or attach an image)",
                        ctx.usage("avatar <name> [url | clear]")
                    )))
                }
            },
        };

        let current = persona.name.clone();
        ctx.store.replace(owner, &current, persona).await?;
        Ok(Reply::text(reply))
    }

    async fn handle_trigger(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let (Some(name), Some(trigger)) = (invocation.arg(0), invocation.arg(1)) else {
            return Ok(Reply::text(ctx.usage("trigger <name> <new trigger>")));
        };
        let owner = invocation.owner();
        let Some(mut persona) = ctx.persona(owner, name).await? else {
            return Ok(Reply::text(ctx.not_found(name)));
        };
        if let Some(problem) = ctx.trigger_problem(owner, trigger, Some(&persona.name)).await? {
            return Ok(Reply::text(problem));
        }

        persona.trigger = trigger.to_string();
        let current = persona.name.clone();
        ctx.store.replace(owner, &current, persona).await?;
        info!("Persona '{current}' trigger changed for user {owner}");

        Ok(Reply::text(format!("✅ **{current}** now answers to `{trigger}`.")))
    }

    async fn handle_universe(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let Some(name) = invocation.arg(0) else {
            return Ok(Reply::text(ctx.usage("universe <name> [tag]")));
        };
        let owner = invocation.owner();
        let Some(mut persona) = ctx.persona(owner, name).await? else {
            return Ok(Reply::text(ctx.not_found(name)));
        };

        persona.universe = invocation.rest(1);
        let reply = match &persona.universe {
            Some(tag) => format!("✅ **{}** now belongs to *{tag}*.", persona.name),
            None => format!("✅ Universe cleared for **{}**.", persona.name),
        };
        let current = persona.name.clone();
        ctx.store.replace(owner, &current, persona).await?;
        Ok(Reply::text(reply))
    }

    async fn handle_delete(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let Some(name) = invocation.rest(0) else {
            return Ok(Reply::text(ctx.usage("delete <name>")));
        };
        let owner = invocation.owner();
        match ctx.store.remove(owner, &name).await? {
            Some(removed) => {
                info!("Persona '{}' deleted for user {owner}", removed.name);
                Ok(Reply::text(format!("🗑 Persona **{}** deleted.", removed.name)))
            }
            None => Ok(Reply::text(ctx.not_found(&name))),
        }
    }
}
