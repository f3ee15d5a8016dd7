//! Persona browsing commands
//!
//! Handles: list, show, search
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, Reply, TextCommandHandler};
use crate::features::personas::PersonaRecord;

/// Handler for read-only views of the caller's personas
pub struct BrowseHandler;

#[async_trait]
impl TextCommandHandler for BrowseHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["list", "show", "search"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation<'_>) -> Result<Reply> {
        match invocation.name.as_str() {
            "list" => self.handle_list(&ctx, invocation).await,
            "show" => self.handle_show(&ctx, invocation).await,
            "search" => self.handle_search(&ctx, invocation).await,
            _ => Ok(Reply::text("Unknown command")),
        }
    }
}

fn summary_line(persona: &PersonaRecord) -> String {
    match &persona.universe {
        Some(universe) => format!("• **{}** · `{}` · *{universe}*", persona.name, persona.trigger),
        None => format!("• **{}** · `{}`", persona.name, persona.trigger),
    }
}

impl BrowseHandler {
    async fn handle_list(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let personas = ctx.store.get_personas(invocation.owner()).await?;
        if personas.is_empty() {
            return Ok(Reply::text(format!(
                "You have no personas yet. Use `{}register <name> <trigger>` to create one.",
                ctx.prefix
            )));
        }

        let mut response = format!("📜 **Your personas ({}):**\n", personas.len());
        for persona in &personas {
            response.push_str(&summary_line(persona));
            response.push('\n');
        }
        Ok(Reply::Text(response.trim_end().to_string()))
    }

    async fn handle_show(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let Some(name) = invocation.rest(0) else {
            return Ok(Reply::text(ctx.usage("show <name>")));
        };
        Ok(match ctx.persona(invocation.owner(), &name).await? {
            Some(persona) => Reply::Card(persona),
            None => Reply::text(ctx.not_found(&name)),
        })
    }

    async fn handle_search(&self, ctx: &CommandContext, invocation: &Invocation<'_>) -> Result<Reply> {
        let Some(query) = invocation.rest(0) else {
            return Ok(Reply::text(ctx.usage("search <text>")));
        };
        let needle = query.to_lowercase();

        let hits: Vec<_> = ctx
            .store
            .get_personas(invocation.owner())
            .await?
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.trigger.to_lowercase().contains(&needle)
                    || p.universe
                        .as_deref()
                        .is_some_and(|u| u.to_lowercase().contains(&needle))
            })
            .collect();

        if hits.is_empty() {
            return Ok(Reply::text(format!("🔍 No personas match **{query}**.")));
        }
        let mut response = format!("🔍 **{} match(es) for {query}:**\n", hits.len());
        for persona in &hits {
            response.push_str(&summary_line(persona));
            response.push('\n');
        }
        Ok(Reply::Text(response.trim_end().to_string()))
    }
}
