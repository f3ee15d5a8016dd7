//! Routes forwarded messages to command handlers and posts their replies
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::{Invocation, Reply};
use super::handlers::create_all_handlers;
use super::parser::parse_command;
use super::registry::CommandRegistry;
use crate::core::chunk_for_message;
use crate::core::embeds::persona_card;
use crate::features::interception::{CommandLayer, InboundMessage};

/// Parses prefix commands and runs the matching handler
pub struct CommandRouter {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
}

impl CommandRouter {
    pub fn new(context: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        CommandRouter {
            registry,
            context: Arc::new(context),
        }
    }

    /// Run the command in `message`, if it is one we know.
    ///
    /// Non-command text and unknown command names yield `None`.
    pub async fn route(&self, message: &InboundMessage) -> Result<Option<Reply>> {
        let Some((name, args)) = parse_command(&self.context.prefix, &message.content) else {
            return Ok(None);
        };
        let Some(handler) = self.registry.get(&name) else {
            debug!("Ignoring unknown command '{name}'");
            return Ok(None);
        };

        info!("🎯 Command '{name}' from user {}", message.author_id);
        let invocation = Invocation {
            name,
            args,
            message,
        };
        handler
            .handle(Arc::clone(&self.context), &invocation)
            .await
            .map(Some)
    }
}

/// Command layer that answers in the originating channel
pub struct CommandDispatcher {
    router: CommandRouter,
    http: Arc<Http>,
}

impl CommandDispatcher {
    pub fn new(router: CommandRouter, http: Arc<Http>) -> Self {
        CommandDispatcher { router, http }
    }

    async fn send(&self, channel_id: ChannelId, reply: Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => {
                for chunk in chunk_for_message(&text) {
                    channel_id.say(&self.http, chunk).await?;
                }
            }
            Reply::Card(persona) => {
                channel_id
                    .send_message(&self.http, |m| m.set_embed(persona_card(&persona)))
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandLayer for CommandDispatcher {
    async fn forward(&self, message: &InboundMessage) {
        let channel_id = ChannelId(message.channel_id);
        let outcome = match self.router.route(message).await {
            Ok(Some(reply)) => self.send(channel_id, reply).await,
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            error!("Error handling command message {}: {e}", message.id);
            if let Err(why) = channel_id
                .say(&self.http, "Sorry, I encountered an error processing your command.")
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }
}
