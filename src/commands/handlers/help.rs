//! Help command
//!
//! Handles: help

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, Reply, TextCommandHandler};

pub struct HelpHandler;

const COMMANDS: &[(&str, &str)] = &[
    ("register <name> <trigger> [avatar_url]", "Create a persona (or attach its avatar)"),
    ("rename <name> <new name>", "Rename a persona"),
    ("avatar <name> [url | clear]", "Change or clear a persona's avatar"),
    ("trigger <name> <new trigger>", "Change the prefix a persona answers to"),
    ("universe <name> [tag]", "Group a persona under a universe (no tag clears it)"),
    ("delete <name>", "Delete a persona"),
    ("list", "List your personas"),
    ("show <name>", "Show a persona card"),
    ("search <text>", "Find personas by name, trigger or universe"),
    ("help", "Show this message"),
];

pub fn help_text(prefix: &str) -> String {
    let mut text = String::from("**Echo commands**\n");
    for (syntax, description) in COMMANDS {
        text.push_str(&format!("`{prefix}{syntax}` · {description}\n"));
    }
    text.push_str(
        "\nStart any message with one of your triggers to send it as that persona. \
         Wrap names containing spaces in \"quotes\".",
    );
    text
}

#[async_trait]
impl TextCommandHandler for HelpHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, _invocation: &Invocation<'_>) -> Result<Reply> {
        Ok(Reply::Text(help_text(&ctx.prefix)))
    }
}
