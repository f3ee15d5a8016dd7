//! Text command handler trait and reply type
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::features::interception::InboundMessage;
use crate::features::personas::PersonaRecord;

/// A parsed command: lower-cased name, positional arguments and the message it came from
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub name: String,
    pub args: Vec<String>,
    pub message: &'a InboundMessage,
}

impl Invocation<'_> {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `index` onward joined by single spaces
    pub fn rest(&self, index: usize) -> Option<String> {
        let joined = self.args.get(index..)?.join(" ");
        let joined = joined.trim();
        (!joined.is_empty()).then(|| joined.to_string())
    }

    pub fn owner(&self) -> u64 {
        self.message.author_id
    }
}

/// What a handler wants posted back to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// An embed card for one persona
    Card(PersonaRecord),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

/// Trait for prefix command handlers
///
/// Each handler declares the command names it serves and is dispatched by
/// `CommandRegistry`. Handlers never talk to Discord directly; they return a
/// `Reply` and the dispatcher delivers it.
#[async_trait]
pub trait TextCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation<'_>) -> Result<Reply>;
}
