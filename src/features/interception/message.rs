use serenity::model::channel::Message;

/// The parts of a Discord message the pipeline and command layer need
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub author_name: String,
    /// The author's displayed avatar URL (Discord's default avatar when unset)
    pub author_avatar: String,
    /// Bots, webhooks and other non-human senders
    pub automated: bool,
    pub content: String,
    /// Attachment URLs in upload order
    pub attachments: Vec<String>,
}

impl From<&Message> for InboundMessage {
    fn from(msg: &Message) -> Self {
        InboundMessage {
            id: msg.id.0,
            channel_id: msg.channel_id.0,
            guild_id: msg.guild_id.map(|g| g.0),
            author_id: msg.author.id.0,
            author_name: msg.author.name.clone(),
            author_avatar: msg.author.face(),
            automated: msg.author.bot || msg.webhook_id.is_some(),
            content: msg.content.clone(),
            attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
        }
    }
}
