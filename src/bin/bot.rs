use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use echo_proxy::commands::{CommandContext, CommandDispatcher, CommandRouter};
use echo_proxy::core::Config;
use echo_proxy::features::{
    Disposition, DiscordGateway, FilePersonaStore, IdentityRelay, InboundMessage, MessagePipeline,
    PersonaStore, TriggerMatcher,
};

struct Handler {
    pipeline: Arc<MessagePipeline>,
    command_prefix: String,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        let inbound = InboundMessage::from(&msg);
        match self.pipeline.process(&inbound).await {
            Disposition::Relayed { persona, deleted } => {
                debug!("Message {} relayed as '{persona}' (deleted: {deleted})", msg.id);
            }
            Disposition::RelayFailed(e) => {
                debug!("Message {} kept after relay failure in channel {}", msg.id, e.channel_id());
            }
            Disposition::Ignored | Disposition::PassedThrough => {}
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);
        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }
        info!("💬 Commands use the '{}' prefix", self.command_prefix);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Echo persona proxy...");

    let store: Arc<dyn PersonaStore> = Arc::new(FilePersonaStore::load(&config.data_path).await?);

    let http = Arc::new(Http::new(&config.discord_token));
    let gateway = Arc::new(DiscordGateway::new(http.clone()));
    let relay = Arc::new(IdentityRelay::new(
        gateway.clone(),
        config.webhook_label.clone(),
        config.gateway_timeout,
    ));

    let router = CommandRouter::new(CommandContext::new(store.clone(), config.command_prefix.clone()));
    let commands = Arc::new(CommandDispatcher::new(router, http));

    let pipeline = Arc::new(MessagePipeline::new(
        TriggerMatcher::new(store),
        relay,
        gateway,
        commands,
        config.gateway_timeout,
    ));

    let handler = Handler {
        pipeline: pipeline.clone(),
        command_prefix: config.command_prefix.clone(),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("🛑 Shutdown requested, closing gateway connections");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    let result = client.start().await;

    if pipeline.in_flight() > 0 {
        info!("⏳ Waiting for {} in-flight message(s)", pipeline.in_flight());
    }
    if !pipeline.drain(config.shutdown_grace).await {
        warn!(
            "⚠️ {} message(s) still in flight after {:?}",
            pipeline.in_flight(),
            config.shutdown_grace
        );
    }

    if let Err(why) = result {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    info!("👋 Echo stopped");
    Ok(())
}
