//! Serenity-backed channel gateway using webhooks as relay endpoints
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::webhook::Webhook;
use std::sync::Arc;

use super::error::GatewayError;
use super::gateway::{Ack, ChannelGateway, RelayEndpoint};

pub struct DiscordGateway {
    http: Arc<Http>,
    /// Webhooks seen through list/create, keyed by webhook id
    webhooks: DashMap<u64, Webhook>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordGateway {
            http,
            webhooks: DashMap::new(),
        }
    }

    fn remember(&self, channel_id: u64, webhook: Webhook) -> RelayEndpoint {
        let endpoint = RelayEndpoint {
            id: webhook.id.0,
            channel_id: webhook.channel_id.map(|c| c.0).unwrap_or(channel_id),
            label: webhook.name.clone(),
        };
        self.webhooks.insert(endpoint.id, webhook);
        endpoint
    }

    async fn webhook_for(&self, endpoint: &RelayEndpoint) -> Result<Webhook, GatewayError> {
        if let Some(webhook) = self.webhooks.get(&endpoint.id) {
            return Ok(webhook.clone());
        }

        debug!("Webhook {} not cached, fetching", endpoint.id);
        let webhook = self
            .http
            .get_webhook(endpoint.id)
            .await
            .map_err(discord_error)?;
        if webhook.token.is_none() {
            return Err(GatewayError::MissingToken(endpoint.id));
        }
        self.webhooks.insert(endpoint.id, webhook.clone());
        Ok(webhook)
    }
}

fn discord_error(err: serenity::Error) -> GatewayError {
    match &err {
        serenity::Error::Http(http) if http.status_code().map(|s| s.as_u16()) == Some(400) => {
            GatewayError::Rejected(err.to_string())
        }
        _ => GatewayError::Discord(err.to_string()),
    }
}

#[async_trait]
impl ChannelGateway for DiscordGateway {
    async fn list_relay_endpoints(&self, channel_id: u64) -> Result<Vec<RelayEndpoint>, GatewayError> {
        let webhooks = ChannelId(channel_id)
            .webhooks(&self.http)
            .await
            .map_err(discord_error)?;

        // Webhooks created by other applications come back without a token and cannot be executed
        Ok(webhooks
            .into_iter()
            .filter(|w| w.token.is_some())
            .map(|w| self.remember(channel_id, w))
            .collect())
    }

    async fn create_relay_endpoint(
        &self,
        channel_id: u64,
        label: &str,
    ) -> Result<RelayEndpoint, GatewayError> {
        let webhook = ChannelId(channel_id)
            .create_webhook(&self.http, label)
            .await
            .map_err(discord_error)?;
        Ok(self.remember(channel_id, webhook))
    }

    async fn send_via_endpoint(
        &self,
        endpoint: &RelayEndpoint,
        text: &str,
        display_name: &str,
        avatar: Option<&str>,
    ) -> Result<Ack, GatewayError> {
        let webhook = self.webhook_for(endpoint).await?;

        let sent = webhook
            .execute(&self.http, true, |w| {
                w.content(text).username(display_name);
                if let Some(url) = avatar {
                    w.avatar_url(url);
                }
                w
            })
            .await
            .map_err(|e| {
                let err = discord_error(e);
                // A deleted webhook must be rediscovered next time
                if err.invalidates_endpoint() {
                    self.webhooks.remove(&endpoint.id);
                }
                err
            })?;

        Ok(Ack {
            message_id: sent.map(|m| m.id.0),
        })
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        ChannelId(channel_id)
            .delete_message(&self.http, MessageId(message_id))
            .await
            .map_err(discord_error)
    }
}
