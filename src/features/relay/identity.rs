//! # Feature: Identity Relay
//!
//! Posts a persona's message into a channel through that channel's relay webhook.
//! The webhook is discovered by its reserved label or created on first use; a
//! per-channel lock makes discover-or-create run once at a time per channel so
//! concurrent first messages cannot create duplicates.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::error::{GatewayError, RelayError};
use super::gateway::{bounded, Ack, ChannelGateway, RelayEndpoint};
use crate::core::{clamp_display_name, truncate_for_message};
use crate::features::personas::PersonaRecord;

type EndpointSlot = Arc<Mutex<Option<RelayEndpoint>>>;

pub struct IdentityRelay {
    gateway: Arc<dyn ChannelGateway>,
    label: String,
    timeout: Duration,
    endpoints: DashMap<u64, EndpointSlot>,
}

impl IdentityRelay {
    pub fn new(gateway: Arc<dyn ChannelGateway>, label: impl Into<String>, timeout: Duration) -> Self {
        IdentityRelay {
            gateway,
            label: label.into(),
            timeout,
            endpoints: DashMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Post `text` into `channel_id` as `persona`.
    ///
    /// The persona's avatar is used when set, otherwise `fallback_avatar`.
    pub async fn emit(
        &self,
        channel_id: u64,
        persona: &PersonaRecord,
        text: &str,
        fallback_avatar: &str,
    ) -> Result<Ack, RelayError> {
        let endpoint = self.resolve_endpoint(channel_id).await?;

        let display_name = clamp_display_name(&persona.name);
        let avatar = persona.avatar.as_deref().unwrap_or(fallback_avatar);
        let avatar = (!avatar.is_empty()).then_some(avatar);
        let content = truncate_for_message(text);

        let sent = bounded(
            self.timeout,
            self.gateway
                .send_via_endpoint(&endpoint, &content, &display_name, avatar),
        )
        .await;

        match sent {
            Ok(ack) => Ok(ack),
            Err(source) => {
                if source.invalidates_endpoint() {
                    self.forget(channel_id, endpoint.id).await;
                }
                Err(RelayError::SendFailed { channel_id, source })
            }
        }
    }

    fn slot(&self, channel_id: u64) -> EndpointSlot {
        self.endpoints.entry(channel_id).or_default().clone()
    }

    async fn resolve_endpoint(&self, channel_id: u64) -> Result<RelayEndpoint, RelayError> {
        let slot = self.slot(channel_id);
        let mut cached = slot.lock().await;
        if let Some(endpoint) = cached.as_ref() {
            return Ok(endpoint.clone());
        }

        let endpoint = self
            .discover_or_create(channel_id)
            .await
            .map_err(|source| RelayError::EndpointUnavailable { channel_id, source })?;
        *cached = Some(endpoint.clone());
        Ok(endpoint)
    }

    async fn discover_or_create(&self, channel_id: u64) -> Result<RelayEndpoint, GatewayError> {
        let existing = bounded(self.timeout, self.gateway.list_relay_endpoints(channel_id)).await?;
        if let Some(found) = existing
            .into_iter()
            .find(|e| e.label.as_deref() == Some(self.label.as_str()))
        {
            debug!("🪝 Reusing relay webhook {} in channel {channel_id}", found.id);
            return Ok(found);
        }

        let created = bounded(
            self.timeout,
            self.gateway.create_relay_endpoint(channel_id, &self.label),
        )
        .await?;
        info!(
            "🪝 Created relay webhook '{}' ({}) in channel {channel_id}",
            self.label, created.id
        );
        Ok(created)
    }

    /// Drop a cached endpoint after a failed send so the next message rediscovers it
    async fn forget(&self, channel_id: u64, endpoint_id: u64) {
        let slot = self.slot(channel_id);
        let mut cached = slot.lock().await;
        if cached.as_ref().map(|e| e.id) == Some(endpoint_id) {
            warn!("🪝 Dropping cached relay webhook {endpoint_id} for channel {channel_id}");
            *cached = None;
        }
    }
}
