//! Outbound channel operations used by the relay pipeline
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::error::GatewayError;

/// A channel-scoped webhook able to post under any display identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    pub id: u64,
    pub channel_id: u64,
    /// Webhook name, used to recognise the reserved relay webhook
    pub label: Option<String>,
}

/// Acknowledgement for a relayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
    pub message_id: Option<u64>,
}

#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Usable relay endpoints already present in `channel_id`
    async fn list_relay_endpoints(&self, channel_id: u64) -> Result<Vec<RelayEndpoint>, GatewayError>;

    async fn create_relay_endpoint(
        &self,
        channel_id: u64,
        label: &str,
    ) -> Result<RelayEndpoint, GatewayError>;

    async fn send_via_endpoint(
        &self,
        endpoint: &RelayEndpoint,
        text: &str,
        display_name: &str,
        avatar: Option<&str>,
    ) -> Result<Ack, GatewayError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError>;
}

/// Run a gateway call with an upper bound on how long it may take
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(limit)),
    }
}
