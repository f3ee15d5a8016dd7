//! Recording in-memory gateway for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::error::GatewayError;
use super::gateway::{Ack, ChannelGateway, RelayEndpoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub endpoint_id: u64,
    pub channel_id: u64,
    pub text: String,
    pub display_name: String,
    pub avatar: Option<String>,
}

#[derive(Default)]
pub struct RecordingGateway {
    pub endpoints: Mutex<Vec<RelayEndpoint>>,
    pub list_calls: AtomicU64,
    pub created: Mutex<Vec<RelayEndpoint>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub deleted: Mutex<Vec<(u64, u64)>>,
    pub fail_list: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_send: AtomicBool,
    /// Refuse message content the way Discord answers an empty body
    pub reject_send: AtomicBool,
    pub fail_delete: AtomicBool,
    pub hang_send: AtomicBool,
    /// Delay inside list calls, to widen discover-then-create races
    pub list_delay_ms: AtomicU64,
    next_id: AtomicU64,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-existing webhook in a channel, as if left by another run or application
    pub fn seed_endpoint(&self, channel_id: u64, label: &str) -> RelayEndpoint {
        let endpoint = RelayEndpoint {
            id: 9_000 + self.next_id.fetch_add(1, Ordering::SeqCst),
            channel_id,
            label: Some(label.to_string()),
        };
        self.endpoints.lock().unwrap().push(endpoint.clone());
        endpoint
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(u64, u64)> {
        self.deleted.lock().unwrap().clone()
    }

    fn refused() -> GatewayError {
        GatewayError::Discord("Missing Permissions".to_string())
    }
}

#[async_trait]
impl ChannelGateway for RecordingGateway {
    async fn list_relay_endpoints(&self, channel_id: u64) -> Result<Vec<RelayEndpoint>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        Ok(self
            .endpoints
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn create_relay_endpoint(
        &self,
        channel_id: u64,
        label: &str,
    ) -> Result<RelayEndpoint, GatewayError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        let endpoint = RelayEndpoint {
            id: 1 + self.next_id.fetch_add(1, Ordering::SeqCst),
            channel_id,
            label: Some(label.to_string()),
        };
        self.endpoints.lock().unwrap().push(endpoint.clone());
        self.created.lock().unwrap().push(endpoint.clone());
        Ok(endpoint)
    }

    async fn send_via_endpoint(
        &self,
        endpoint: &RelayEndpoint,
        text: &str,
        display_name: &str,
        avatar: Option<&str>,
    ) -> Result<Ack, GatewayError> {
        if self.hang_send.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.reject_send.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("Cannot send an empty message".to_string()));
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(GatewayError::Discord("Unknown Webhook".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            endpoint_id: endpoint.id,
            channel_id: endpoint.channel_id,
            text: text.to_string(),
            display_name: display_name.to_string(),
            avatar: avatar.map(str::to_string),
        });
        Ok(Ack {
            message_id: Some(50_000 + sent.len() as u64),
        })
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push((channel_id, message_id));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(GatewayError::Discord("Unknown Message".to_string()));
        }
        Ok(())
    }
}
