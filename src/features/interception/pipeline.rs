//! # Feature: Message Interception
//!
//! Every inbound message passes through here. A message that starts with one of
//! its sender's persona triggers is re-posted under that persona and the
//! original is removed; anything else is handed to the command layer untouched.
//!
//! Per message: `Received -> NoMatch -> PassThrough`, or
//! `Received -> Matched -> Relayed -> Deleted`. The original is only deleted
//! after the relayed copy exists, and a failed relay leaves it in place.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use super::message::InboundMessage;
use crate::features::personas::TriggerMatcher;
use crate::features::relay::{bounded, ChannelGateway, IdentityRelay, RelayError};

/// Receives messages that did not address a persona
#[async_trait]
pub trait CommandLayer: Send + Sync {
    async fn forward(&self, message: &InboundMessage);
}

/// What the pipeline did with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Sent by a bot or webhook
    Ignored,
    PassedThrough,
    Relayed {
        persona: String,
        /// False when the original could not be removed
        deleted: bool,
    },
    RelayFailed(RelayError),
}

#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

struct InFlightGuard<'a>(&'a InFlight);

impl InFlight {
    fn enter(&self) -> InFlightGuard<'_> {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self)
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

pub struct MessagePipeline {
    matcher: TriggerMatcher,
    relay: Arc<IdentityRelay>,
    gateway: Arc<dyn ChannelGateway>,
    commands: Arc<dyn CommandLayer>,
    delete_timeout: Duration,
    in_flight: InFlight,
}

impl MessagePipeline {
    pub fn new(
        matcher: TriggerMatcher,
        relay: Arc<IdentityRelay>,
        gateway: Arc<dyn ChannelGateway>,
        commands: Arc<dyn CommandLayer>,
        delete_timeout: Duration,
    ) -> Self {
        MessagePipeline {
            matcher,
            relay,
            gateway,
            commands,
            delete_timeout,
            in_flight: InFlight::default(),
        }
    }

    pub async fn process(&self, message: &InboundMessage) -> Disposition {
        if message.automated {
            return Disposition::Ignored;
        }
        let _guard = self.in_flight.enter();
        let request_id = Uuid::new_v4();

        debug!(
            "[{request_id}] 📥 Message {} | User: {} | Channel: {}",
            message.id, message.author_id, message.channel_id
        );

        let hit = match self.matcher.find(message.author_id, &message.content).await {
            Ok(hit) => hit,
            Err(e) => {
                error!("[{request_id}] ❌ Persona lookup failed for user {}: {e}", message.author_id);
                None
            }
        };

        let Some(hit) = hit else {
            debug!("[{request_id}] ➡️ No trigger matched, forwarding to commands");
            self.commands.forward(message).await;
            return Disposition::PassedThrough;
        };

        info!(
            "[{request_id}] 🎭 User {} speaking as '{}' in channel {}",
            message.author_id, hit.persona.name, message.channel_id
        );

        if let Err(e) = self
            .relay
            .emit(
                message.channel_id,
                &hit.persona,
                &hit.residual,
                &message.author_avatar,
            )
            .await
        {
            warn!("[{request_id}] ⚠️ {e}; original message {} left in place", message.id);
            return Disposition::RelayFailed(e);
        }

        let deleted = match bounded(
            self.delete_timeout,
            self.gateway.delete_message(message.channel_id, message.id),
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("[{request_id}] ⚠️ Relayed, but could not delete original {}: {e}", message.id);
                false
            }
        };

        debug!("[{request_id}] ✅ Relay complete (original deleted: {deleted})");
        Disposition::Relayed {
            persona: hit.persona.name,
            deleted,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for messages already being processed. Returns false on timeout.
    pub async fn drain(&self, grace: Duration) -> bool {
        tokio::time::timeout(grace, self.in_flight.wait_idle())
            .await
            .is_ok()
    }
}
