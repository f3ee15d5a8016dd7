//! # Relay Feature
//!
//! Re-emits persona messages through per-channel webhooks.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod discord;
pub mod error;
pub mod gateway;
pub mod identity;

#[cfg(test)]
pub(crate) mod testing;

pub use discord::DiscordGateway;
pub use error::{GatewayError, RelayError};
pub use gateway::{bounded, Ack, ChannelGateway, RelayEndpoint};
pub use identity::IdentityRelay;
