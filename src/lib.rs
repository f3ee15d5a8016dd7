// Core layer - configuration, size limits, embeds
pub mod core;

// Features layer - personas, relay, interception pipeline
pub mod features;

// Application layer - prefix commands
pub mod commands;

pub use crate::core::Config;

pub use features::{
    // Interception
    CommandLayer, Disposition, InboundMessage, MessagePipeline,
    // Personas
    FilePersonaStore, PersonaRecord, PersonaStore, TriggerMatch, TriggerMatcher,
    // Relay
    ChannelGateway, DiscordGateway, GatewayError, IdentityRelay, RelayError,
};
