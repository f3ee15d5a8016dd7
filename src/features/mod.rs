//! # Features
//!
//! - **personas**: persona records, the persona store, trigger matching
//! - **relay**: channel gateway and per-channel webhook relay
//! - **interception**: the per-message pipeline tying them together

pub mod interception;
pub mod personas;
pub mod relay;

pub use interception::{CommandLayer, Disposition, InboundMessage, MessagePipeline};
pub use personas::{FilePersonaStore, Insertion, PersonaRecord, PersonaStore, TriggerMatch, TriggerMatcher};
pub use relay::{ChannelGateway, DiscordGateway, GatewayError, IdentityRelay, RelayError};
