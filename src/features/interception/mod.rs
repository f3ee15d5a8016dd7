//! # Interception Feature
//!
//! Routes inbound messages either to a persona relay or on to command handling.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod message;
pub mod pipeline;

pub use message::InboundMessage;
pub use pipeline::{CommandLayer, Disposition, MessagePipeline};
