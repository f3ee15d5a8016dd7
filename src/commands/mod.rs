//! # Command System
//!
//! Prefix text commands for managing personas. Only messages that did not
//! match a persona trigger reach this layer.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod parser;
pub mod registry;

pub use context::CommandContext;
pub use dispatcher::{CommandDispatcher, CommandRouter};
pub use handler::{Invocation, Reply, TextCommandHandler};
pub use registry::CommandRegistry;
