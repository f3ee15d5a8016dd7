//! # Core Module
//!
//! Configuration, Discord size limits and shared embed builders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod embeds;
pub mod response;

pub use config::Config;
pub use response::{
    chunk_for_message, chunk_text, clamp_display_name, truncate_for_embed, truncate_for_message,
    DISPLAY_NAME_LIMIT, EMBED_LIMIT, MESSAGE_LIMIT,
};
