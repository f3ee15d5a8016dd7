//! # Personas Feature
//!
//! User-registered personas, their JSON-backed store, and trigger matching.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod matcher;
pub mod record;
pub mod store;

pub use matcher::{match_trigger, strip_trigger, TriggerMatch, TriggerMatcher};
pub use record::PersonaRecord;
pub use store::{FilePersonaStore, Insertion, PersonaStore};
