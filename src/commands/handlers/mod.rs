//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod browse;
pub mod help;
pub mod manage;

use std::sync::Arc;

use super::handler::TextCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn TextCommandHandler>> {
    vec![
        Arc::new(manage::ManageHandler),
        Arc::new(browse::BrowseHandler),
        Arc::new(help::HelpHandler),
    ]
}
