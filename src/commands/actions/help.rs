//! Help and start command handlers.
//!
//! These are stateless commands that always return the same message.

use log::debug;

use crate::commands::{
    CommandResult,
    markdown_response::{format_help, format_start},
};

/// Returns formatted help information about available commands.
pub fn handle_help() -> CommandResult {
    debug!("handling help command");

    CommandResult {
        response: format_help(),
        farm_to_register: None,
    }
}

/// Returns the welcome message.
pub fn handle_start() -> CommandResult {
    debug!("handling start command");

    CommandResult {
        response: format_start(),
        farm_to_register: None,
    }
}
