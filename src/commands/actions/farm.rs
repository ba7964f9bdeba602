//! Farm registration command handlers.
//!
//! `/setfarm` requests the registration of a farm for the chat; the caller
//! applies it to the user store, which also restarts the notification cycle.
//! `/getfarm` shows the registered farm.

use log::debug;

use crate::commands::{
    CommandContext, CommandResult,
    markdown_response::{format_current_farm, format_farm_registered, format_no_farm},
};

pub fn handle_set_farm(context: &CommandContext, farm_id: &str) -> CommandResult {
    debug!("handling setfarm command for {}: {}", context.chat_id, farm_id);

    CommandResult {
        response: format_farm_registered(farm_id),
        farm_to_register: Some(farm_id.to_owned()),
    }
}

pub fn handle_get_farm(context: &CommandContext) -> CommandResult {
    debug!("handling getfarm command for {}", context.chat_id);

    let response = match &context.farm_id {
        Some(farm_id) => format_current_farm(farm_id),
        None => format_no_farm(),
    };

    CommandResult {
        response,
        farm_to_register: None,
    }
}
