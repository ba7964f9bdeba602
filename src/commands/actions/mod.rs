//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext), processes the command,
//! and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! # Available Handlers
//!
//! - [`handle_start`] / [`handle_help`] - Static messages
//! - [`handle_set_farm`] / [`handle_get_farm`] - Farm registration
//! - [`handle_status`] - Readiness of one resource kind
//! - [`handle_globe`] - Floating Island schedule
//!
//! # State Changes
//!
//! Handlers don't modify the user store directly. A registration is requested
//! through `farm_to_register` in the [`CommandResult`](crate::commands::CommandResult).

mod farm;
mod help;
mod status;

pub use crate::commands::actions::{
    farm::{handle_get_farm, handle_set_farm},
    help::{handle_help, handle_start},
    status::{handle_globe, handle_status},
};
