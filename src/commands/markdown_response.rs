//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Telegram's
//! Markdown dialect. Status listings reuse the lines built by the readiness
//! scanner and only add headers and fallbacks.

use crate::farm::ResourceKind;
use crate::readiness::IslandSchedule;

/// Formats the welcome message of `/start`.
///
/// # Examples
///
/// ```
/// # use sunwatch::commands::markdown_response::format_start;
/// assert!(format_start().contains("/setfarm"));
/// ```
pub fn format_start() -> String {
    "👋 Hello! I am your Sunflower Land farm monitor.\n\n\
        To begin, use: `/setfarm [YOUR_FARM_ID]`\n\
        Use `/help` to list every command."
        .to_owned()
}

/// Formats the help message showing available bot commands.
///
/// # Examples
///
/// ```
/// # use sunwatch::commands::markdown_response::format_help;
/// let help = format_help();
/// assert!(help.contains("Available commands"));
/// ```
pub fn format_help() -> String {
    "📖 *Available commands:*\n\n\
        /start - Start the bot\n\
        /setfarm [ID] - Set your farm\n\
        /getfarm - Show your current farm\n\
        /crops - Crops status\n\
        /beehive - Beehives status\n\
        /globe - Floating Island schedule\n\
        /trees - Trees status\n\
        /stones - Stones status\n\
        /help - Show this help\n\n\
        Once a farm is set, you get a message when crops, trees, stones or beehives are ready \
        and a few minutes before the Floating Island opens and closes."
        .to_owned()
}

/// Formats a response for an unknown command.
pub fn format_unknown_command() -> String {
    "Unknown command. Type /help for more information.".to_owned()
}

/// Formats an error response for invalid setfarm command syntax.
pub fn format_invalid_setfarm() -> String {
    "❌ Invalid format. Usage: `/setfarm [ID]` (e.g. `/setfarm 23270`)".to_owned()
}

/// Formats the confirmation of a farm registration.
///
/// # Arguments
///
/// * `farm_id` - The newly registered farm id
pub fn format_farm_registered(farm_id: &str) -> String {
    format!("✅ *Farm ID registered!*\nYour new ID is: *{}*", farm_id)
}

/// Formats the answer of `/getfarm`.
pub fn format_current_farm(farm_id: &str) -> String {
    format!("Your current farm ID is: *{}*", farm_id)
}

/// Formats the answer of `/getfarm` when no farm is registered.
pub fn format_no_farm() -> String {
    "You have not set your farm ID yet. Use `/setfarm [ID]`".to_owned()
}

/// Formats the answer of status commands when no farm is registered.
pub fn format_farm_required() -> String {
    "❌ Set your farm ID first with `/setfarm [ID]`".to_owned()
}

/// Formats the generic failure notice shown when the farm could not be fetched.
pub fn format_fetch_error() -> String {
    "❌ Could not fetch farm data.".to_owned()
}

/// Formats the status listing of a resource kind.
///
/// # Arguments
///
/// * `kind` - Resource kind of the listing
/// * `farm_id` - Farm the lines were computed for
/// * `lines` - One line (or block, for beehives) per instance
///
/// # Examples
///
/// ```
/// # use sunwatch::commands::markdown_response::format_status;
/// # use sunwatch::farm::ResourceKind;
/// let lines = vec!["**Potato** (plot #1): ready in **00h 00m 50s**".to_string()];
/// let output = format_status(ResourceKind::Crop, "42", &lines);
/// assert!(output.starts_with("🥕 *Crops status - farm 42*"));
/// ```
pub fn format_status(kind: ResourceKind, farm_id: &str, lines: &[String]) -> String {
    let (header, separator) = match kind {
        ResourceKind::Crop => (format!("🥕 *Crops status - farm {}* 🥕", farm_id), "\n"),
        ResourceKind::Tree => (format!("🌳 *Trees status - farm {}* 🌳", farm_id), "\n"),
        ResourceKind::Stone => (format!("⛰️ *Stones status - farm {}* ⛰️", farm_id), "\n"),
        ResourceKind::Beehive => (format!("🐝 *Beehives status - farm {}* 🐝", farm_id), "\n\n"),
    };

    format!("{}\n\n{}", header, lines.join(separator))
}

/// Formats the answer when the farm has no instance of `kind` at all.
pub fn format_nothing_found(kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Crop => "No crop plots found on this farm.".to_owned(),
        ResourceKind::Tree => "No trees found on this farm.".to_owned(),
        ResourceKind::Stone => "No stones found on this farm.".to_owned(),
        ResourceKind::Beehive => "No beehives found on this farm.".to_owned(),
    }
}

/// Formats the answer when instances exist but none has an active cycle.
pub fn format_nothing_active(kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Crop => "No crops are currently planted.".to_owned(),
        ResourceKind::Tree => "No chopping information available.".to_owned(),
        ResourceKind::Stone => "No mining information available.".to_owned(),
        ResourceKind::Beehive => "No beehives found on this farm.".to_owned(),
    }
}

/// Formats the answer of `/globe` when the farm has no schedule.
pub fn format_no_island_events() -> String {
    "No Floating Island events scheduled.".to_owned()
}

/// Formats the Floating Island schedule.
///
/// Past events are not part of the schedule and are never shown.
pub fn format_island_schedule(schedule: &IslandSchedule) -> String {
    let mut sections = vec!["*Floating Island schedule*".to_owned()];

    if !schedule.current.is_empty() {
        sections.push(format!("\n*Current event:*\n{}", schedule.current.join("\n")));
    }

    if !schedule.upcoming.is_empty() {
        sections.push(format!("\n*Upcoming events:*\n{}", schedule.upcoming.join("\n")));
    }

    if schedule.is_empty() {
        sections.push("\nNo current or upcoming event.".to_owned());
    }

    sections.join("\n")
}
