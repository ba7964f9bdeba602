//! Command parsing and handling.
//!
//! This module provides command parsing functionality for the bot, converting
//! Telegram message text into structured [`Command`] enums that can be processed
//! by the application.

use command_parser::{Command as ParserCommand, Parser};
use log::debug;

use crate::commands::markdown_response::{format_invalid_setfarm, format_unknown_command};
use crate::farm::ResourceKind;

/// Bot commands.
///
/// Names are matched case-insensitively, an `@botname` suffix is ignored.
#[derive(Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `/setfarm <digits>`
    SetFarm(String),
    /// `/getfarm`
    GetFarm,
    /// `/crops`, `/beehive`, `/trees`, `/stones`
    Status(ResourceKind),
    /// `/globe`
    Globe,
}

#[derive(Debug)]
pub enum CommandParsingError {
    UnableToParse,
    NotForBot,
    Unknown,
    InvalidSetFarm,
}

impl Command {
    /// Parses a message.
    ///
    /// # Arguments
    ///
    /// * `parser` - Parser configured with the `/` prefix
    /// * `username` - Username of the bot, used to ignore commands addressed to other bots
    /// * `body` - Text of the message
    pub fn parse(parser: &Parser, username: Option<&str>, body: &str) -> Result<Self, CommandParsingError> {
        let body = body.trim().to_lowercase();
        let (head, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body.as_str(), ""));

        // Telegram appends the bot username in groups: /crops@sunwatch_bot
        let name = match head.split_once('@') {
            Some((name, target)) => {
                if username.is_some_and(|username| !username.eq_ignore_ascii_case(target)) {
                    debug!("ignoring command addressed to {}", target);
                    return Err(CommandParsingError::NotForBot);
                }
                name
            }
            None => head,
        };

        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let mut body = name.to_owned();
        for word in rest.split_whitespace() {
            body.push(' ');
            body.push_str(word);
        }
        body.push_str(" dummy");

        // This is normal to fail if the message is not a command
        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        debug!("Parsing command: {:?}", command);

        match command.name.as_str() {
            "start" => Ok(Command::Start),
            "help" => Ok(Command::Help),
            "setfarm" => Ok(Command::SetFarm(Self::parse_setfarm(&command)?)),
            "getfarm" => Ok(Command::GetFarm),
            "crops" => Ok(Command::Status(ResourceKind::Crop)),
            "beehive" | "beehives" => Ok(Command::Status(ResourceKind::Beehive)),
            "trees" => Ok(Command::Status(ResourceKind::Tree)),
            "stones" => Ok(Command::Status(ResourceKind::Stone)),
            "globe" => Ok(Command::Globe),
            _ => Err(CommandParsingError::Unknown),
        }
    }

    fn parse_setfarm(command: &ParserCommand) -> Result<String, CommandParsingError> {
        debug!("Parsing setfarm command: {:?}", command);

        // Exactly one argument: the numeric farm id
        if command.arguments.len() != 1 {
            return Err(CommandParsingError::InvalidSetFarm);
        }

        let farm_id = &command.arguments[0];
        if farm_id.is_empty() || !farm_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CommandParsingError::InvalidSetFarm);
        }

        debug!("Parsed setfarm command - farm_id: {}", farm_id);

        Ok(farm_id.clone())
    }
}

/// Returns the message answered for a parsing error, `None` when the message
/// must be ignored.
pub fn format_command_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command()),
        CommandParsingError::InvalidSetFarm => Some(format_invalid_setfarm()),
        _ => None,
    }
}
