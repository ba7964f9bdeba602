//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates command parsing and execution, routing
//! commands to their appropriate handlers.
//!
//! # Flow
//!
//! ```text
//! Telegram message → parse() → Command → parse_command() → CommandResult
//! ```
//!
//! # Examples
//!
//! ```no_run
//! # use sunwatch::commands::{Commander, CommandContext};
//! # async fn example(fetcher: impl sunwatch::farm::SnapshotSource) {
//! let commander = Commander::new(None);
//!
//! let command = commander.parse("/crops").unwrap();
//! let context = CommandContext {
//!     chat_id: "1234".to_string(),
//!     farm_id: Some("23270".to_string()),
//!     now: 1_700_000_000_000,
//! };
//! let result = commander.parse_command(&command, &context, &fetcher).await;
//! # }
//! ```

use command_parser::Parser;

use crate::{
    commands::{
        CommandContext, CommandParseError, CommandResult,
        actions::{
            handle_get_farm, handle_globe, handle_help, handle_set_farm, handle_start,
            handle_status,
        },
        command::{Command, format_command_error},
    },
    farm::SnapshotSource,
};

pub struct Commander {
    parser: Parser,
    /// Username of the bot, commands addressed to other bots are ignored
    username: Option<String>,
}

impl Commander {
    pub fn new(username: Option<String>) -> Self {
        let parser = Parser::new('/', '-');
        Commander { parser, username }
    }

    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        match Command::parse(&self.parser, self.username.as_deref(), body) {
            Ok(command) => Ok(command),
            // Return silently if the command is not for the bot
            // Otherwise, send an error message
            Err(error) => match format_command_error(error) {
                Some(message) => Err(CommandParseError::InvalidCommand(message)),
                None => Err(CommandParseError::NotForBot),
            },
        }
    }

    pub async fn parse_command<S: SnapshotSource>(
        &self,
        command: &Command,
        context: &CommandContext,
        source: &S,
    ) -> CommandResult {
        match command {
            Command::Start => handle_start(),
            Command::Help => handle_help(),
            Command::SetFarm(farm_id) => handle_set_farm(context, farm_id),
            Command::GetFarm => handle_get_farm(context),
            Command::Status(kind) => handle_status(context, *kind, source).await,
            Command::Globe => handle_globe(context, source).await,
        }
    }
}
