//! Bot module tying Telegram commands to farm monitoring.
//!
//! This module provides the main [`Bot`] implementation. It owns the Telegram
//! client, the farm fetcher and the user store, and runs everything from one
//! cooperative loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ load users                                   │
//! │ drain commands   (getUpdates → Commander)    │
//! │ fleet scan       (every polling_interval)    │
//! │ sleep            (command_interval)          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A slow scan delays command handling. Nothing runs in parallel, so the user
//! store needs no locking.
//!
//! # Example
//!
//! ```no_run
//! # use sunwatch::bot::Bot;
//! # use sunwatch::config::Config;
//! # async fn run(args: sunwatch::Args) -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config, &args)?;
//! bot.start().await; // Runs indefinitely
//! # Ok(())
//! # }
//! ```

use std::{
    future::Future,
    panic::AssertUnwindSafe,
    path::PathBuf,
    time::{Duration, Instant},
};

use futures::FutureExt;
use log::{error, info};
use tokio::time;

use crate::{
    Args,
    commands::{CommandContext, CommandParseError, Commander},
    config::Config,
    farm::{FarmFetcher, FarmRequester, SnapshotSource},
    fleet::FleetScheduler,
    readiness::time_format::now_ms,
    telegram::{IncomingMessage, MessageSink, TelegramClient, UpdateSession},
    users::{UserLoader, UsersMap},
};

/// Main bot structure.
pub struct Bot {
    /// Telegram client used for both polling and sending.
    telegram: TelegramClient,

    /// Sunflower Land farm fetcher, shared by commands and scans.
    fetcher: FarmFetcher<FarmRequester>,

    /// JSON store of the users, read at every loop iteration.
    user_loader: UserLoader,

    /// Command parser and executor.
    commander: Commander,

    /// Sequential scan of every registered farm.
    fleet: FleetScheduler,

    /// Delay between two fleet scans.
    polling_interval: Duration,

    /// Delay between two loop iterations.
    command_interval: Duration,
}

impl Bot {
    /// Creates a new Bot instance from configuration and command line arguments.
    ///
    /// The data directory is created if missing; the user store lives in
    /// `<data>/users.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or the data
    /// directory cannot be created.
    pub fn new(config: Config, args: &Args) -> Result<Self, anyhow::Error> {
        let requester = FarmRequester::new(
            &config.sfl.url,
            &config.sfl.api_key,
            Duration::from_secs(config.sfl.timeout),
        )?;
        let fetcher = FarmFetcher::new(requester);

        let telegram = TelegramClient::new(
            &config.telegram.url,
            &config.telegram.token,
            config.telegram.poll_timeout,
        )?;

        std::fs::create_dir_all(&args.data)?;
        let store_path: PathBuf = [args.data.as_str(), "users.json"].iter().collect();
        let user_loader = UserLoader::new(store_path.to_string_lossy().into_owned());

        Ok(Bot {
            telegram,
            fetcher,
            user_loader,
            commander: Commander::new(config.telegram.username),
            fleet: FleetScheduler::new(Duration::from_secs(config.sfl.request_delay)),
            polling_interval: Duration::from_secs(config.sfl.polling_interval),
            command_interval: Duration::from_secs(config.telegram.command_interval),
        })
    }

    /// Starts the bot. Runs until the process is terminated.
    ///
    /// The update cursor is resumed from the store. When the store holds no
    /// cursor, pending updates are skipped so old commands are not replayed.
    /// A panicking iteration is logged and the loop goes on at the next tick.
    pub async fn start(self) {
        let users = self.user_loader.load().await;
        let farms: Vec<&str> = users
            .values()
            .filter_map(|user| user.farm_id.as_deref())
            .collect();

        info!("sunwatch started");
        info!("command interval: {}s", self.command_interval.as_secs());
        info!("farm polling interval: {}s", self.polling_interval.as_secs());
        if farms.is_empty() {
            info!("no registered farm found");
        } else {
            info!("loaded farms: {}", farms.join(", "));
        }

        let mut session = UpdateSession::resume(&users);
        if session.cursor().is_none() {
            self.telegram.skip_backlog(&mut session).await;
        }

        let mut last_scan: Option<Instant> = None;
        loop {
            run_guarded(self.run_iteration(&mut session, &mut last_scan)).await;
            time::sleep(self.command_interval).await;
        }
    }

    /// Runs one loop iteration: command drain, then a fleet scan if due.
    async fn run_iteration(&self, session: &mut UpdateSession, last_scan: &mut Option<Instant>) {
        let mut users = self.user_loader.load().await;

        let messages = self.telegram.get_updates(session).await;
        for message in &messages {
            let changed = handle_message(
                &self.commander,
                message,
                &mut users,
                &self.fetcher,
                &self.telegram,
                now_ms(),
            )
            .await;

            if changed {
                self.user_loader.persist(&users).await;
            }
        }

        if is_scan_due(*last_scan, self.polling_interval) {
            info!("starting scheduled farm scan");
            let sent = self
                .fleet
                .scan(
                    &mut users,
                    &self.fetcher,
                    &self.telegram,
                    &self.user_loader,
                    now_ms(),
                )
                .await;
            info!("farm scan finished, {} batches sent", sent);
            *last_scan = Some(Instant::now());
        }
    }
}

/// Runs one loop iteration, logging a panic instead of propagating it.
///
/// Returns `false` if the iteration panicked.
async fn run_guarded<F: Future<Output = ()>>(iteration: F) -> bool {
    match AssertUnwindSafe(iteration).catch_unwind().await {
        Ok(()) => true,
        Err(panic) => {
            error!("loop iteration panicked: {}", panic_message(panic.as_ref()));
            false
        }
    }
}

/// Whether a fleet scan must run: the first one runs at once, the next ones
/// once `polling_interval` has elapsed since the previous scan.
fn is_scan_due(last_scan: Option<Instant>, polling_interval: Duration) -> bool {
    last_scan.is_none_or(|scanned_at| scanned_at.elapsed() >= polling_interval)
}

/// Records `message` as the last handled update of its chat, if the chat is
/// registered.
fn stamp_update(users: &mut UsersMap, message: &IncomingMessage) -> bool {
    let Some(user) = users.get_mut(&message.chat_id) else {
        return false;
    };
    user.last_update_id = Some(message.update_id);
    true
}

/// Handles one incoming Telegram message.
///
/// Plain messages and commands for another bot are ignored. Invalid commands
/// are answered with an error message. A valid command is executed and a farm
/// registration is applied to the store. Answered commands stamp the chat's
/// `last_update_id` before the response is sent.
///
/// # Returns
///
/// `true` if the user store was modified and must be persisted.
async fn handle_message<S: SnapshotSource, M: MessageSink>(
    commander: &Commander,
    message: &IncomingMessage,
    users: &mut UsersMap,
    source: &S,
    sink: &M,
    now: i64,
) -> bool {
    let command = match commander.parse(&message.text) {
        Ok(command) => command,
        Err(CommandParseError::NotForBot) => return false,
        Err(CommandParseError::InvalidCommand(response)) => {
            let changed = stamp_update(users, message);
            sink.deliver(&message.chat_id, &response).await;
            return changed;
        }
    };

    info!("command from {}: {}", message.chat_id, message.text);

    let context = CommandContext {
        chat_id: message.chat_id.clone(),
        farm_id: users
            .get(&message.chat_id)
            .and_then(|user| user.farm_id.clone()),
        now,
    };
    let result = commander.parse_command(&command, &context, source).await;

    let mut changed = false;
    if let Some(farm_id) = &result.farm_to_register {
        users
            .entry(message.chat_id.clone())
            .or_default()
            .register_farm(farm_id);
        info!("chat {} registered farm {}", message.chat_id, farm_id);
        changed = true;
    }
    changed |= stamp_update(users, message);

    sink.deliver(&message.chat_id, &result.response).await;

    changed
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::{FarmSnapshot, MockSnapshotSource};
    use crate::telegram::MockMessageSink;
    use crate::users::UserRecord;

    const NOW: i64 = 1_700_000_000_000;

    fn create_message(update_id: i64, chat_id: &str, text: &str) -> IncomingMessage {
        IncomingMessage {
            update_id,
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        }
    }

    fn create_source_without_calls() -> MockSnapshotSource {
        let mut source = MockSnapshotSource::new();
        source.expect_fetch_farm_snapshot().times(0);
        source
    }

    #[tokio::test]
    async fn test_handle_setfarm_registers_and_stamps() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let source = create_source_without_calls();

        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, text: &str| chat == "42" && text.contains("23270"))
            .times(1)
            .returning(|_, _| true);

        let changed = handle_message(
            &commander,
            &create_message(7, "42", "/setfarm 23270"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(changed);
        assert_eq!(users["42"].farm_id.as_deref(), Some("23270"));
        assert_eq!(users["42"].last_update_id, Some(7));
    }

    #[tokio::test]
    async fn test_handle_setfarm_resets_flags() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let mut record = UserRecord::default();
        record.register_farm("1");
        record.flags.mark_notified("crops_ready");
        users.insert("42".to_string(), record);

        let source = create_source_without_calls();
        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(1).returning(|_, _| true);

        handle_message(
            &commander,
            &create_message(8, "42", "/setfarm 2"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert_eq!(users["42"].farm_id.as_deref(), Some("2"));
        assert!(users["42"].flags.is_empty());
    }

    #[tokio::test]
    async fn test_handle_plain_message_is_ignored() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let source = create_source_without_calls();
        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(0);

        let changed = handle_message(
            &commander,
            &create_message(1, "42", "hello there"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(!changed);
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_handle_unknown_command_answers() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let source = create_source_without_calls();

        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, text: &str| chat == "42" && text.contains("/help"))
            .times(1)
            .returning(|_, _| true);

        let changed = handle_message(
            &commander,
            &create_message(1, "42", "/dance"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(!changed);
    }

    #[tokio::test]
    async fn test_handle_invalid_command_stamps_registered_chat() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let mut record = UserRecord::default();
        record.register_farm("23270");
        record.last_update_id = Some(4);
        users.insert("42".to_string(), record);

        let source = create_source_without_calls();
        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, _text: &str| chat == "42")
            .times(1)
            .returning(|_, _| true);

        let changed = handle_message(
            &commander,
            &create_message(9, "42", "/setfarm abc"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(changed);
        assert_eq!(users["42"].last_update_id, Some(9));
        assert_eq!(users["42"].farm_id.as_deref(), Some("23270"));
    }

    #[tokio::test]
    async fn test_handle_status_uses_registered_farm() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let mut record = UserRecord::default();
        record.register_farm("23270");
        users.insert("42".to_string(), record);

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .with(mockall::predicate::eq("23270"))
            .times(1)
            .returning(|farm_id| {
                Ok(FarmSnapshot {
                    farm_id: farm_id.to_string(),
                    ..Default::default()
                })
            });

        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, text: &str| chat == "42" && text.contains("No crop plots"))
            .times(1)
            .returning(|_, _| true);

        let changed = handle_message(
            &commander,
            &create_message(12, "42", "/crops"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(changed);
        assert_eq!(users["42"].last_update_id, Some(12));
        assert!(users["42"].flags.is_empty());
    }

    #[tokio::test]
    async fn test_handle_help_from_unknown_chat_does_not_create_record() {
        let commander = Commander::new(None);
        let mut users = UsersMap::new();
        let source = create_source_without_calls();
        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(1).returning(|_, _| true);

        let changed = handle_message(
            &commander,
            &create_message(3, "99", "/help"),
            &mut users,
            &source,
            &sink,
            NOW,
        )
        .await;

        assert!(!changed);
        assert!(users.is_empty());
    }

    #[test]
    fn test_scan_due() {
        let interval = Duration::from_secs(300);

        assert!(is_scan_due(None, interval));
        assert!(!is_scan_due(Some(Instant::now()), interval));
        assert!(is_scan_due(Some(Instant::now()), Duration::ZERO));

        let Some(long_ago) = Instant::now().checked_sub(Duration::from_secs(301)) else {
            return;
        };
        assert!(is_scan_due(Some(long_ago), interval));
    }

    #[tokio::test]
    async fn test_run_guarded_recovers_from_panic() {
        let completed = run_guarded(async {
            panic!("scan exploded");
        })
        .await;
        assert!(!completed);

        let mut runs = 0;
        for _ in 0..2 {
            assert!(run_guarded(async { runs += 1 }).await);
        }
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(boxed.as_ref()), "owned boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(5);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
