//! Periodic monitoring of every registered farm.
//!
//! The [`FleetScheduler`] walks the user store one user at a time, fetches each
//! farm, runs the farm monitor and sends the resulting batch. Users are
//! processed sequentially with a fixed pause between fetches to respect the
//! upstream rate limits.

use std::time::Duration;

use log::{error, info};
use tokio::time;

use crate::{
    farm::SnapshotSource,
    readiness::{markdown::format_batch, monitor_farm},
    telegram::MessageSink,
    users::{UserLoader, UsersMap},
};

pub struct FleetScheduler {
    /// Pause between two farm fetches
    request_delay: Duration,
}

impl FleetScheduler {
    pub fn new(request_delay: Duration) -> Self {
        FleetScheduler { request_delay }
    }

    /// Scans every user with a registered farm.
    ///
    /// For each user: fetch the snapshot (failure skips the user for this
    /// cycle), compute the alert batch, send it if not empty, then persist the
    /// store so flag resets are durable even when nothing was sent.
    ///
    /// # Arguments
    ///
    /// * `users` - User store, flags are updated in place
    /// * `source` - Snapshot source
    /// * `sink` - Message sink
    /// * `loader` - Store persistence
    /// * `now` - Scan time, shared by every user of the cycle
    ///
    /// # Returns
    ///
    /// The number of batches sent.
    pub async fn scan<S: SnapshotSource, M: MessageSink>(
        &self,
        users: &mut UsersMap,
        source: &S,
        sink: &M,
        loader: &UserLoader,
        now: i64,
    ) -> usize {
        let farms: Vec<(String, String)> = users
            .iter()
            .filter_map(|(chat_id, user)| Some((chat_id.clone(), user.farm_id.clone()?)))
            .collect();

        if farms.is_empty() {
            info!("no registered farm to monitor");
            return 0;
        }

        let mut sent = 0;
        for (idx, (chat_id, farm_id)) in farms.iter().enumerate() {
            if idx > 0 {
                time::sleep(self.request_delay).await;
            }

            info!("checking farm {} for {}", farm_id, chat_id);

            let snapshot = match source.fetch_farm_snapshot(farm_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!("skipping farm {} this cycle: {}", farm_id, e);
                    continue;
                }
            };

            let Some(user) = users.get_mut(chat_id) else {
                continue;
            };
            let batch = monitor_farm(&snapshot, &mut user.flags, now);

            if !batch.is_empty() {
                if sink.deliver(chat_id, &format_batch(farm_id, &batch)).await {
                    info!("sent {} alerts to {} (farm {})", batch.len(), chat_id, farm_id);
                    sent += 1;
                } else {
                    error!("alerts for farm {} were not delivered to {}", farm_id, chat_id);
                }
            }

            loader.persist(users).await;
        }

        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::{FarmSnapshot, FetchError, InstanceKind, MockSnapshotSource, RawTimestamp, ResourceInstance};
    use crate::telegram::MockMessageSink;
    use crate::users::UserRecord;
    use tempfile::NamedTempFile;

    const BASE: i64 = 1_700_000_000_000;

    fn create_users() -> UsersMap {
        let mut users = UsersMap::new();
        let mut first = UserRecord::default();
        first.register_farm("1");
        let mut second = UserRecord::default();
        second.register_farm("2");
        users.insert("100".to_string(), first);
        users.insert("200".to_string(), second);
        users.insert("300".to_string(), UserRecord::default());
        users
    }

    fn create_ready_snapshot(farm_id: &str) -> FarmSnapshot {
        FarmSnapshot {
            farm_id: farm_id.to_string(),
            crops: vec![ResourceInstance {
                id: "1".to_string(),
                kind: InstanceKind::Crop,
                action_at: Some(RawTimestamp::Number(BASE as f64)),
                crop_name: Some("Sunflower".to_string()),
            }],
            ..Default::default()
        }
    }

    fn create_loader(temp_file: &NamedTempFile) -> UserLoader {
        UserLoader::new(temp_file.path().to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_scan_sends_batches_and_persists() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = create_loader(&temp_file);
        let mut users = create_users();

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .times(2)
            .returning(|farm_id| Ok(create_ready_snapshot(farm_id)));

        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, text: &str| chat == "100" && text.starts_with("📢 *Events on farm 1*"))
            .times(1)
            .returning(|_, _| true);
        sink.expect_deliver()
            .withf(|chat: &str, text: &str| chat == "200" && text.contains("crop is ready"))
            .times(1)
            .returning(|_, _| true);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        let sent = scheduler
            .scan(&mut users, &source, &sink, &loader, BASE + 60_000)
            .await;

        assert_eq!(sent, 2);
        assert!(!users["100"].flags.should_notify("crops_ready"));

        let persisted = loader.load().await;
        assert_eq!(persisted, users);
    }

    #[tokio::test]
    async fn test_scan_is_quiet_on_second_cycle() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = create_loader(&temp_file);
        let mut users = create_users();

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .times(4)
            .returning(|farm_id| Ok(create_ready_snapshot(farm_id)));

        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(2).returning(|_, _| true);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        assert_eq!(scheduler.scan(&mut users, &source, &sink, &loader, BASE + 60_000).await, 2);
        assert_eq!(scheduler.scan(&mut users, &source, &sink, &loader, BASE + 120_000).await, 0);
    }

    #[tokio::test]
    async fn test_scan_skips_failed_fetch() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = create_loader(&temp_file);
        let mut users = create_users();

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .with(mockall::predicate::eq("1"))
            .times(1)
            .returning(|_| Err(FetchError::Status(500)));
        source
            .expect_fetch_farm_snapshot()
            .with(mockall::predicate::eq("2"))
            .times(1)
            .returning(|farm_id| Ok(create_ready_snapshot(farm_id)));

        let mut sink = MockMessageSink::new();
        sink.expect_deliver()
            .withf(|chat: &str, _text: &str| chat == "200")
            .times(1)
            .returning(|_, _| true);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        let sent = scheduler
            .scan(&mut users, &source, &sink, &loader, BASE + 60_000)
            .await;

        assert_eq!(sent, 1);
        assert!(users["100"].flags.is_empty());
        assert!(!users["200"].flags.is_empty());
    }

    #[tokio::test]
    async fn test_scan_persists_resets_without_alerts() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = create_loader(&temp_file);
        let mut users = UsersMap::new();
        let mut record = UserRecord::default();
        record.register_farm("1");
        record.flags.mark_notified("crops_ready");
        users.insert("100".to_string(), record);

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .times(1)
            .returning(|farm_id| {
                Ok(FarmSnapshot {
                    farm_id: farm_id.to_string(),
                    ..Default::default()
                })
            });

        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(0);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        scheduler.scan(&mut users, &source, &sink, &loader, BASE).await;

        let persisted = loader.load().await;
        assert!(persisted["100"].flags.should_notify("crops_ready"));
    }

    #[tokio::test]
    async fn test_scan_without_farms() {
        let loader = UserLoader::new("unused_users.json".to_string());
        let mut users = UsersMap::new();
        users.insert("300".to_string(), UserRecord::default());

        let mut source = MockSnapshotSource::new();
        source.expect_fetch_farm_snapshot().times(0);
        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(0);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        assert_eq!(scheduler.scan(&mut users, &source, &sink, &loader, BASE).await, 0);
    }

    #[tokio::test]
    async fn test_scan_delivery_failure_keeps_flags_fired() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = create_loader(&temp_file);
        let mut users = UsersMap::new();
        let mut record = UserRecord::default();
        record.register_farm("1");
        users.insert("100".to_string(), record);

        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_farm_snapshot()
            .times(1)
            .returning(|farm_id| Ok(create_ready_snapshot(farm_id)));
        let mut sink = MockMessageSink::new();
        sink.expect_deliver().times(1).returning(|_, _| false);

        let scheduler = FleetScheduler::new(Duration::ZERO);
        let sent = scheduler
            .scan(&mut users, &source, &sink, &loader, BASE + 60_000)
            .await;

        assert_eq!(sent, 0);
        assert!(!users["100"].flags.should_notify("crops_ready"));
    }
}
