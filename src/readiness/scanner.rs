//! Per-kind readiness scanning.
//!
//! A [`ReadinessScanner`] looks at one snapshot at one instant. It either renders
//! status lines for on-demand queries, or computes alert lines for the periodic
//! monitor, driving the [`NotificationFlags`] automaton on the way.

use log::debug;

use crate::farm::{FarmSnapshot, IslandEvent, ResourceKind};
use crate::readiness::{
    calculator::{beehive_ready_at, normalize_timestamp, ready_at},
    markdown::{
        format_beehive_alert, format_beehive_finished, format_beehive_producing,
        format_island_closing_alert, format_island_event, format_island_opening_alert,
        format_pending_line, format_ready_alert, format_ready_line,
    },
    time_format::{READY_MARKER, elapsed_label, remaining_label},
    tracker::{NotificationFlags, aggregate_key, beehive_key, island_pre_end_key, island_pre_start_key},
};

/// Lead time of the floating island "opens soon" and "closes soon" alerts.
pub const PRE_EVENT_ALERT_MS: i64 = 5 * 60 * 1000;

/// Floating island schedule split by event phase. Past events are dropped.
#[derive(Debug, Default, PartialEq)]
pub struct IslandSchedule {
    /// Events open right now, with the time left until they close
    pub current: Vec<String>,
    /// Events not open yet, with the time left until they open
    pub upcoming: Vec<String>,
}

impl IslandSchedule {
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.upcoming.is_empty()
    }
}

/// Scans one snapshot at a fixed instant.
///
/// # Examples
///
/// ```no_run
/// let scanner = ReadinessScanner::new(&snapshot, now_ms());
/// let lines = scanner.status(ResourceKind::Crop);
/// let alerts = scanner.alerts(ResourceKind::Crop, &mut record.flags);
/// ```
pub struct ReadinessScanner<'a> {
    snapshot: &'a FarmSnapshot,
    now: i64,
}

impl<'a> ReadinessScanner<'a> {
    pub fn new(snapshot: &'a FarmSnapshot, now: i64) -> Self {
        ReadinessScanner { snapshot, now }
    }

    /// Number of instances of `kind` whose readiness is `<= now`.
    ///
    /// Instances with an unknown readiness are not counted.
    pub fn ready_count(&self, kind: ResourceKind) -> usize {
        if kind == ResourceKind::Beehive {
            return self
                .snapshot
                .beehives
                .iter()
                .filter(|hive| beehive_ready_at(hive) <= self.now)
                .count();
        }

        self.snapshot
            .instances(kind)
            .iter()
            .filter_map(ready_at)
            .filter(|ready_at| *ready_at <= self.now)
            .count()
    }

    /// One status line per instance of `kind`, in snapshot order.
    ///
    /// Instances without an active cycle are skipped, so an empty result means
    /// nothing is growing.
    pub fn status(&self, kind: ResourceKind) -> Vec<String> {
        if kind == ResourceKind::Beehive {
            return self.beehive_status();
        }

        self.snapshot
            .instances(kind)
            .iter()
            .filter_map(|instance| {
                let Some(ready_at) = ready_at(instance) else {
                    debug!("{} #{} has no active cycle", kind.plural(), instance.id);
                    return None;
                };
                debug!("{} #{} ready at {} (now {})", kind.plural(), instance.id, ready_at, self.now);

                let line = if ready_at <= self.now {
                    format_ready_line(instance, READY_MARKER, &elapsed_label(ready_at, self.now))
                } else {
                    format_pending_line(instance, &remaining_label(self.now, ready_at))
                };
                Some(line)
            })
            .collect()
    }

    /// Aggregate alert of `kind`, at most one line.
    ///
    /// Fires once when at least one instance is ready, re-arms when a scan sees
    /// none ready.
    pub fn alerts(&self, kind: ResourceKind, flags: &mut NotificationFlags) -> Vec<String> {
        if kind == ResourceKind::Beehive {
            return self.beehive_alerts(flags);
        }

        let key = aggregate_key(kind);
        let count = self.ready_count(kind);
        debug!("farm {}: {} {} ready", self.snapshot.farm_id, count, kind.plural());

        if count == 0 {
            flags.reset_if_not_ready(&key);
            return vec![];
        }

        if !flags.try_fire(&key) {
            return vec![];
        }

        format_ready_alert(kind, count).into_iter().collect()
    }

    /// One status block per hive.
    pub fn beehive_status(&self) -> Vec<String> {
        self.snapshot
            .beehives
            .iter()
            .map(|hive| {
                let ready_at = beehive_ready_at(hive);
                if ready_at > self.now {
                    format_beehive_producing(&hive.id, &remaining_label(self.now, ready_at), hive.swarm)
                } else {
                    format_beehive_finished(&hive.id, hive.swarm)
                }
            })
            .collect()
    }

    /// "Production finished" alerts, one per hive and per production cycle.
    ///
    /// A hive seen producing re-arms its key, so the next finished production
    /// alerts again.
    pub fn beehive_alerts(&self, flags: &mut NotificationFlags) -> Vec<String> {
        let mut alerts = vec![];

        for hive in &self.snapshot.beehives {
            let key = beehive_key(&hive.id);
            if beehive_ready_at(hive) > self.now {
                flags.reset_if_not_ready(&key);
            } else if flags.try_fire(&key) {
                alerts.push(format_beehive_alert(&hive.id, hive.swarm));
            }
        }

        alerts
    }

    /// Island events with both bounds resolved, in schedule order.
    fn island_events(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.snapshot
            .floating_island
            .iter()
            .filter_map(|event: &IslandEvent| {
                let start_at = normalize_timestamp(event.start_at.as_ref()?)?;
                let end_at = normalize_timestamp(event.end_at.as_ref()?)?;
                (start_at > 0 && end_at > 0).then_some((start_at, end_at))
            })
    }

    /// Floating island schedule relative to now.
    pub fn island_status(&self) -> IslandSchedule {
        let mut schedule = IslandSchedule::default();

        for (start_at, end_at) in self.island_events() {
            if self.now < start_at {
                let countdown = format!("Starts in: {}", remaining_label(self.now, start_at));
                schedule.upcoming.push(format_island_event(start_at, end_at, &countdown));
            } else if self.now < end_at {
                let countdown = format!("**ONGOING!** Ends in: {}", remaining_label(self.now, end_at));
                schedule.current.push(format_island_event(start_at, end_at, &countdown));
            }
        }

        schedule
    }

    /// "Opens soon" and "closes soon" alerts.
    ///
    /// Each fires once when its bound is at most [`PRE_EVENT_ALERT_MS`] ahead,
    /// keyed by the bound itself.
    pub fn island_alerts(&self, flags: &mut NotificationFlags) -> Vec<String> {
        let mut alerts = vec![];
        let is_soon = |at: i64| {
            let until = at - self.now;
            until > 0 && until <= PRE_EVENT_ALERT_MS
        };

        for (start_at, end_at) in self.island_events() {
            if is_soon(start_at) && flags.try_fire(&island_pre_start_key(start_at)) {
                alerts.push(format_island_opening_alert(start_at, end_at));
            }
            if is_soon(end_at) && flags.try_fire(&island_pre_end_key(end_at)) {
                alerts.push(format_island_closing_alert());
            }
        }

        alerts
    }
}
