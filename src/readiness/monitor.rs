//! Alert batching for one farm.

use crate::farm::{FarmSnapshot, ResourceKind};
use crate::readiness::{NotificationFlags, ReadinessScanner};

/// Runs every scanner in alert mode and returns the batch of alert lines.
///
/// Lines are ordered beehives, crops, trees, stones, floating island. An empty
/// batch means nothing has to be sent.
pub fn monitor_farm(snapshot: &FarmSnapshot, flags: &mut NotificationFlags, now: i64) -> Vec<String> {
    let scanner = ReadinessScanner::new(snapshot, now);

    let mut batch = scanner.beehive_alerts(flags);
    for kind in [ResourceKind::Crop, ResourceKind::Tree, ResourceKind::Stone] {
        batch.extend(scanner.alerts(kind, flags));
    }
    batch.extend(scanner.island_alerts(flags));

    batch
}
