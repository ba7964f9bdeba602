//! Markdown text of status lines and alerts.
//!
//! Status lines are built on demand by the status commands, alert lines are
//! batched by the farm monitor. Both use Telegram's legacy Markdown dialect.

use crate::farm::{InstanceKind, ResourceInstance, ResourceKind};
use crate::readiness::time_format::{clock_label, day_label};

/// Display label of a timestamp-driven instance.
///
/// Crops show their type and plot, trees and stones an icon and their id.
pub fn format_instance_label(instance: &ResourceInstance) -> String {
    match instance.kind {
        InstanceKind::Crop => format!(
            "**{}** (plot #{})",
            instance.crop_name.as_deref().unwrap_or("?"),
            instance.id
        ),
        InstanceKind::Tree => format!("🌲 Tree #{}", instance.id),
        InstanceKind::Stone => format!("🪨 Stone #{}", instance.id),
    }
}

/// Status line of an instance that is still growing.
pub fn format_pending_line(instance: &ResourceInstance, remaining: &str) -> String {
    format!("{}: ready in **{}**", format_instance_label(instance), remaining)
}

/// Status line of an instance that is ready.
pub fn format_ready_line(instance: &ResourceInstance, ready_marker: &str, elapsed: &str) -> String {
    format!(
        "{}: {} ready since {}",
        format_instance_label(instance),
        ready_marker,
        elapsed
    )
}

fn format_swarm(swarm: bool) -> &'static str {
    if swarm { "YES" } else { "NO" }
}

/// Status block of a hive that is still producing.
pub fn format_beehive_producing(hive_id: &str, remaining: &str, swarm: bool) -> String {
    format!(
        "🐝 *Beehive #{}*\n Production: finishes in **{}**\n Swarm: **{}**",
        hive_id,
        remaining,
        format_swarm(swarm)
    )
}

/// Status block of a hive whose production is finished.
pub fn format_beehive_finished(hive_id: &str, swarm: bool) -> String {
    format!(
        "🐝 *Beehive #{}*\n Production: **finished!**\n Swarm: **{}**",
        hive_id,
        format_swarm(swarm)
    )
}

/// Aggregate "ready" alert of a resource kind.
///
/// Wording switches between singular and plural on `count`. Returns `None`
/// for beehives, which only have per-hive alerts.
///
/// # Examples
///
/// ```
/// # use sunwatch::readiness::markdown::format_ready_alert;
/// # use sunwatch::farm::ResourceKind;
/// let alert = format_ready_alert(ResourceKind::Crop, 1).unwrap();
/// assert!(alert.contains("crop is ready"));
/// ```
pub fn format_ready_alert(kind: ResourceKind, count: usize) -> Option<String> {
    let single = count == 1;
    let alert = match kind {
        ResourceKind::Crop if single => "🥕 Harvest ready! **1** crop is ready.".to_owned(),
        ResourceKind::Crop => format!("🥕 Harvest ready! **{}** crops are ready.", count),
        ResourceKind::Tree if single => "🌲 Chop ready! **1** tree is ready to be chopped.".to_owned(),
        ResourceKind::Tree => format!("🌲 Chop ready! **{}** trees are ready to be chopped.", count),
        ResourceKind::Stone if single => "🪨 Mine ready! **1** stone is ready to be mined.".to_owned(),
        ResourceKind::Stone => format!("🪨 Mine ready! **{}** stones are ready to be mined.", count),
        ResourceKind::Beehive => return None,
    };
    Some(alert)
}

/// Alert sent once when a hive finishes producing.
pub fn format_beehive_alert(hive_id: &str, swarm: bool) -> String {
    format!(
        "✅ Beehive #{} production finished! Swarm: **{}**",
        hive_id,
        format_swarm(swarm)
    )
}

/// Alert sent once, five minutes before an island event opens.
pub fn format_island_opening_alert(start_at: i64, end_at: i64) -> String {
    format!(
        "🏝️ Floating Island opens in 5 minutes! ({} - {})",
        clock_label(start_at),
        clock_label(end_at)
    )
}

/// Alert sent once, five minutes before an island event closes.
pub fn format_island_closing_alert() -> String {
    "⚠️ Floating Island closes in 5 minutes!".to_owned()
}

/// Schedule block of one island event.
///
/// `countdown` is the last line, e.g. "Starts in: 01h 00m 00s".
pub fn format_island_event(start_at: i64, end_at: i64, countdown: &str) -> String {
    format!(
        "• {}\n  Time: {} - {}\n  {}",
        day_label(start_at),
        clock_label(start_at),
        clock_label(end_at),
        countdown
    )
}

/// Full message of one monitoring cycle for a farm.
pub fn format_batch(farm_id: &str, alerts: &[String]) -> String {
    format!("📢 *Events on farm {}* 📢\n\n{}", farm_id, alerts.join("\n"))
}
