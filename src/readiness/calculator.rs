//! Readiness timestamps of farm resources.
//!
//! Readiness only depends on the action timestamp and the base duration of the
//! resource type. Boosts and other modifiers sent by the API are not read.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use log::debug;

use crate::farm::{Beehive, InstanceKind, RawTimestamp, ResourceInstance, ResourceKind};

/// Numeric timestamps at or above this value are milliseconds, below it seconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

/// Latest instant representable by a calendar date, in milliseconds.
const MAX_TIMESTAMP_MS: f64 = 8.64e15;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Time for a chopped tree to grow back.
pub const TREE_REGROWTH_MS: i64 = 2 * HOUR_MS;
/// Time for a mined stone to respawn.
pub const STONE_RESPAWN_MS: i64 = 4 * HOUR_MS;

/// Base growth time of every crop type.
const CROP_BASE_TIMES_MS: [(&str, i64); 23] = [
    ("Sunflower", MINUTE_MS),
    ("Potato", 5 * MINUTE_MS),
    ("Rhubarb", 10 * MINUTE_MS),
    ("Pumpkin", 30 * MINUTE_MS),
    ("Zucchini", 30 * MINUTE_MS),
    ("Carrot", HOUR_MS),
    ("Yam", HOUR_MS),
    ("Cabbage", 2 * HOUR_MS),
    ("Broccoli", 2 * HOUR_MS),
    ("Soybean", 3 * HOUR_MS),
    ("Beetroot", 4 * HOUR_MS),
    ("Pepper", 4 * HOUR_MS),
    ("Cauliflower", 8 * HOUR_MS),
    ("Parsnip", 12 * HOUR_MS),
    ("Eggplant", 16 * HOUR_MS),
    ("Corn", 20 * HOUR_MS),
    ("Onion", 20 * HOUR_MS),
    ("Radish", 24 * HOUR_MS),
    ("Wheat", 24 * HOUR_MS),
    ("Turnip", 24 * HOUR_MS),
    ("Kale", 36 * HOUR_MS),
    ("Artichoke", 36 * HOUR_MS),
    ("Barley", 48 * HOUR_MS),
];

/// Converts any timestamp format sent by the API into milliseconds since epoch.
///
/// - numbers `>= MILLIS_THRESHOLD` are already milliseconds
/// - smaller numbers are seconds
/// - strings are ISO-8601; without an offset they are read as local time
///
/// Returns `None` when the value cannot be interpreted or lies outside
/// `0..=MAX_TIMESTAMP_MS`.
pub fn normalize_timestamp(raw: &RawTimestamp) -> Option<i64> {
    match raw {
        RawTimestamp::Number(value) => {
            let millis = if *value >= MILLIS_THRESHOLD {
                *value
            } else {
                *value * 1000.0
            };
            (0.0..=MAX_TIMESTAMP_MS)
                .contains(&millis)
                .then_some(millis as i64)
        }
        RawTimestamp::Text(text) => parse_iso_timestamp(text),
        _ => None,
    }
}

/// A trailing `Z` is dropped, so only an explicit numeric offset is honored.
fn parse_iso_timestamp(text: &str) -> Option<i64> {
    let trimmed = text.trim_end_matches('Z');
    if let Ok(time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(time.timestamp_millis());
    }

    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|time| time.timestamp_millis())
}

/// Base growth time of a crop type, `None` for unknown types.
pub fn crop_base_duration(name: &str) -> Option<i64> {
    CROP_BASE_TIMES_MS
        .iter()
        .find(|(crop, _)| *crop == name)
        .map(|(_, duration)| *duration)
}

/// Base cycle duration of a timestamp-driven resource.
///
/// Beehives are not table-driven, see [`beehive_ready_at`].
pub fn base_duration(kind: InstanceKind, crop_name: Option<&str>) -> Option<i64> {
    match kind {
        InstanceKind::Crop => crop_name.and_then(crop_base_duration),
        InstanceKind::Tree => Some(TREE_REGROWTH_MS),
        InstanceKind::Stone => Some(STONE_RESPAWN_MS),
    }
}

/// Readiness timestamp of an instance.
///
/// `None` means the instance has no active cycle and must be skipped: missing,
/// zero or out of range timestamp, or unknown type. The API sends `0` for
/// resources that were never used.
pub fn ready_at(instance: &ResourceInstance) -> Option<i64> {
    let action_at = normalize_timestamp(instance.action_at.as_ref()?).filter(|at| *at > 0)?;
    let Some(duration) = base_duration(instance.kind, instance.crop_name.as_deref()) else {
        debug!(
            "no base duration for {} #{} ({:?})",
            ResourceKind::from(instance.kind).plural(),
            instance.id,
            instance.crop_name
        );
        return None;
    };

    action_at.checked_add(duration)
}

/// Time at which the hive's honey production finishes.
///
/// This is the latest `attachedUntil` of its flowers. A hive without flowers
/// yields 0 and is therefore always reported as finished.
pub fn beehive_ready_at(hive: &Beehive) -> i64 {
    hive.flowers_attached_until
        .iter()
        .filter_map(normalize_timestamp)
        .max()
        .unwrap_or(0)
}
