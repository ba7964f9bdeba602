//! Internal data structures for representing one farm snapshot.
//!
//! This module defines the point-in-time view of a Sunflower Land farm that the
//! readiness engine works on. A snapshot is built once per fetch and never mutated.

use std::fmt;

use serde::Deserialize;

/// A timestamp exactly as the farm API sent it.
///
/// The API is inconsistent: the same field can hold seconds, milliseconds or an
/// ISO-8601 string depending on the resource. Anything else is kept so that
/// deserialization never fails on a single malformed field.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Seconds or milliseconds since epoch
    Number(f64),
    /// ISO-8601 timestamp
    Text(String),
    /// Unusable value, treated as "no active cycle"
    Other(serde_json::Value),
}

/// Renewable resource kinds tracked by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Crop,
    Tree,
    Stone,
    Beehive,
}

impl ResourceKind {
    /// Plural name used in cycle keys and logs.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Crop => "crops",
            ResourceKind::Tree => "trees",
            ResourceKind::Stone => "stones",
            ResourceKind::Beehive => "beehives",
        }
    }
}

/// Kinds of the timestamp-driven resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    Crop,
    Tree,
    Stone,
}

impl From<InstanceKind> for ResourceKind {
    fn from(kind: InstanceKind) -> Self {
        match kind {
            InstanceKind::Crop => ResourceKind::Crop,
            InstanceKind::Tree => ResourceKind::Tree,
            InstanceKind::Stone => ResourceKind::Stone,
        }
    }
}

/// One crop plot, tree or stone.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    /// Instance id, unique within its collection
    pub id: String,
    /// Kind of the resource
    pub kind: InstanceKind,
    /// Last planted / chopped / mined timestamp, `None` when no cycle is running
    pub action_at: Option<RawTimestamp>,
    /// Crop type name, only set for planted crop plots
    pub crop_name: Option<String>,
}

/// A beehive with the flowers currently attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Beehive {
    /// Hive id
    pub id: String,
    /// Whether a swarm is active
    pub swarm: bool,
    /// `attachedUntil` of every flower feeding the hive
    pub flowers_attached_until: Vec<RawTimestamp>,
}

/// One scheduled floating island opening.
#[derive(Debug, Clone, PartialEq)]
pub struct IslandEvent {
    pub start_at: Option<RawTimestamp>,
    pub end_at: Option<RawTimestamp>,
}

/// Immutable state of one farm, as returned by one fetch.
///
/// Collections keep the order in which the API listed the instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmSnapshot {
    /// Farm identifier the snapshot was fetched for
    pub farm_id: String,
    /// Crop plots, planted or not
    pub crops: Vec<ResourceInstance>,
    pub trees: Vec<ResourceInstance>,
    pub stones: Vec<ResourceInstance>,
    pub beehives: Vec<Beehive>,
    /// Floating island schedule
    pub floating_island: Vec<IslandEvent>,
}

impl FarmSnapshot {
    /// Returns the instances of a timestamp-driven kind.
    ///
    /// Beehives are not timestamp-driven and live in [`FarmSnapshot::beehives`],
    /// so they yield an empty slice here.
    pub fn instances(&self, kind: ResourceKind) -> &[ResourceInstance] {
        match kind {
            ResourceKind::Crop => &self.crops,
            ResourceKind::Tree => &self.trees,
            ResourceKind::Stone => &self.stones,
            ResourceKind::Beehive => &[],
        }
    }
}

impl fmt::Display for FarmSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "farm_id={}, crops={}, trees={}, stones={}, beehives={}, island_events={}",
            self.farm_id,
            self.crops.len(),
            self.trees.len(),
            self.stones.len(),
            self.beehives.len(),
            self.floating_island.len()
        )
    }
}
