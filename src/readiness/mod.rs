//! Readiness engine.
//!
//! Pure computations over a [`FarmSnapshot`](crate::farm::FarmSnapshot):
//!
//! - `time_format` - remaining / elapsed labels and local clock labels
//! - `calculator` - timestamp normalization and readiness timestamps
//! - `tracker` - exactly-once notification flags
//! - `scanner` - per-kind status lines and alerts
//! - `monitor` - alert batch of one farm
//! - `markdown` - message text
//!
//! Nothing in this module performs I/O; the current time is always passed in.

pub mod calculator;
pub mod markdown;
mod monitor;
mod scanner;
pub mod time_format;
mod tracker;

pub use crate::readiness::monitor::monitor_farm;
pub use crate::readiness::scanner::{IslandSchedule, PRE_EVENT_ALERT_MS, ReadinessScanner};
pub use crate::readiness::tracker::{
    CycleState, NotificationFlags, aggregate_key, beehive_key, island_pre_end_key,
    island_pre_start_key,
};
