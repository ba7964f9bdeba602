//! Sunflower Land farm integration and API client.
//!
//! This module provides integration with the Sunflower Land community API,
//! handling API communication and conversion of the raw farm state into
//! snapshots the readiness engine can scan.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the community API
//! - `response_structs` - Internal data structures for API responses
//! - `structs` - Public data structures representing a farm snapshot
//! - `fetcher` - Conversion of API responses into snapshots
//!
//! # Examples
//!
//! ```no_run
//! use sunwatch::farm::{FarmFetcher, FarmRequester, SnapshotSource};
//!
//! let requester = FarmRequester::new("https://api.sunflower-land.com", "sfl.key", Duration::from_secs(10))?;
//! let fetcher = FarmFetcher::new(requester);
//! let snapshot = fetcher.fetch_farm_snapshot("23270").await?;
//! ```

mod fetcher;
mod requester;
mod response_structs;
mod structs;

use mockall::automock;
use thiserror::Error;

pub use crate::farm::fetcher::FarmFetcher;
pub use crate::farm::requester::FarmRequester;
pub use crate::farm::structs::{
    Beehive, FarmSnapshot, InstanceKind, IslandEvent, RawTimestamp, ResourceInstance, ResourceKind,
};

/// Errors that can occur while fetching a farm.
///
/// Every variant is transient from the bot's point of view: the farm is
/// skipped for the current cycle and retried on the next one.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or undecodable body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status code.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Source of farm snapshots.
///
/// Implemented by [`FarmFetcher`]; mocked in tests of the commands and of the
/// fleet scheduler.
#[automock]
pub trait SnapshotSource {
    /// Fetches a fresh snapshot of the given farm.
    async fn fetch_farm_snapshot(&self, farm_id: &str) -> Result<FarmSnapshot, FetchError>;
}
