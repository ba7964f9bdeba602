//! User store persistence.
//!
//! This module provides the [`UserLoader`] that reads and writes the whole
//! [`UsersMap`] as one JSON document.

use log::{debug, error, info, warn};
use tokio::fs;

use crate::users::UsersMap;

/// Loads and persists the user store.
///
/// Loading never fails: a missing or corrupt file yields an empty map, which
/// is equivalent to every user being unregistered.
///
/// # Examples
///
/// ```no_run
/// use sunwatch::users::UserLoader;
///
/// # async fn example() {
/// let loader = UserLoader::new("data/users.json".to_string());
/// let mut users = loader.load().await;
///
/// users.entry("1234".to_string()).or_default().register_farm("23270");
/// loader.persist(&users).await;
/// # }
/// ```
#[derive(Clone)]
pub struct UserLoader {
    /// Path to the JSON store
    path: String,
}

impl UserLoader {
    pub fn new(path: String) -> Self {
        UserLoader { path }
    }

    /// Reads the user store.
    ///
    /// # Error Handling
    ///
    /// - If the file doesn't exist: logs a warning and returns an empty map
    /// - If deserialization fails: logs an error and returns an empty map
    pub async fn load(&self) -> UsersMap {
        let Ok(serialized_users) = fs::read_to_string(&self.path).await else {
            warn!("no user store found at {}, starting with no users", self.path);
            return UsersMap::new();
        };

        let users: UsersMap = match serde_json::from_str(&serialized_users) {
            Ok(users) => users,
            Err(e) => {
                error!("failed to deserialize user store {}: {}", self.path, e);
                return UsersMap::new();
            }
        };

        debug!("loaded {} users from {}", users.len(), self.path);

        users
    }

    /// Writes the whole user store.
    ///
    /// Errors are logged and not propagated.
    pub async fn persist(&self, users: &UsersMap) {
        let serialized_users = match serde_json::to_string_pretty(users) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("failed to serialize user store: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, &serialized_users).await {
            error!("failed to persist user store {}: {}", self.path, e);
            return;
        }

        info!("persisted {} users", users.len());
    }
}
