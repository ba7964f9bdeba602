use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::readiness::NotificationFlags;

/// Registered users keyed by their chat id.
pub type UsersMap = BTreeMap<String, UserRecord>;

/// A chat registered with the bot.
///
/// Every field has a default so that records written by older versions, or
/// partially edited by hand, still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Sunflower Land farm monitored for this chat
    #[serde(default)]
    pub farm_id: Option<String>,
    /// Notification cycle states of this chat
    #[serde(default)]
    pub flags: NotificationFlags,
    /// Last inbound update handled for this chat
    #[serde(default)]
    pub last_update_id: Option<i64>,
}

impl UserRecord {
    /// Points the record to `farm_id` and starts a fresh notification cycle.
    pub fn register_farm(&mut self, farm_id: &str) {
        self.farm_id = Some(farm_id.to_owned());
        self.flags = NotificationFlags::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_farm_clears_flags() {
        let mut record = UserRecord {
            farm_id: Some("1".to_owned()),
            ..Default::default()
        };
        record.flags.mark_notified("crops_ready");

        record.register_farm("2");

        assert_eq!(record.farm_id.as_deref(), Some("2"));
        assert!(record.flags.is_empty());
    }

    #[test]
    fn test_deserialize_partial_record() {
        let record: UserRecord = serde_json::from_str(r#"{"farm_id": "23270"}"#).unwrap();

        assert_eq!(record.farm_id.as_deref(), Some("23270"));
        assert!(record.flags.is_empty());
        assert_eq!(record.last_update_id, None);
    }
}
