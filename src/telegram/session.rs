//! Inbound update cursor.

use crate::users::UsersMap;

/// Position of the bot in the Telegram update stream.
///
/// Owned by the bot loop and passed by `&mut` to every poll, so the cursor
/// only moves forward.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateSession {
    /// Highest update id seen so far
    cursor: Option<i64>,
}

impl UpdateSession {
    pub fn new(cursor: Option<i64>) -> Self {
        UpdateSession { cursor }
    }

    /// Resumes after the most recent update stamped on any user.
    pub fn resume(users: &UsersMap) -> Self {
        UpdateSession {
            cursor: users.values().filter_map(|user| user.last_update_id).max(),
        }
    }

    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    /// `offset` parameter of the next `getUpdates` call.
    pub fn offset(&self) -> Option<i64> {
        self.cursor.map(|cursor| cursor + 1)
    }

    /// Moves the cursor to `update_id` unless it is already past it.
    pub fn advance(&mut self, update_id: i64) {
        if self.cursor.is_none_or(|cursor| update_id > cursor) {
            self.cursor = Some(update_id);
        }
    }
}
