//! Registered users and their notification state.
//!
//! - [`UserRecord`]: farm id, notification flags and update cursor of one chat
//! - [`UserLoader`]: whole-store JSON persistence
//!
//! The store is a single JSON object keyed by chat id:
//!
//! ```json
//! {
//!   "1234": {
//!     "farm_id": "23270",
//!     "flags": { "crops_ready": "fired", "trees_ready": "armed" },
//!     "last_update_id": 815
//!   }
//! }
//! ```

mod user_loader;
mod user_record;

pub use crate::users::user_loader::UserLoader;
pub use crate::users::user_record::{UserRecord, UsersMap};
