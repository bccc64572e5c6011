//! Identifier helpers for local-origin records.
//!
//! Remote ids are opaque backend-assigned strings. Records created on this
//! client and persisted only in local storage carry a generated id of the
//! form `local_<unix-millis>`, which cannot collide with remote ids.

use chrono::Utc;

/// Prefix marking a record as local-origin.
pub const LOCAL_ID_PREFIX: &str = "local_";

/// Generate a fresh local-origin id from the current time.
#[must_use]
pub fn local_id() -> String {
    format!("{}{}", LOCAL_ID_PREFIX, Utc::now().timestamp_millis())
}

/// True if the id denotes a local-origin record.
#[must_use]
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}
