//! Store-level error taxonomy.
//!
//! Every operation on the three stores returns a distinguishable failure
//! kind, never an opaque error. Remote failures on read paths that have a
//! local fallback are swallowed inside the catalog store and converted to
//! "use local data"; remote failures on write paths always surface here.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Failures surfaced by the session, catalog, and cart stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote source rejected the call or was unreachable.
    #[error("remote error: {0}")]
    Remote(#[from] ApiError),

    /// Local persistence failed; the operation was aborted before any
    /// in-memory state was committed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Mutation attempted against the pinned default category.
    #[error("category '{0}' is protected and cannot be modified")]
    ProtectedCategory(String),

    /// Update or delete against an id that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Refresh attempted with no stored refresh token.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// Cart quantity below the minimum of 1.
    #[error("invalid cart quantity: {0} (minimum is 1)")]
    InvalidQuantity(u32),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::ProtectedCategory("default_electronics".to_string());
        assert_eq!(
            err.to_string(),
            "category 'default_electronics' is protected and cannot be modified"
        );

        let err = StoreError::NoRefreshToken;
        assert_eq!(err.to_string(), "no refresh token available");

        let err = StoreError::InvalidQuantity(0);
        assert_eq!(err.to_string(), "invalid cart quantity: 0 (minimum is 1)");
    }
}
