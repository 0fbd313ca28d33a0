//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Maximum page size for any paginated listing.
pub const MAX_LIMIT: i64 = 100;

/// Default page size for paginated listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by any handler that supports paginated listing.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Effective limit, defaulted and capped.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
