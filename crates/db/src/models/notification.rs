//! Notification entity model and DTOs.

use bureau_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub customer_id: DbId,
    /// One of `quote_status`, `message`, `project_update`, `billing`,
    /// `invoice`, `system`.
    pub kind: String,
    /// One of `low`, `normal`, `high`.
    pub priority: String,
    pub title: String,
    pub body: Option<String>,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub customer_id: DbId,
    pub kind: String,
    /// Defaults to `"normal"` when omitted.
    pub priority: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub action_url: Option<String>,
}
