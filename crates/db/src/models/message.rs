//! Message entity model and DTOs.

use bureau_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat message row from the append-only `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub customer_id: DbId,
    pub is_from_admin: bool,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for sending a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub subject: Option<String>,
    pub body: String,
}
