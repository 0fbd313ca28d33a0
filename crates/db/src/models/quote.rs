//! Quote entity model and DTOs.

use bureau_core::status::StatusId;
use bureau_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A quote row from the `quotes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quote {
    pub id: DbId,
    /// Display reference (`QT-<year>-<seq>`), derived from `id` at insert.
    pub reference: Option<String>,
    pub customer_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub company: Option<String>,
    pub description: String,
    pub estimated_cost: Money,
    pub estimated_timeline: Option<String>,
    pub selected_package: Option<serde_json::Value>,
    pub rush_delivery: String,
    pub status_id: StatusId,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a quote from the public submission form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuote {
    pub customer_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub company: Option<String>,
    pub description: String,
    pub estimated_cost: Money,
    pub estimated_timeline: Option<String>,
    pub selected_package: Option<serde_json::Value>,
    /// Defaults to `"none"` when omitted.
    pub rush_delivery: Option<String>,
}
