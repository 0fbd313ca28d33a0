//! Custom quote request entity model and DTOs.

use bureau_core::status::StatusId;
use bureau_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `custom_quote_requests` table.
///
/// A scoping request that precedes a formal quote. On approval the formal
/// quote, project, and invoice are created in the same transaction that
/// marks the request approved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomQuoteRequest {
    pub id: DbId,
    pub customer_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub company: Option<String>,
    pub description: String,
    /// Price attached by the admin at approval time.
    pub final_quote: Option<Money>,
    pub status_id: StatusId,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a custom quote request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomQuoteRequest {
    pub customer_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub company: Option<String>,
    pub description: String,
}
