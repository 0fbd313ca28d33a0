//! Payment entity model and DTOs.

use bureau_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A payment row from the append-only `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub invoice_id: DbId,
    pub customer_id: DbId,
    pub amount: Money,
    /// `"deposit"` or `"remaining"`.
    pub payment_type: String,
    /// Always `"simulated"` -- no gateway integration.
    pub payment_method: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for recording a simulated payment against an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPayment {
    pub invoice_id: DbId,
    pub customer_id: DbId,
    pub amount: Money,
    /// `"deposit"` or `"remaining"`.
    pub payment_type: String,
}
