//! Invoice entity model and DTOs.

use bureau_core::status::StatusId;
use bureau_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An invoice row from the `invoices` table.
///
/// Invariant (DB-checked): when `deposit_required` is true,
/// `amount = deposit_amount + remaining_amount`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    /// Display number (`INV-<year>-<seq>`), derived from `id` at insert.
    pub invoice_number: Option<String>,
    pub customer_id: DbId,
    pub quote_id: Option<DbId>,
    pub project_id: Option<DbId>,
    /// Total amount, always the sum of `line_items[].total`.
    pub amount: Money,
    pub deposit_required: bool,
    pub deposit_amount: Money,
    pub remaining_amount: Money,
    pub deposit_paid: bool,
    pub status_id: StatusId,
    pub due_date: Option<NaiveDate>,
    pub line_items: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an invoice from line items.
///
/// There is intentionally no `amount` field: the total is derived from the
/// line items at write time.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub customer_id: DbId,
    pub quote_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub line_items: Vec<bureau_core::billing::LineItem>,
    /// Defaults to true; when false the full amount is billed as remaining.
    pub deposit_required: Option<bool>,
    pub due_date: Option<NaiveDate>,
}
