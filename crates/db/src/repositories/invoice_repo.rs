//! Repository for the `invoices` table.

use bureau_core::billing::{self, LineItem};
use bureau_core::status::InvoiceStatus;
use bureau_core::types::{DbId, Money};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::invoice::{CreateInvoice, Invoice};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, invoice_number, customer_id, quote_id, project_id, amount, \
                       deposit_required, deposit_amount, remaining_amount, deposit_paid, \
                       status_id, due_date, line_items, created_at, updated_at";

/// Provides CRUD operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert an invoice inside an existing transaction and stamp its
    /// display number (`INV-<year>-<seq>`) from the generated id.
    ///
    /// `amount` is the sum of the line item totals -- callers validate the
    /// items with [`billing::invoice_total`] beforehand. The deposit split
    /// is derived here so the stored figures always satisfy
    /// `amount = deposit_amount + remaining_amount`.
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        customer_id: DbId,
        quote_id: Option<DbId>,
        project_id: Option<DbId>,
        items: &[LineItem],
        deposit_required: bool,
        due_date: Option<NaiveDate>,
    ) -> Result<Invoice, sqlx::Error> {
        let amount: Money = items.iter().map(|item| item.total).sum::<Decimal>().round_dp(2);
        let (deposit_amount, remaining_amount) = if deposit_required {
            let split = billing::split_deposit(amount);
            (split.deposit, split.remaining)
        } else {
            (Decimal::ZERO, amount)
        };
        let line_items =
            serde_json::to_value(items).unwrap_or_else(|_| serde_json::Value::Array(vec![]));

        let query = format!(
            "INSERT INTO invoices
                (customer_id, quote_id, project_id, amount, deposit_required,
                 deposit_amount, remaining_amount, due_date, line_items)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Invoice>(&query)
            .bind(customer_id)
            .bind(quote_id)
            .bind(project_id)
            .bind(amount)
            .bind(deposit_required)
            .bind(deposit_amount)
            .bind(remaining_amount)
            .bind(due_date)
            .bind(&line_items)
            .fetch_one(&mut **tx)
            .await?;

        let number = billing::invoice_number(inserted.created_at.year(), inserted.id);
        let query =
            format!("UPDATE invoices SET invoice_number = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(inserted.id)
            .bind(&number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Create an invoice from validated line items.
    pub async fn create(pool: &PgPool, input: &CreateInvoice) -> Result<Invoice, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let invoice = Self::create_in_tx(
            &mut tx,
            input.customer_id,
            input.quote_id,
            input.project_id,
            &input.line_items,
            input.deposit_required.unwrap_or(true),
            input.due_date,
        )
        .await?;
        tx.commit().await?;
        Ok(invoice)
    }

    /// Find an invoice by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all invoices, most recently created first. Optionally filtered
    /// by customer.
    pub async fn list(
        pool: &PgPool,
        customer_id: Option<DbId>,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices \
             WHERE ($1::BIGINT IS NULL OR customer_id = $1) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// List a customer's invoices, most recently created first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        Self::list(pool, Some(customer_id)).await
    }

    /// Resolve the invoice a customer should pay next: the oldest invoice
    /// that is neither paid nor cancelled and whose deposit is still
    /// outstanding (FIFO dunning). Ties on `created_at` break by id
    /// ascending for determinism.
    pub async fn next_payable_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices \
             WHERE customer_id = $1 \
               AND status_id NOT IN ($2, $3) \
               AND deposit_paid = FALSE \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(customer_id)
            .bind(InvoiceStatus::Paid.id())
            .bind(InvoiceStatus::Cancelled.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark pending invoices past their due date as overdue.
    ///
    /// Returns the number of invoices transitioned.
    pub async fn sweep_overdue(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE invoices SET status_id = $1, updated_at = NOW() \
             WHERE status_id = $2 AND due_date IS NOT NULL AND due_date < CURRENT_DATE",
        )
        .bind(InvoiceStatus::Overdue.id())
        .bind(InvoiceStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
