//! Repository for the append-only `payments` table.
//!
//! Recording a payment and flipping the invoice's billing flags is one
//! transaction: a payment row without the matching invoice update is an
//! invalid state and must never be observable.

use bureau_core::status::InvoiceStatus;
use bureau_core::types::Money;
use sqlx::PgPool;

use crate::models::invoice::Invoice;
use crate::models::payment::{Payment, RecordPayment};
use crate::repositories::notification_repo::NotificationRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, invoice_id, customer_id, amount, payment_type, payment_method, status, created_at";

/// Invoice column list, duplicated here for the FOR UPDATE read.
const INVOICE_COLUMNS: &str = "id, invoice_number, customer_id, quote_id, project_id, amount, \
                               deposit_required, deposit_amount, remaining_amount, deposit_paid, \
                               status_id, due_date, line_items, created_at, updated_at";

/// Why a payment was not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRejection {
    /// The invoice is already fully paid.
    AlreadyPaid,
    /// The invoice was cancelled.
    Cancelled,
    /// A deposit payment against an invoice that does not require one.
    DepositNotRequired,
    /// The deposit was already recorded.
    DepositAlreadyPaid,
    /// A remaining payment while the required deposit is still outstanding.
    DepositOutstanding,
    /// The payment amount does not match the expected portion.
    AmountMismatch { expected: Money },
    /// The payment names a different customer than the invoice.
    CustomerMismatch,
    /// `payment_type` is neither `deposit` nor `remaining`.
    InvalidType,
}

/// Result of attempting to record a payment.
#[derive(Debug)]
pub enum RecordOutcome {
    Recorded { payment: Payment, invoice: Invoice },
    Rejected(PaymentRejection),
    InvoiceNotFound,
}

/// Provides payment recording and listing.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a simulated payment against an invoice.
    ///
    /// The invoice row is locked for the duration of the transaction, so
    /// concurrent recordings serialize and double-payments are rejected
    /// rather than double-applied. On success the invoice flags are updated
    /// in the same transaction (`deposit` sets `deposit_paid`; `remaining`
    /// sets the status to paid) and a billing notification is queued for
    /// the customer.
    pub async fn record(pool: &PgPool, input: &RecordPayment) -> Result<RecordOutcome, sqlx::Error> {
        let payment_type = match input.payment_type.as_str() {
            "deposit" | "remaining" => input.payment_type.as_str(),
            _ => return Ok(RecordOutcome::Rejected(PaymentRejection::InvalidType)),
        };

        let mut tx = pool.begin().await?;

        let query = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE");
        let Some(invoice) = sqlx::query_as::<_, Invoice>(&query)
            .bind(input.invoice_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RecordOutcome::InvoiceNotFound);
        };

        if invoice.customer_id != input.customer_id {
            return Ok(RecordOutcome::Rejected(PaymentRejection::CustomerMismatch));
        }

        let status = InvoiceStatus::from_id(invoice.status_id);
        if status == Some(InvoiceStatus::Paid) {
            return Ok(RecordOutcome::Rejected(PaymentRejection::AlreadyPaid));
        }
        if status == Some(InvoiceStatus::Cancelled) {
            return Ok(RecordOutcome::Rejected(PaymentRejection::Cancelled));
        }

        match payment_type {
            "deposit" => {
                if !invoice.deposit_required {
                    return Ok(RecordOutcome::Rejected(PaymentRejection::DepositNotRequired));
                }
                if invoice.deposit_paid {
                    return Ok(RecordOutcome::Rejected(PaymentRejection::DepositAlreadyPaid));
                }
                if input.amount != invoice.deposit_amount {
                    return Ok(RecordOutcome::Rejected(PaymentRejection::AmountMismatch {
                        expected: invoice.deposit_amount,
                    }));
                }
            }
            _ => {
                if invoice.deposit_required && !invoice.deposit_paid {
                    return Ok(RecordOutcome::Rejected(PaymentRejection::DepositOutstanding));
                }
                if input.amount != invoice.remaining_amount {
                    return Ok(RecordOutcome::Rejected(PaymentRejection::AmountMismatch {
                        expected: invoice.remaining_amount,
                    }));
                }
            }
        }

        let query = format!(
            "INSERT INTO payments (invoice_id, customer_id, amount, payment_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(input.invoice_id)
            .bind(input.customer_id)
            .bind(input.amount)
            .bind(payment_type)
            .fetch_one(&mut *tx)
            .await?;

        let update = if payment_type == "deposit" {
            format!(
                "UPDATE invoices SET deposit_paid = TRUE, updated_at = NOW() \
                 WHERE id = $1 RETURNING {INVOICE_COLUMNS}"
            )
        } else {
            format!(
                "UPDATE invoices SET status_id = {}, updated_at = NOW() \
                 WHERE id = $1 RETURNING {INVOICE_COLUMNS}",
                InvoiceStatus::Paid.id()
            )
        };
        let invoice = sqlx::query_as::<_, Invoice>(&update)
            .bind(input.invoice_id)
            .fetch_one(&mut *tx)
            .await?;

        let number = invoice.invoice_number.as_deref().unwrap_or("invoice");
        let (title, body) = if payment_type == "deposit" {
            (
                format!("Deposit received for {number}"),
                format!("The remaining balance of {} is now due.", invoice.remaining_amount),
            )
        } else {
            (
                format!("Invoice {number} paid in full"),
                "Thank you -- there is nothing further due on this invoice.".to_string(),
            )
        };
        NotificationRepo::create_in_tx(
            &mut tx,
            invoice.customer_id,
            "billing",
            "normal",
            &title,
            Some(&body),
            Some("/client/invoices"),
        )
        .await?;

        tx.commit().await?;
        Ok(RecordOutcome::Recorded { payment, invoice })
    }

    /// List payments recorded against an invoice, oldest first.
    pub async fn list_for_invoice(
        pool: &PgPool,
        invoice_id: bureau_core::types::DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE invoice_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .fetch_all(pool)
            .await
    }
}
