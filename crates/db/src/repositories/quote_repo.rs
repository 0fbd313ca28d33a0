//! Repository for the `quotes` table, including the approval fan-out.

use bureau_core::billing::{self, LineItem};
use bureau_core::status::QuoteStatus;
use bureau_core::types::DbId;
use chrono::Datelike;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::customer::{CreateCustomer, Customer};
use crate::models::invoice::Invoice;
use crate::models::project::{CreateProject, Project};
use crate::models::quote::{CreateQuote, Quote};
use crate::repositories::invoice_repo::InvoiceRepo;
use crate::repositories::notification_repo::NotificationRepo;
use crate::repositories::project_repo::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reference, customer_id, contact_name, contact_email, company, \
                       description, estimated_cost, estimated_timeline, selected_package, \
                       rush_delivery, status_id, admin_notes, created_at, updated_at";

/// Everything created by an approval in one transaction.
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub quote: Quote,
    pub project: Project,
    pub invoice: Invoice,
}

/// Provides CRUD operations and lifecycle transitions for quotes.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Insert a quote inside an existing transaction and stamp its display
    /// reference (`QT-<year>-<seq>`) from the generated id.
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateQuote,
        status: QuoteStatus,
    ) -> Result<Quote, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotes
                (customer_id, contact_name, contact_email, company, description,
                 estimated_cost, estimated_timeline, selected_package, rush_delivery, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'none'), $10)
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Quote>(&query)
            .bind(input.customer_id)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.company)
            .bind(&input.description)
            .bind(input.estimated_cost)
            .bind(&input.estimated_timeline)
            .bind(&input.selected_package)
            .bind(&input.rush_delivery)
            .bind(status.id())
            .fetch_one(&mut **tx)
            .await?;

        let reference = billing::quote_reference(inserted.created_at.year(), inserted.id);
        let query = format!("UPDATE quotes SET reference = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Quote>(&query)
            .bind(inserted.id)
            .bind(&reference)
            .fetch_one(&mut **tx)
            .await
    }

    /// Public quote submission: optionally create the submitting customer
    /// and insert the pending quote, atomically.
    pub async fn submit(
        pool: &PgPool,
        new_customer: Option<&CreateCustomer>,
        input: &CreateQuote,
    ) -> Result<(Quote, Option<Customer>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut created_customer = None;
        let mut quote_input = input.clone();

        if let Some(customer) = new_customer {
            let query = "INSERT INTO customers
                            (first_name, last_name, email, password_hash, company, phone)
                         VALUES ($1, $2, $3, $4, $5, $6)
                         RETURNING id, first_name, last_name, email, password_hash, company, \
                                   phone, role, created_at, updated_at";
            let row = sqlx::query_as::<_, Customer>(query)
                .bind(&customer.first_name)
                .bind(&customer.last_name)
                .bind(&customer.email)
                .bind(&customer.password_hash)
                .bind(&customer.company)
                .bind(&customer.phone)
                .fetch_one(&mut *tx)
                .await?;
            quote_input.customer_id = Some(row.id);
            created_customer = Some(row);
        }

        let quote = Self::create_in_tx(&mut tx, &quote_input, QuoteStatus::Pending).await?;

        tx.commit().await?;
        Ok((quote, created_customer))
    }

    /// Find a quote by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotes WHERE id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all quotes, most recently created first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Quote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotes ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a customer's quotes, most recently created first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Quote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotes WHERE customer_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a non-approval status transition and notify the customer, in
    /// one transaction.
    ///
    /// The `expected` status guards against a concurrent transition: the
    /// update only applies while the quote is still in the status the
    /// caller validated against. Returns `None` when the quote is missing
    /// or was moved concurrently.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: QuoteStatus,
        next: QuoteStatus,
        admin_notes: Option<&str>,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE quotes SET
                status_id = $2,
                admin_notes = COALESCE($3, admin_notes),
                updated_at = NOW()
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        let Some(quote) = sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .bind(next.id())
            .bind(admin_notes)
            .bind(expected.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(customer_id) = quote.customer_id {
            let reference = quote.reference.as_deref().unwrap_or("your quote");
            NotificationRepo::create_in_tx(
                &mut tx,
                customer_id,
                "quote_status",
                "normal",
                &format!("Quote {reference} is now {}", next.name()),
                None,
                Some("/client/quotes"),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(quote))
    }

    /// Approve a quote: status update (optionally attaching a final price),
    /// project creation (with folder number), invoice derivation from the
    /// estimated cost, and customer notification, all in one transaction.
    /// Any step failing rolls the whole sequence back.
    ///
    /// The SQL guard (`status_id` in pending/quoted, `customer_id` present)
    /// makes the operation race-safe; `None` means the quote was missing,
    /// already moved, or has no owning customer.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        final_cost: Option<bureau_core::types::Money>,
        admin_notes: Option<&str>,
    ) -> Result<Option<ApprovalOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE quotes SET
                status_id = $2,
                estimated_cost = COALESCE($3, estimated_cost),
                admin_notes = COALESCE($4, admin_notes),
                updated_at = NOW()
             WHERE id = $1
               AND status_id IN ($5, $6)
               AND customer_id IS NOT NULL
             RETURNING {COLUMNS}"
        );
        let Some(quote) = sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .bind(QuoteStatus::Approved.id())
            .bind(final_cost)
            .bind(admin_notes)
            .bind(QuoteStatus::Pending.id())
            .bind(QuoteStatus::Quoted.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Guarded by `customer_id IS NOT NULL` in the UPDATE above.
        let Some(customer_id) = quote.customer_id else {
            return Ok(None);
        };

        let outcome = fan_out(&mut tx, FanOutQuote::from_quote(&quote), customer_id).await?;

        tx.commit().await?;
        Ok(Some(ApprovalOutcome {
            quote,
            project: outcome.0,
            invoice: outcome.1,
        }))
    }
}

/// The quote fields the approval fan-out needs, so the custom-request path
/// can reuse it for its freshly inserted quote.
pub(crate) struct FanOutQuote {
    pub id: DbId,
    pub reference: Option<String>,
    pub contact_name: String,
    pub description: String,
    pub estimated_cost: bureau_core::types::Money,
    pub selected_package: Option<serde_json::Value>,
}

impl FanOutQuote {
    pub(crate) fn from_quote(quote: &Quote) -> Self {
        Self {
            id: quote.id,
            reference: quote.reference.clone(),
            contact_name: quote.contact_name.clone(),
            description: quote.description.clone(),
            estimated_cost: quote.estimated_cost,
            selected_package: quote.selected_package.clone(),
        }
    }
}

/// Create the project, invoice, and notification for an approved quote
/// inside the caller's transaction.
pub(crate) async fn fan_out(
    tx: &mut Transaction<'_, Postgres>,
    quote: FanOutQuote,
    customer_id: DbId,
) -> Result<(Project, Invoice), sqlx::Error> {
    // Project named after the selected package when one was chosen.
    let project_name = quote
        .selected_package
        .as_ref()
        .and_then(|pkg| pkg.get("name"))
        .and_then(|name| name.as_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Engagement for {}", quote.contact_name));

    let project = ProjectRepo::create_in_tx(
        tx,
        &CreateProject {
            customer_id,
            quote_id: Some(quote.id),
            name: project_name,
            client: quote.contact_name.clone(),
            status_id: None,
            budget: Some(quote.estimated_cost),
            start_date: None,
            end_date: None,
        },
    )
    .await?;

    let items = vec![LineItem::single(&quote.description, quote.estimated_cost)];
    let invoice = InvoiceRepo::create_in_tx(
        tx,
        customer_id,
        Some(quote.id),
        Some(project.id),
        &items,
        true,
        None,
    )
    .await?;

    let reference = quote.reference.as_deref().unwrap_or("your quote");
    NotificationRepo::create_in_tx(
        tx,
        customer_id,
        "quote_status",
        "high",
        &format!("Quote {reference} has been approved"),
        Some(&format!(
            "Your project is set up. A deposit of {} is due on invoice {}.",
            invoice.deposit_amount,
            invoice.invoice_number.as_deref().unwrap_or("pending")
        )),
        Some("/client/invoices"),
    )
    .await?;

    Ok((project, invoice))
}
