//! Repository for the `custom_quote_requests` table.

use bureau_core::status::QuoteStatus;
use bureau_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::models::custom_quote_request::{CreateCustomQuoteRequest, CustomQuoteRequest};
use crate::models::customer::{CreateCustomer, Customer};
use crate::models::invoice::Invoice;
use crate::models::project::Project;
use crate::models::quote::{CreateQuote, Quote};
use crate::repositories::notification_repo::NotificationRepo;
use crate::repositories::quote_repo::{self, FanOutQuote, QuoteRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, contact_name, contact_email, company, description, \
                       final_quote, status_id, admin_notes, created_at, updated_at";

/// Everything created by approving a custom quote request in one transaction.
#[derive(Debug)]
pub struct CustomApprovalOutcome {
    pub request: CustomQuoteRequest,
    pub quote: Quote,
    pub project: Project,
    pub invoice: Invoice,
}

/// Provides CRUD operations and the approval flow for custom quote requests.
pub struct CustomQuoteRequestRepo;

impl CustomQuoteRequestRepo {
    /// Public submission: optionally create the submitting customer and
    /// insert the pending request, atomically.
    pub async fn submit(
        pool: &PgPool,
        new_customer: Option<&CreateCustomer>,
        input: &CreateCustomQuoteRequest,
    ) -> Result<(CustomQuoteRequest, Option<Customer>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut customer_id = input.customer_id;
        let mut created_customer = None;

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
            customer_id = Some(row.id);
            created_customer = Some(row);
        }

        let query = format!(
            "INSERT INTO custom_quote_requests
                (customer_id, contact_name, contact_email, company, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, CustomQuoteRequest>(&query)
            .bind(customer_id)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.company)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((request, created_customer))
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CustomQuoteRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM custom_quote_requests WHERE id = $1");
        sqlx::query_as::<_, CustomQuoteRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all requests, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CustomQuoteRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM custom_quote_requests ORDER BY created_at DESC");
        sqlx::query_as::<_, CustomQuoteRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Approve a request with an attached price.
    ///
    /// One transaction: the request is marked approved, a formal quote is
    /// inserted already-approved, and the standard approval fan-out creates
    /// the project, invoice, and customer notification. If any insert fails
    /// the request is not marked approved -- there is no partial state.
    ///
    /// Returns `None` when the request is missing, not pending, or has no
    /// owning customer.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        final_quote: Money,
        admin_notes: Option<&str>,
    ) -> Result<Option<CustomApprovalOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE custom_quote_requests SET
                status_id = $2,
                final_quote = $3,
                admin_notes = COALESCE($4, admin_notes),
                updated_at = NOW()
             WHERE id = $1 AND status_id = $5 AND customer_id IS NOT NULL
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, CustomQuoteRequest>(&query)
            .bind(id)
            .bind(QuoteStatus::Approved.id())
            .bind(final_quote)
            .bind(admin_notes)
            .bind(QuoteStatus::Pending.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Guarded by `customer_id IS NOT NULL` in the UPDATE above.
        let Some(customer_id) = request.customer_id else {
            return Ok(None);
        };

        let quote = QuoteRepo::create_in_tx(
            &mut tx,
            &CreateQuote {
                customer_id: Some(customer_id),
                contact_name: request.contact_name.clone(),
                contact_email: request.contact_email.clone(),
                company: request.company.clone(),
                description: request.description.clone(),
                estimated_cost: final_quote,
                estimated_timeline: None,
                selected_package: None,
                rush_delivery: None,
            },
            QuoteStatus::Approved,
        )
        .await?;

        let (project, invoice) =
            quote_repo::fan_out(&mut tx, FanOutQuote::from_quote(&quote), customer_id).await?;

        tx.commit().await?;
        Ok(Some(CustomApprovalOutcome {
            request,
            quote,
            project,
            invoice,
        }))
    }

    /// Apply a non-approval transition (reject/cancel) and notify the
    /// customer, in one transaction.
    ///
    /// Returns `None` when the request is missing or was moved concurrently.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: QuoteStatus,
        next: QuoteStatus,
        admin_notes: Option<&str>,
    ) -> Result<Option<CustomQuoteRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE custom_quote_requests SET
                status_id = $2,
                admin_notes = COALESCE($3, admin_notes),
                updated_at = NOW()
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, CustomQuoteRequest>(&query)
            .bind(id)
            .bind(next.id())
            .bind(admin_notes)
            .bind(expected.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(customer_id) = request.customer_id {
            NotificationRepo::create_in_tx(
                &mut tx,
                customer_id,
                "quote_status",
                "normal",
                &format!("Your custom quote request is now {}", next.name()),
                None,
                Some("/client/quotes"),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(request))
    }
}
