//! Handlers for the `/quotes` resource and the admin quote lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::status::{QuoteStatus, StatusId};
use bureau_core::types::{DbId, Money};
use bureau_db::models::customer::CreateCustomer;
use bureau_db::models::invoice::Invoice;
use bureau_db::models::project::Project;
use bureau_db::models::quote::{CreateQuote, Quote};
use bureau_db::repositories::{CustomerRepo, QuoteRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::query::PaginationParams;
use crate::state::AppState;

/// Accepted rush delivery tiers.
const RUSH_TIERS: &[&str] = &["none", "priority", "express"];

/// Length of generated temporary passwords for first-time submitters.
const TEMP_PASSWORD_LEN: usize = 12;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /quotes` form.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuoteRequest {
    #[validate(length(min = 1, message = "contact_name is required"))]
    pub contact_name: String,
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: String,
    pub company: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub estimated_cost: Money,
    pub estimated_timeline: Option<String>,
    pub selected_package: Option<serde_json::Value>,
    pub rush_delivery: Option<String>,
}

/// Response for a public quote submission.
///
/// `temporary_password` is present only when the submission created a new
/// customer account; it is shown exactly once.
#[derive(Debug, Serialize)]
pub struct SubmitQuoteResponse {
    pub quote: Quote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Request body for `PATCH /admin/quotes/{id}`.
///
/// `final_quote` replaces the estimated cost when the transition is an
/// approval; other transitions ignore it.
#[derive(Debug, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status_id: StatusId,
    pub final_quote: Option<Money>,
    pub admin_notes: Option<String>,
}

/// Response for an approval transition: everything the fan-out created.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub quote: Quote,
    pub project: Project,
    pub invoice: Invoice,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/quotes
///
/// Public quote submission. Unknown emails get a customer account with a
/// generated temporary password, created in the same transaction as the
/// quote.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitQuoteRequest>,
) -> AppResult<(StatusCode, Json<SubmitQuoteResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if input.estimated_cost.is_sign_negative() {
        return Err(AppError::Core(CoreError::Validation(
            "estimated_cost must not be negative".into(),
        )));
    }
    if let Some(tier) = input.rush_delivery.as_deref() {
        if !RUSH_TIERS.contains(&tier) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "rush_delivery must be one of: {}",
                RUSH_TIERS.join(", ")
            ))));
        }
    }

    let existing = CustomerRepo::find_by_email(&state.pool, &input.contact_email).await?;

    let mut temp_password = None;
    let new_customer = if existing.is_none() {
        let password = generate_temp_password();
        let password_hash = hash_password(&password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let (first_name, last_name) = split_contact_name(&input.contact_name);
        temp_password = Some(password);
        Some(CreateCustomer {
            first_name,
            last_name,
            email: input.contact_email.clone(),
            password_hash,
            company: input.company.clone(),
            phone: None,
        })
    } else {
        None
    };

    let create = CreateQuote {
        customer_id: existing.as_ref().map(|c| c.id),
        contact_name: input.contact_name,
        contact_email: input.contact_email,
        company: input.company,
        description: input.description,
        estimated_cost: input.estimated_cost,
        estimated_timeline: input.estimated_timeline,
        selected_package: input.selected_package,
        rush_delivery: input.rush_delivery,
    };

    let (quote, created) = QuoteRepo::submit(&state.pool, new_customer.as_ref(), &create).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuoteResponse {
            customer_id: quote.customer_id,
            temporary_password: created.as_ref().and(temp_password),
            quote,
        }),
    ))
}

/// GET /api/v1/client/quotes
pub async fn list_mine(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Quote>>> {
    let quotes = QuoteRepo::list_for_customer(&state.pool, auth.customer_id).await?;
    Ok(Json(quotes))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/quotes
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Quote>>> {
    let quotes = QuoteRepo::list(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(quotes))
}

/// GET /api/v1/admin/quotes/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Quote>> {
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;
    Ok(Json(quote))
}

/// PATCH /api/v1/admin/quotes/{id}
///
/// Apply a status transition. Moving to `approved` fans out atomically:
/// project creation, invoice derivation, and customer notification either
/// all happen or none do.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuoteStatusRequest>,
) -> AppResult<axum::response::Response> {
    use axum::response::IntoResponse;

    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;

    let current = QuoteStatus::from_id(quote.status_id).ok_or_else(|| {
        AppError::InternalError(format!("Quote {id} has unknown status {}", quote.status_id))
    })?;
    let next = QuoteStatus::from_id(input.status_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown status id: {}",
            input.status_id
        )))
    })?;

    if !current.can_transition_to(next) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invalid status transition: {} -> {}",
            current.name(),
            next.name()
        ))));
    }

    if next == QuoteStatus::Approved {
        if quote.customer_id.is_none() {
            return Err(AppError::Core(CoreError::Validation(
                "Quote has no owning customer; assign one before approval".into(),
            )));
        }
        if let Some(final_quote) = input.final_quote {
            if final_quote.is_sign_negative() {
                return Err(AppError::Core(CoreError::Validation(
                    "final_quote must not be negative".into(),
                )));
            }
        }
        let outcome = QuoteRepo::approve(
            &state.pool,
            id,
            input.final_quote,
            input.admin_notes.as_deref(),
        )
        .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Quote was modified concurrently; re-read and retry".into(),
                ))
            })?;
        return Ok(Json(ApprovalResponse {
            quote: outcome.quote,
            project: outcome.project,
            invoice: outcome.invoice,
        })
        .into_response());
    }

    let updated = QuoteRepo::update_status(
        &state.pool,
        id,
        current,
        next,
        input.admin_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Quote was modified concurrently; re-read and retry".into(),
        ))
    })?;

    Ok(Json(updated).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an alphanumeric temporary password for a first-time submitter.
pub(crate) fn generate_temp_password() -> String {
    use rand::distr::Alphanumeric;
    use rand::Rng;
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Split a free-form contact name into first/last for the customer record.
fn split_contact_name(contact_name: &str) -> (String, String) {
    match contact_name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (contact_name.trim().to_string(), String::new()),
    }
}
