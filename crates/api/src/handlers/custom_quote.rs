//! Handlers for custom quote requests (`/quote-requests`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::status::{QuoteStatus, StatusId};
use bureau_core::types::{DbId, Money};
use bureau_db::models::custom_quote_request::{CreateCustomQuoteRequest, CustomQuoteRequest};
use bureau_db::models::customer::CreateCustomer;
use bureau_db::repositories::{CustomQuoteRequestRepo, CustomerRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /quote-requests` form.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequestBody {
    #[validate(length(min = 1, message = "contact_name is required"))]
    pub contact_name: String,
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: String,
    pub company: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

/// Response for a public request submission.
#[derive(Debug, Serialize)]
pub struct SubmitRequestResponse {
    pub request: CustomQuoteRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Request body for `PATCH /admin/quote-requests/{id}`.
///
/// Approval requires `final_quote`; other transitions ignore it.
#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    pub status_id: StatusId,
    pub final_quote: Option<Money>,
    pub admin_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/quote-requests
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitRequestBody>,
) -> AppResult<(StatusCode, Json<SubmitRequestResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let existing = CustomerRepo::find_by_email(&state.pool, &input.contact_email).await?;

    let mut temp_password = None;
    let new_customer = if existing.is_none() {
        let password = super::quote::generate_temp_password();
        let password_hash = hash_password(&password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        let (first_name, last_name) = match input.contact_name.trim().split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (input.contact_name.trim().to_string(), String::new()),
        };
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

    let create = CreateCustomQuoteRequest {
        customer_id: existing.as_ref().map(|c| c.id),
        contact_name: input.contact_name,
        contact_email: input.contact_email,
        company: input.company,
        description: input.description,
    };

    let (request, created) =
        CustomQuoteRequestRepo::submit(&state.pool, new_customer.as_ref(), &create).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitRequestResponse {
            request,
            temporary_password: created.as_ref().and(temp_password),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/quote-requests
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomQuoteRequest>>> {
    let requests = CustomQuoteRequestRepo::list(&state.pool).await?;
    Ok(Json(requests))
}

/// PATCH /api/v1/admin/quote-requests/{id}
///
/// Approval (with a `final_quote` price) creates the formal quote, project,
/// and invoice in the same transaction that marks the request approved --
/// the request row is never approved with any downstream insert missing.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRequestBody>,
) -> AppResult<axum::response::Response> {
    use axum::response::IntoResponse;

    let request = CustomQuoteRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomQuoteRequest",
            id,
        }))?;

    let current = QuoteStatus::from_id(request.status_id).ok_or_else(|| {
        AppError::InternalError(format!(
            "Quote request {id} has unknown status {}",
            request.status_id
        ))
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
        let final_quote = input.final_quote.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "final_quote is required to approve a custom quote request".into(),
            ))
        })?;
        if final_quote.is_sign_negative() {
            return Err(AppError::Core(CoreError::Validation(
                "final_quote must not be negative".into(),
            )));
        }
        if request.customer_id.is_none() {
            return Err(AppError::Core(CoreError::Validation(
                "Request has no owning customer; assign one before approval".into(),
            )));
        }

        let outcome =
            CustomQuoteRequestRepo::approve(&state.pool, id, final_quote, input.admin_notes.as_deref())
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Conflict(
                        "Request was modified concurrently; re-read and retry".into(),
                    ))
                })?;

        return Ok(Json(serde_json::json!({
            "request": outcome.request,
            "quote": outcome.quote,
            "project": outcome.project,
            "invoice": outcome.invoice,
        }))
        .into_response());
    }

    let updated = CustomQuoteRequestRepo::update_status(
        &state.pool,
        id,
        current,
        next,
        input.admin_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Request was modified concurrently; re-read and retry".into(),
        ))
    })?;

    Ok(Json(updated).into_response())
}
