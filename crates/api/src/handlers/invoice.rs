//! Handlers for the `/invoices` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::billing;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::invoice::{CreateInvoice, Invoice};
use bureau_db::models::payment::Payment;
use bureau_db::repositories::{CustomerRepo, InvoiceRepo, PaymentRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;

/// Query parameters for the admin invoice listing.
#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub customer_id: Option<DbId>,
}

/// POST /api/v1/admin/invoices
///
/// The invoice amount is derived from the line items; a caller-supplied
/// amount is not accepted. Items whose `total` disagrees with
/// `quantity * rate` are rejected.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    billing::invoice_total(&input.line_items).map_err(AppError::Core)?;

    CustomerRepo::find_by_id(&state.pool, input.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: input.customer_id,
        }))?;

    let invoice = InvoiceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET /api/v1/admin/invoices
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = InvoiceRepo::list(&state.pool, params.customer_id).await?;
    Ok(Json(invoices))
}

/// GET /api/v1/admin/invoices/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Invoice>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invoice",
            id,
        }))?;
    Ok(Json(invoice))
}

/// GET /api/v1/admin/invoices/{id}/payments
pub async fn list_payments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Payment>>> {
    InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invoice",
            id,
        }))?;
    let payments = PaymentRepo::list_for_invoice(&state.pool, id).await?;
    Ok(Json(payments))
}

/// GET /api/v1/client/invoices
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = InvoiceRepo::list_for_customer(&state.pool, auth.customer_id).await?;
    Ok(Json(invoices))
}

/// GET /api/v1/client/invoices/next-payable
///
/// FIFO dunning: the oldest unpaid invoice whose deposit is still
/// outstanding. 204 when the customer has nothing to pay.
pub async fn next_payable(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<axum::response::Response> {
    use axum::response::IntoResponse;

    match InvoiceRepo::next_payable_for_customer(&state.pool, auth.customer_id).await? {
        Some(invoice) => Ok(Json(invoice).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
