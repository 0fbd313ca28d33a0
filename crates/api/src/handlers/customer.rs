//! Admin handlers for customer records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::customer::Customer;
use bureau_db::repositories::CustomerRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/customers/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    Ok(Json(customer))
}

/// DELETE /api/v1/admin/customers/{id}
///
/// Explicit admin deletion; dependent quotes, projects, invoices, payments,
/// files, messages, and notifications cascade.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CustomerRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))
    }
}
