//! Handlers for the client/admin message log.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::message::{CreateMessage, Message};
use bureau_db::repositories::{CustomerRepo, MessageRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::query::PaginationParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Client handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/client/messages
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = MessageRepo::list_for_customer(
        &state.pool,
        auth.customer_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(messages))
}

/// POST /api/v1/client/messages
pub async fn send(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<Message>)> {
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message body must not be empty".into(),
        )));
    }
    let message = MessageRepo::create(
        &state.pool,
        auth.customer_id,
        false,
        input.subject.as_deref(),
        &input.body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/client/messages/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = MessageRepo::mark_read(&state.pool, message_id, auth.customer_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id: message_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/client/messages/read-all
///
/// Marks the admin-authored rows -- the ones the client reads -- as read.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = MessageRepo::mark_all_read_from_admin(&state.pool, auth.customer_id).await?;
    Ok(Json(json!({ "data": { "marked_read": count } })))
}

/// GET /api/v1/client/messages/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = MessageRepo::unread_from_admin_count(&state.pool, auth.customer_id).await?;
    Ok(Json(json!({ "data": { "unread": count } })))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/customers/{id}/messages
pub async fn list_for_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Message>>> {
    let messages =
        MessageRepo::list_for_customer(&state.pool, customer_id, params.limit(), params.offset())
            .await?;
    Ok(Json(messages))
}

/// POST /api/v1/admin/customers/{id}/messages
///
/// Sends an admin reply; the matching notification is written in the same
/// transaction.
pub async fn send_to_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<Message>)> {
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message body must not be empty".into(),
        )));
    }
    CustomerRepo::find_by_id(&state.pool, customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }))?;

    let message = MessageRepo::send_from_admin(
        &state.pool,
        customer_id,
        input.subject.as_deref(),
        &input.body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
