//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Clients poll;
//! there is no push channel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::notification::{CreateNotification, Notification};
use bureau_db::repositories::{CustomerRepo, NotificationRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::query::PaginationParams;
use crate::state::AppState;

/// Accepted notification kinds (mirrors the DB check constraint).
const KINDS: &[&str] = &[
    "quote_status",
    "message",
    "project_update",
    "billing",
    "invoice",
    "system",
];

/// Accepted priorities (mirrors the DB check constraint).
const PRIORITIES: &[&str] = &["low", "normal", "high"];

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/notifications
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let pagination = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let notifications = NotificationRepo::list_for_customer(
        &state.pool,
        auth.customer_id,
        params.unread_only.unwrap_or(false),
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(notifications))
}

/// POST /api/v1/notifications/{id}/read
///
/// Returns 204 on success, 404 if the notification does not belong to the
/// authenticated customer.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.customer_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.customer_id).await?;
    Ok(Json(json!({ "data": { "marked_read": count } })))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.customer_id).await?;
    Ok(Json(json!({ "data": { "unread": count } })))
}

/// POST /api/v1/admin/customers/{id}/notifications
///
/// Admin-authored notification (announcements, manual nudges).
pub async fn create_for_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Json(mut input): Json<CreateNotification>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    input.customer_id = customer_id;

    if !KINDS.contains(&input.kind.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "kind must be one of: {}",
            KINDS.join(", ")
        ))));
    }
    if let Some(priority) = input.priority.as_deref() {
        if !PRIORITIES.contains(&priority) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "priority must be one of: {}",
                PRIORITIES.join(", ")
            ))));
        }
    }
    CustomerRepo::find_by_id(&state.pool, customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }))?;

    let notification = NotificationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
