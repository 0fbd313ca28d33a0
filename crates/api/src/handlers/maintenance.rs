//! Admin maintenance operations: one-off repairs and sweeps.

use axum::extract::State;
use axum::Json;
use bureau_db::repositories::{InvoiceRepo, ProjectFileRepo, ReconcileOutcome};
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::auth::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/maintenance/reconcile-files
///
/// Backfill utility: associate orphaned file rows with their customer's
/// first project and rewrite stored paths. Idempotent -- a second run
/// reports zero associations.
pub async fn reconcile_files(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReconcileOutcome>>> {
    let outcome = ProjectFileRepo::reconcile_orphans(&state.pool).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/admin/maintenance/sweep-overdue
///
/// Mark pending invoices past their due date as overdue.
pub async fn sweep_overdue(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = InvoiceRepo::sweep_overdue(&state.pool).await?;
    Ok(Json(json!({ "data": { "marked_overdue": count } })))
}
