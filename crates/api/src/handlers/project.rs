//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::project::{CreateProject, Project, UpdateProject};
use bureau_db::repositories::{CustomerRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;

/// POST /api/v1/admin/projects
///
/// Creates the project row (folder number assigned inside the insert
/// transaction) and its on-disk upload directory.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    // FK violations surface as 500s; check the owner up front instead.
    CustomerRepo::find_by_id(&state.pool, input.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: input.customer_id,
        }))?;

    let project = ProjectRepo::create(&state.pool, &input).await?;

    let dir = state
        .config
        .uploads_root
        .join("projects")
        .join(&project.folder_number);
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::InternalError(format!(
            "Project {} created but upload directory could not be created: {e}",
            project.id
        ))
    })?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/admin/projects
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/client/projects
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_for_customer(&state.pool, auth.customer_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/admin/projects/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(progress) = input.progress {
        if !(0..=100).contains(&progress) {
            return Err(AppError::Core(CoreError::Validation(
                "progress must be between 0 and 100".into(),
            )));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
