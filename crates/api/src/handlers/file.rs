//! Handlers for project file upload and listing.
//!
//! Uploads are synchronous: the full body is read into memory, written to
//! the project's upload directory, and a metadata row is inserted. Stored
//! names are timestamp-qualified so concurrent uploads never collide.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::naming;
use bureau_core::types::DbId;
use bureau_db::models::project::Project;
use bureau_db::models::project_file::{CreateProjectFile, ProjectFile};
use bureau_db::repositories::{ProjectFileRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum accepted upload size in bytes (25 MiB).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// POST /api/v1/projects/{id}/upload
///
/// Multipart form with a required `file` field. Clients may only upload to
/// their own projects; admins may upload anywhere (flagged as admin
/// uploads).
pub async fn upload(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectFile>)> {
    let project = resolve_project_for(&auth, &state, project_id).await?;

    let mut file_data: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let mime_type = field.content_type().map(|m| m.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, mime_type, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let (original_name, mime_type, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {MAX_UPLOAD_BYTES} byte upload limit"
        )));
    }

    let stored_name = naming::stored_filename(chrono::Utc::now().timestamp_millis(), &original_name);
    let file_path = naming::project_upload_path(&project.folder_number, &stored_name);

    let dir = state
        .config
        .uploads_root
        .join("projects")
        .join(&project.folder_number);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not create upload directory: {e}")))?;
    tokio::fs::write(dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not write upload: {e}")))?;

    let file = ProjectFileRepo::create(
        &state.pool,
        &CreateProjectFile {
            customer_id: project.customer_id,
            project_id: Some(project.id),
            name: stored_name,
            original_name,
            file_path,
            size_bytes: data.len() as i64,
            mime_type,
            uploaded_by_admin: auth.is_admin(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /api/v1/projects/{id}/files
///
/// Lists files through the strict project association only.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectFile>>> {
    let project = resolve_project_for(&auth, &state, project_id).await?;
    let files = ProjectFileRepo::list_for_project(&state.pool, project.id).await?;
    Ok(Json(files))
}

/// Load the project and enforce ownership: clients only reach their own
/// projects, admins reach all.
async fn resolve_project_for(
    auth: &AuthUser,
    state: &AppState,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if !auth.is_admin() && project.customer_id != auth.customer_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this project".into(),
        )));
    }

    Ok(project)
}
