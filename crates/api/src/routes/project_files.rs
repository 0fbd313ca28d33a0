//! Route definitions for project file upload and listing.
//!
//! Mounted at the API root so both clients (own projects) and admins reach
//! the same handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Body limit for multipart uploads: 26 MiB, slightly above the handler's
/// 25 MiB file cap so the handler produces the error message.
const UPLOAD_BODY_LIMIT: usize = 26 * 1024 * 1024;

/// Routes mounted at the API root.
///
/// ```text
/// POST /projects/{id}/upload -> file::upload
/// GET  /projects/{id}/files  -> file::list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/upload",
            post(file::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/projects/{id}/files", get(file::list))
}
