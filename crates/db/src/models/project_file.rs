//! Project file metadata model and DTOs.

use bureau_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file metadata row from the `project_files` table.
///
/// `project_id` is a strict foreign key to `projects`; a NULL value marks an
/// orphan awaiting the reconcile maintenance pass.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub customer_id: DbId,
    pub project_id: Option<DbId>,
    /// Stored (timestamp-qualified, sanitized) filename.
    pub name: String,
    pub original_name: String,
    pub file_path: String,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    /// `"file"` or `"folder"`.
    pub kind: String,
    pub uploaded_by_admin: bool,
    pub uploaded_at: Timestamp,
}

/// DTO for inserting file metadata after a successful disk write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectFile {
    pub customer_id: DbId,
    pub project_id: Option<DbId>,
    pub name: String,
    pub original_name: String,
    pub file_path: String,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub uploaded_by_admin: bool,
}
