//! Repository for the `project_files` table, including the orphan
//! reconciliation maintenance pass.

use bureau_core::reconcile::{self, Association, OrphanFile, ProjectRef};
use bureau_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_file::{CreateProjectFile, ProjectFile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, project_id, name, original_name, file_path, size_bytes, \
                       mime_type, kind, uploaded_by_admin, uploaded_at";

/// Result of a reconciliation run.
#[derive(Debug, serde::Serialize)]
pub struct ReconcileOutcome {
    /// Number of files associated in this run (0 on a repeat run).
    pub associated: u64,
    /// The applied mappings.
    pub mappings: Vec<Association>,
    /// Files left orphaned because their customer has no project.
    pub unmatched: Vec<DbId>,
}

/// Provides file metadata operations for project uploads.
pub struct ProjectFileRepo;

impl ProjectFileRepo {
    /// Insert a metadata row after a successful disk write.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectFile,
    ) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files
                (customer_id, project_id, name, original_name, file_path,
                 size_bytes, mime_type, uploaded_by_admin)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(input.customer_id)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.original_name)
            .bind(&input.file_path)
            .bind(input.size_bytes)
            .bind(&input.mime_type)
            .bind(input.uploaded_by_admin)
            .fetch_one(pool)
            .await
    }

    /// Find a file by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_files WHERE id = $1");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's files, most recently uploaded first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id = $1 \
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List orphaned files (`project_id IS NULL`), oldest first.
    pub async fn list_orphans(pool: &PgPool) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id IS NULL ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProjectFile>(&query).fetch_all(pool).await
    }

    /// Associate orphaned files with their owning customer's first project
    /// and rewrite their stored paths into that project's upload folder.
    ///
    /// A maintenance utility for backfilling imported legacy rows, not a
    /// runtime code path. Idempotent: files associated by an earlier run no
    /// longer match `project_id IS NULL`, so a repeat run applies nothing.
    /// The per-row `WHERE project_id IS NULL` guard also makes concurrent
    /// runs safe -- a file is associated at most once.
    pub async fn reconcile_orphans(pool: &PgPool) -> Result<ReconcileOutcome, sqlx::Error> {
        let projects: Vec<ProjectRef> = sqlx::query_as::<_, (DbId, DbId, String, bureau_core::types::Timestamp)>(
            "SELECT id, customer_id, folder_number, created_at FROM projects \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, customer_id, folder_number, created_at)| ProjectRef {
            id,
            customer_id,
            folder_number,
            created_at,
        })
        .collect();

        let orphans: Vec<OrphanFile> = Self::list_orphans(pool)
            .await?
            .into_iter()
            .map(|file| OrphanFile {
                id: file.id,
                customer_id: file.customer_id,
                name: file.name,
            })
            .collect();

        let plan = reconcile::plan_associations(&projects, &orphans);

        let mut tx = pool.begin().await?;
        let mut associated = 0u64;
        for mapping in &plan.associations {
            let result = sqlx::query(
                "UPDATE project_files SET project_id = $2, file_path = $3 \
                 WHERE id = $1 AND project_id IS NULL",
            )
            .bind(mapping.file_id)
            .bind(mapping.project_id)
            .bind(&mapping.new_path)
            .execute(&mut *tx)
            .await?;
            associated += result.rows_affected();
        }
        tx.commit().await?;

        tracing::info!(
            associated,
            unmatched = plan.unmatched.len(),
            "file reconciliation pass complete"
        );

        Ok(ReconcileOutcome {
            associated,
            mappings: plan.associations,
            unmatched: plan.unmatched,
        })
    }
}
