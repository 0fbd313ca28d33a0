//! Repository for the `projects` table.

use bureau_core::naming;
use bureau_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, quote_id, name, client, status_id, progress, budget, \
                       start_date, end_date, folder_number, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project inside an existing transaction.
    ///
    /// The id is drawn from the table's sequence first so the folder number
    /// can be derived from it and written in the same INSERT: assigned
    /// exactly once, unique by construction, never recomputed from a row
    /// count.
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let (next_id,): (i64,) =
            sqlx::query_as("SELECT nextval(pg_get_serial_sequence('projects', 'id'))")
                .fetch_one(&mut **tx)
                .await?;
        let folder_number = naming::folder_number(next_id);

        let query = format!(
            "INSERT INTO projects
                (id, customer_id, quote_id, name, client, status_id, budget,
                 start_date, end_date, folder_number)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(next_id)
            .bind(input.customer_id)
            .bind(input.quote_id)
            .bind(&input.name)
            .bind(&input.client)
            .bind(input.status_id)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&folder_number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a new project, returning the created row.
    ///
    /// If `status_id` is `None` in the input, defaults to 1 (Pending).
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let project = Self::create_in_tx(&mut tx, input).await?;
        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List a customer's projects, oldest first (creation order).
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE customer_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// `updated_at` is always refreshed. The folder number is deliberately
    /// not updatable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                status_id = COALESCE($3, status_id),
                progress = COALESCE($4, progress),
                budget = COALESCE($5, budget),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.status_id)
            .bind(input.progress)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by ID. File rows keep their metadata but
    /// lose the association (`project_id` is set NULL by the FK).
    ///
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
