//! Repository for the append-only `notifications` table.

use bureau_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::notification::{CreateNotification, Notification};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, kind, priority, title, body, action_url, is_read, \
                       read_at, created_at";

/// Provides notification operations.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification inside an existing transaction.
    ///
    /// Lifecycle events (quote transitions, payments) emit their
    /// notification in the same transaction as the triggering write.
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        customer_id: DbId,
        kind: &str,
        priority: &str,
        title: &str,
        body: Option<&str>,
        action_url: Option<&str>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (customer_id, kind, priority, title, body, action_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(customer_id)
            .bind(kind)
            .bind(priority)
            .bind(title)
            .bind(body)
            .bind(action_url)
            .fetch_one(&mut **tx)
            .await
    }

    /// Create a standalone notification (admin-authored or system).
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (customer_id, kind, priority, title, body, action_url)
             VALUES ($1, $2, COALESCE($3, 'normal'), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.customer_id)
            .bind(&input.kind)
            .bind(&input.priority)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.action_url)
            .fetch_one(pool)
            .await
    }

    /// List notifications for a customer, most recent first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read =
    /// false` are returned.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = FALSE"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE customer_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(customer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read, scoped to the owning customer.
    ///
    /// Returns `true` if the notification was found for the customer and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        customer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE id = $1 AND customer_id = $2 AND is_read = FALSE",
        )
        .bind(notification_id)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a customer.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, customer_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE customer_id = $1 AND is_read = FALSE",
        )
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count a customer's unread notifications.
    pub async fn unread_count(pool: &PgPool, customer_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE customer_id = $1 AND is_read = FALSE",
        )
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
