//! Repository for the append-only `messages` table.

use bureau_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::Message;
use crate::repositories::notification_repo::NotificationRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, customer_id, is_from_admin, subject, body, is_read, read_at, created_at";

/// Provides message operations for the client/admin conversation log.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a customer's conversation.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        is_from_admin: bool,
        subject: Option<&str>,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (customer_id, is_from_admin, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(customer_id)
            .bind(is_from_admin)
            .bind(subject)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Append an admin-authored message and the matching `message`
    /// notification in one transaction, so the client never sees one
    /// without the other.
    pub async fn send_from_admin(
        pool: &PgPool,
        customer_id: DbId,
        subject: Option<&str>,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO messages (customer_id, is_from_admin, subject, body)
             VALUES ($1, TRUE, $2, $3)
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(customer_id)
            .bind(subject)
            .bind(body)
            .fetch_one(&mut *tx)
            .await?;

        NotificationRepo::create_in_tx(
            &mut tx,
            customer_id,
            "message",
            "normal",
            subject.unwrap_or("New message from the team"),
            None,
            Some("/client/messages"),
        )
        .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// List a customer's messages, most recent first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages WHERE customer_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(customer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single message as read, scoped to the owning customer.
    ///
    /// Returns `true` if the message was found for the customer and updated.
    pub async fn mark_read(
        pool: &PgPool,
        message_id: DbId,
        customer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = NOW() \
             WHERE id = $1 AND customer_id = $2 AND is_read = FALSE",
        )
        .bind(message_id)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all admin-authored messages for a customer as read -- the rows
    /// the client portal actually displays as incoming.
    ///
    /// Returns the number of messages marked.
    pub async fn mark_all_read_from_admin(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = NOW() \
             WHERE customer_id = $1 AND is_from_admin = TRUE AND is_read = FALSE",
        )
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count a customer's unread admin-authored messages.
    pub async fn unread_from_admin_count(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE customer_id = $1 AND is_from_admin = TRUE AND is_read = FALSE",
        )
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
