use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::query::{PageInfo, PageRequest};
use crate::domain::notification::Notification;
use crate::infra::db::Db;

const UNREAD_COUNT_SQL: &str =
    "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
    pub pagination: PageInfo,
}

#[derive(Clone)]
pub struct NotificationService {
    db: Db,
}

impl NotificationService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Newest first. `unread_count` counts every unread notification of the
    /// user, whether or not `unread_only` is set.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        unread_only: bool,
    ) -> ServiceResult<NotificationPage> {
        let rows = sqlx::query(
            "SELECT id, user_id, title, message, is_read, created_at \
             FROM notifications \
             WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit())
        .bind(page.skip())
        .fetch_all(self.db.pool());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(self.db.pool());

        let unread_count = sqlx::query_scalar::<_, i64>(UNREAD_COUNT_SQL)
            .bind(user_id)
            .fetch_one(self.db.pool());

        let (rows, total, unread_count) = tokio::try_join!(rows, total, unread_count)?;

        let notifications = rows
            .iter()
            .map(notification_from_row)
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(NotificationPage {
            notifications,
            unread_count,
            pagination: PageInfo::new(page, total),
        })
    }

    pub async fn unread_count(&self, user_id: Uuid) -> ServiceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(UNREAD_COUNT_SQL)
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// Marks one of the user's notifications read. Already-read notifications
    /// are returned unchanged; another user's notification is `NotFound`.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<Notification> {
        let row = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE \
             WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, message, is_read, created_at",
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => notification_from_row(&row),
            None => Err(ServiceError::not_found("Notification not found")),
        }
    }

    /// Returns how many notifications changed from unread to read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> ServiceResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE \
             WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, notification_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Records a notification inside the caller's transaction, so it commits
    /// or rolls back with the change it describes.
    pub async fn notify_with_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        title: &str,
        message: &str,
    ) -> ServiceResult<()> {
        sqlx::query(
            "INSERT INTO notifications (user_id, title, message) \
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(title)
        .bind(message)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

fn notification_from_row(row: &PgRow) -> ServiceResult<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}
