use chrono::Utc;

use sqlx::SqliteExecutor;

use crate::model::{NewNotificationLog, NotificationLog, NotificationStatus};

/// Repository for the append-only notification log table
pub struct NotificationLogRepo;

impl NotificationLogRepo {
    #[tracing::instrument(name = "Insert notification log", skip(executor))]
    pub async fn insert<'con>(
        executor: impl SqliteExecutor<'con>,
        new_log: &NewNotificationLog<'_>,
    ) -> sqlx::Result<i64> {
        let now = Utc::now();
        let sent_at = (new_log.status == NotificationStatus::Sent).then_some(now);
        let error_message = match new_log.status {
            NotificationStatus::Failed => new_log.error_message,
            NotificationStatus::Pending | NotificationStatus::Sent => None,
        };

        let id = sqlx::query_scalar(
            "insert into notification_logs(contact_id, kind, status, error_message, sent_at, created_at) \
             values (?, ?, ?, ?, ?, ?) returning id",
        )
        .bind(new_log.contact_id)
        .bind(new_log.kind)
        .bind(new_log.status.as_str())
        .bind(error_message)
        .bind(sent_at)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch notification logs for a contact", skip(executor))]
    pub async fn fetch_all_by_contact_id<'con>(
        executor: impl SqliteExecutor<'con>,
        contact_id: i64,
    ) -> sqlx::Result<Vec<NotificationLog>> {
        let logs = sqlx::query_as::<_, NotificationLog>(
            "select * from notification_logs where contact_id = ? order by id",
        )
        .bind(contact_id)
        .fetch_all(executor)
        .await?;

        Ok(logs)
    }
}
