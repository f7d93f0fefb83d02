use anyhow::Context;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::model::{ContactView, NewContact, NewNotificationLog, NotificationStatus};
use crate::settings::DatabaseSettings;

use super::{ContactRepo, NotificationLogRepo};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Process-wide handle to the contact database.
/// Construction applies the schema, so every handle is ready to serve requests.
#[derive(Debug, Clone)]
pub struct ContactStore {
    pool: SqlitePool,
}

impl ContactStore {
    /// Open the database described by the settings and ensure the schema exists
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        if let Some(parent) = settings.path().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create database directory {:?}", parent))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .connect_with(settings.connect_options())
            .await
            .context("Failed to open database")?;

        Self::initialize(pool).await
    }

    /// Wrap an already opened pool, creating the tables if they do not exist
    #[tracing::instrument(name = "Initialize contact store schema", skip(pool))]
    pub async fn initialize(pool: SqlitePool) -> anyhow::Result<Self> {
        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to create database schema")?;

        tracing::info!("Contact store schema ready");
        Ok(Self { pool })
    }

    pub async fn create_contact(&self, new_contact: &NewContact) -> sqlx::Result<i64> {
        ContactRepo::insert(&self.pool, new_contact).await
    }

    /// Append one notification attempt for a contact
    pub async fn log_notification(
        &self,
        contact_id: i64,
        kind: &str,
        status: NotificationStatus,
        error_message: Option<&str>,
    ) -> sqlx::Result<i64> {
        let new_log = NewNotificationLog {
            contact_id,
            kind,
            status,
            error_message,
        };
        NotificationLogRepo::insert(&self.pool, &new_log).await
    }

    pub async fn list_contacts(&self) -> sqlx::Result<Vec<ContactView>> {
        ContactRepo::fetch_all_with_status(&self.pool).await
    }

    pub async fn get_contact(&self, id: i64) -> sqlx::Result<Option<ContactView>> {
        ContactRepo::fetch_by_id_with_status(&self.pool, id).await
    }

    /// Check that the database still answers queries
    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query("select 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection, waiting for checked-out ones to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
