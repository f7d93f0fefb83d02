use chrono::Utc;

use sqlx::SqliteExecutor;

use crate::model::{ContactView, NewContact};

/// Contacts left-joined with their notification logs.
/// A contact without logs yields a single row with null `email_*` columns.
const SELECT_CONTACT_VIEWS: &str = r#"
    select
        c.id, c.name, c.email, c.company, c.message, c.phone, c.created_at, c.updated_at,
        l.status as email_status,
        l.kind as email_type,
        l.error_message as email_error,
        l.sent_at as email_sent_at
    from contacts c
    left join notification_logs l on l.contact_id = c.id
"#;

/// Repository for interfacing with the contacts table
pub struct ContactRepo;

impl ContactRepo {
    #[tracing::instrument(name = "Insert contact", skip(executor))]
    pub async fn insert<'con>(
        executor: impl SqliteExecutor<'con>,
        new_contact: &NewContact,
    ) -> sqlx::Result<i64> {
        let now = Utc::now();
        let id = sqlx::query_scalar(
            "insert into contacts(name, email, company, message, phone, created_at, updated_at) \
             values (?, ?, ?, ?, ?, ?, ?) returning id",
        )
        .bind(new_contact.name.as_ref())
        .bind(new_contact.email.as_ref())
        .bind(new_contact.company.as_deref().unwrap_or_default())
        .bind(new_contact.message.as_ref())
        .bind(new_contact.phone.as_deref().unwrap_or_default())
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Fetch every contact with its logs, newest contact first
    #[tracing::instrument(name = "Fetch all contacts", skip(executor))]
    pub async fn fetch_all_with_status<'con>(
        executor: impl SqliteExecutor<'con>,
    ) -> sqlx::Result<Vec<ContactView>> {
        let query = format!(
            "{} order by c.created_at desc, c.id desc, l.id asc",
            SELECT_CONTACT_VIEWS
        );
        let contacts = sqlx::query_as::<_, ContactView>(&query)
            .fetch_all(executor)
            .await?;

        Ok(contacts)
    }

    /// Fetch a contact with its most recent log, if any
    #[tracing::instrument(name = "Fetch contact by id", skip(executor))]
    pub async fn fetch_by_id_with_status<'con>(
        executor: impl SqliteExecutor<'con>,
        id: i64,
    ) -> sqlx::Result<Option<ContactView>> {
        let query = format!(
            "{} where c.id = ? order by l.id desc limit 1",
            SELECT_CONTACT_VIEWS
        );
        let contact = sqlx::query_as::<_, ContactView>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(contact)
    }
}
