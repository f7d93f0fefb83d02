use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::domain::RequiredText;

/// New Contact request
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: RequiredText,
    pub email: RequiredText,
    pub company: Option<String>,
    pub message: RequiredText,
    pub phone: Option<String>,
}

/// Stored Contact record
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Empty when the submitter left it out
    pub company: String,
    pub message: String,
    /// Empty when the submitter left it out
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contact joined with at most one of its notification log rows.
/// The `email_*` fields are `None` when the contact has no log rows.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ContactView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub email_status: Option<String>,
    pub email_type: Option<String>,
    pub email_error: Option<String>,
    pub email_sent_at: Option<DateTime<Utc>>,
}
