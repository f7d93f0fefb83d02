use chrono::{DateTime, Utc};

use serde::Serialize;

/// Notification kind recorded for the owner acknowledgment of a contact form
pub const CONTACT_FORM_KIND: &str = "contact_form";

/// Delivery status of a single notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// New notification log entry.
/// `error_message` is only kept for failed attempts.
#[derive(Debug)]
pub struct NewNotificationLog<'a> {
    pub contact_id: i64,
    pub kind: &'a str,
    pub status: NotificationStatus,
    pub error_message: Option<&'a str>,
}

/// Stored notification log record, never updated after insertion
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct NotificationLog {
    pub id: i64,
    pub contact_id: i64,
    pub kind: String,
    pub status: String,
    pub error_message: Option<String>,
    /// Set if and only if `status` is `sent`
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
