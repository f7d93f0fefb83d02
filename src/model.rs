mod contacts;
mod notification_logs;

pub use contacts::{Contact, ContactView, NewContact};
pub use notification_logs::{NewNotificationLog, NotificationLog, NotificationStatus, CONTACT_FORM_KIND};
