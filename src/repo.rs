mod contacts;
mod notification_logs;
mod store;

pub use contacts::ContactRepo;
pub use notification_logs::NotificationLogRepo;
pub use store::ContactStore;
