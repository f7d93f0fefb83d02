/// Contact submission and lookup endpoints
pub mod contacts;
/// Send-only email endpoint
pub mod emails;

mod form;

pub use form::{form_config, json_config};
