use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::{web, Either, HttpRequest};

use serde::Deserialize;

use crate::domain::{optional_text, RequiredText};
use crate::error::{RestError, RestResult};
use crate::model::NewContact;

const MISSING_FIELDS: &str = "Name, email, and message are required";
const INVALID_BODY: &str = "Invalid request body";

/// Submission body, accepted as JSON or as an url-encoded form
pub type SubmissionBody = Either<web::Json<ContactForm>, web::Form<ContactForm>>;

/// Deserialization wrapper for contact submissions.
/// Every field is optional here so that missing fields are reported uniformly.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    phone: Option<String>,
    message: Option<String>,
}

impl ContactForm {
    pub fn from_body(body: SubmissionBody) -> Self {
        match body {
            Either::Left(json) => json.into_inner(),
            Either::Right(form) => form.into_inner(),
        }
    }
}

/// JSON extractor settings, rejecting unreadable bodies with a JSON 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e: JsonPayloadError, _req: &HttpRequest| {
        tracing::info!(error.cause_chain = ?e, "Rejected JSON submission body");
        RestError::Validation(INVALID_BODY.into()).into()
    })
}

/// Url-encoded form extractor settings, rejecting unreadable bodies with a JSON 400
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|e: UrlencodedError, _req: &HttpRequest| {
        tracing::info!(error.cause_chain = ?e, "Rejected form submission body");
        RestError::Validation(INVALID_BODY.into()).into()
    })
}

impl TryFrom<ContactForm> for NewContact {
    type Error = RestError;

    fn try_from(form: ContactForm) -> RestResult<Self> {
        let required = |value: Option<String>, field: &str| {
            RequiredText::parse_field(value, field).map_err(|reason| {
                tracing::info!(%reason, "Rejected contact submission");
                RestError::Validation(MISSING_FIELDS.into())
            })
        };

        Ok(Self {
            name: required(form.name, "Name")?,
            email: required(form.email, "Email")?,
            company: optional_text(form.company),
            message: required(form.message, "Message")?,
            phone: optional_text(form.phone),
        })
    }
}
