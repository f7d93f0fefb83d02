use actix_web::dev::HttpServiceFactory;
use actix_web::{post, web, HttpResponse, Responder};

use crate::error::RestResult;
use crate::model::NewContact;
use crate::notifier::{NotificationOutcome, Notifier};

use super::form::{ContactForm, SubmissionBody};

/// Notify the owner without storing the submission.
/// Provider failures are echoed back to the client.
#[tracing::instrument(name = "Send a contact email", skip(body, notifier))]
#[post("/send-email")]
async fn send(body: SubmissionBody, notifier: web::Data<Notifier>) -> RestResult<impl Responder> {
    let contact: NewContact = ContactForm::from_body(body).try_into()?;

    let res = match notifier.send_contact_email(&contact).await {
        NotificationOutcome::Success { message, .. } => HttpResponse::Ok().json(
            serde_json::json!({
                "success": true,
                "message": message,
            }),
        ),
        NotificationOutcome::Failure { error, details } => HttpResponse::InternalServerError()
            .json(serde_json::json!({
                "error": error,
                "details": details,
            })),
    };

    Ok(res)
}

/// Email API endpoints
pub fn services() -> impl HttpServiceFactory {
    send
}
