use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::Serialize;

use crate::error::{RestError, RestResult};
use crate::model::{NewContact, NotificationStatus, CONTACT_FORM_KIND};
use crate::notifier::Notifier;
use crate::repo::ContactStore;

use super::form::{ContactForm, SubmissionBody};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionResponse {
    success: bool,
    message: &'static str,
    id: i64,
    email_status: NotificationStatus,
}

/// Store a contact submission and notify the owner.
///
/// The contact is stored first, then the owner notification is attempted and its
/// outcome appended to the notification log. The two writes are independent: a
/// failure between them leaves a contact without a log row.
#[tracing::instrument(name = "Submit a contact form", skip(body, store, notifier))]
#[post("/contact")]
async fn submit(
    body: SubmissionBody,
    store: web::Data<ContactStore>,
    notifier: web::Data<Notifier>,
) -> RestResult<impl Responder> {
    let new_contact: NewContact = ContactForm::from_body(body).try_into()?;

    let id = store.create_contact(&new_contact).await?;

    // Never fails, delivery problems come back as a failure outcome
    let outcome = notifier.send_contact_email(&new_contact).await;

    store
        .log_notification(id, CONTACT_FORM_KIND, outcome.status(), outcome.error())
        .await?;

    if outcome.is_success() {
        // Best effort: the welcome outcome is neither logged nor reported to the client
        let _ = notifier.send_welcome_email(&new_contact).await;
    }

    let message = if outcome.is_success() {
        "Contact information saved and email sent successfully"
    } else {
        "Contact information saved but email notification failed"
    };

    Ok(HttpResponse::Ok().json(SubmissionResponse {
        success: true,
        message,
        id,
        email_status: outcome.status(),
    }))
}

/// Every contact joined with its notification logs, newest first
#[tracing::instrument(name = "List contacts", skip(store))]
#[get("/contacts")]
async fn list(store: web::Data<ContactStore>) -> RestResult<impl Responder> {
    let contacts = store.list_contacts().await?;

    Ok(HttpResponse::Ok().json(contacts))
}

#[tracing::instrument(name = "Fetch a contact by id", skip(store))]
#[get("/contacts/{id}")]
async fn fetch(
    store: web::Data<ContactStore>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    let contact = store
        .get_contact(id)
        .await?
        .ok_or_else(|| RestError::NotFound("Contact not found".into()))?;

    Ok(HttpResponse::Ok().json(contact))
}

/// Contact API endpoints
pub fn services() -> impl HttpServiceFactory {
    (submit, list, fetch)
}
