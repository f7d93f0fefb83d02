use std::net::TcpListener;
use std::path::PathBuf;

use actix_web::dev::Server;
use actix_web::http::header::ContentType;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use serde::Serialize;

use tracing_actix_web::TracingLogger;

use crate::controller::{self, contacts, emails};
use crate::error::{RestError, RestResult};
use crate::notifier::Notifier;
use crate::repo::ContactStore;

/// Location of the static page served at `/`
#[derive(Debug, Clone)]
pub struct LandingPage(pub PathBuf);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    database: &'static str,
    email: &'static str,
    missing_config: Vec<&'static str>,
}

/// Health-check endpoint reporting store reachability and email configuration
#[tracing::instrument(name = "Health check", skip(store, notifier))]
#[get("/health")]
async fn health_check(
    store: web::Data<ContactStore>,
    notifier: web::Data<Notifier>,
) -> impl Responder {
    let database = match store.ping().await {
        Ok(()) => "Connected",
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Database ping failed");
            "Disconnected"
        }
    };

    let config = notifier.validate_configuration();
    let email = if config.is_valid {
        "Configured"
    } else {
        "Not configured"
    };

    HttpResponse::Ok().json(HealthReport {
        status: "OK",
        database,
        email,
        missing_config: config.missing,
    })
}

#[tracing::instrument(name = "Landing page", skip(page))]
#[get("/")]
async fn landing_page(page: web::Data<LandingPage>) -> RestResult<impl Responder> {
    let html = tokio::fs::read_to_string(&page.0).await.map_err(|e| {
        tracing::warn!(error.cause_chain = ?e, "Failed to read landing page {:?}", page.0);
        RestError::NotFound("Page not found".into())
    })?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

/// Run the application on a specified TCP listener.
/// Signal handling is left to the caller, stop the server through its handle.
pub fn run(
    listener: TcpListener,
    store: ContactStore,
    notifier: Notifier,
    landing: LandingPage,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store = web::Data::new(store);
    let notifier = web::Data::new(notifier);
    let landing = web::Data::new(landing);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(notifier.clone())
            .app_data(landing.clone())
            .app_data(controller::json_config())
            .app_data(controller::form_config())
            .service(health_check)
            .service(landing_page)
            .service(contacts::services())
            .service(emails::services())
    })
    .disable_signals()
    .listen(listener)?
    .run();

    Ok(server)
}
